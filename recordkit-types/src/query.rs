//! Query descriptions handed to the remote container.
//!
//! A [`QueryDescriptor`] names the record type to search, a filter
//! [`Predicate`], an ordered list of [`SortKey`]s and an optional limit.
//! RecordKit never evaluates a query itself; the container does. The
//! evaluation helpers here exist so containers (including the in-memory
//! one) share a single definition of the predicate and ordering rules.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroUsize;

/// Comparison operator used by [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// String prefix match.
    BeginsWith,
    /// The field value is one of the elements of an array operand.
    In,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::BeginsWith => "BEGINSWITH",
            Comparison::In => "IN",
        }
    }
}

/// A filter expression evaluated by the remote container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record.
    #[default]
    True,
    Compare {
        field: String,
        op: Comparison,
        value: Value,
    },
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
    Not { predicate: Box<Predicate> },
}

impl Predicate {
    /// A predicate matching every record.
    #[must_use]
    pub fn all() -> Self {
        Predicate::True
    }

    pub fn compare(field: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Ge, value)
    }

    pub fn begins_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::compare(field, Comparison::BeginsWith, Value::String(prefix.into()))
    }

    pub fn is_in(field: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::compare(
            field,
            Comparison::In,
            Value::Array(values.into_iter().collect()),
        )
    }

    /// Conjunction of `self` and `other`, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::True => other,
            Predicate::And { mut all } => {
                all.push(other);
                Predicate::And { all }
            }
            first => Predicate::And {
                all: vec![first, other],
            },
        }
    }

    /// Disjunction of `self` and `other`, flattening nested `Or`s.
    #[must_use]
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or { mut any } => {
                any.push(other);
                Predicate::Or { any }
            }
            first => Predicate::Or {
                any: vec![first, other],
            },
        }
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Predicate::Not {
            predicate: Box::new(self),
        }
    }

    /// Evaluates the predicate against a record's fields.
    ///
    /// A missing field behaves like null: it equals only a null operand
    /// and is never ordered against anything.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Compare { field, op, value } => {
                compare_field(record.get(field), *op, value)
            }
            Predicate::And { all } => all.iter().all(|p| p.matches(record)),
            Predicate::Or { any } => any.iter().any(|p| p.matches(record)),
            Predicate::Not { predicate } => !predicate.matches(record),
        }
    }
}

fn compare_field(actual: Option<&Value>, op: Comparison, expected: &Value) -> bool {
    let actual = match actual {
        Some(Value::Null) | None => {
            return match op {
                Comparison::Eq => expected.is_null(),
                Comparison::Ne => !expected.is_null(),
                _ => false,
            };
        }
        Some(v) => v,
    };
    match op {
        Comparison::Eq => values_equal(actual, expected),
        Comparison::Ne => !values_equal(actual, expected),
        Comparison::Lt => compare_values(actual, expected) == Some(Ordering::Less),
        Comparison::Le => matches!(
            compare_values(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Comparison::Gt => compare_values(actual, expected) == Some(Ordering::Greater),
        Comparison::Ge => matches!(
            compare_values(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Comparison::BeginsWith => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(prefix)) => a.starts_with(prefix),
            _ => false,
        },
        Comparison::In => expected
            .as_array()
            .is_some_and(|items| items.iter().any(|item| values_equal(actual, item))),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match compare_values(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// Orders two scalar JSON values of the same kind.
///
/// Numbers compare numerically regardless of integer/float
/// representation. Values of different kinds, arrays and objects are
/// unordered.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        _ => None,
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("TRUEPREDICATE"),
            Predicate::Compare { field, op, value } => {
                write!(f, "{field} {} {value}", op.symbol())
            }
            Predicate::And { all } => write_joined(f, all, " AND "),
            Predicate::Or { any } => write_joined(f, any, " OR "),
            Predicate::Not { predicate } => write!(f, "NOT ({predicate})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}

/// One sort key. The first key in a query is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Orders two records by `keys`, primary key first.
///
/// Missing or null fields sort before present ones in ascending order.
/// Records that tie on every key compare equal, so a stable sort keeps
/// their original order.
pub fn compare_records(keys: &[SortKey], a: &Record, b: &Record) -> Ordering {
    for key in keys {
        let ordering = match (a.get(&key.field), b.get(&key.field)) {
            (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
            (None | Some(Value::Null), Some(_)) => Ordering::Less,
            (Some(_), None | Some(Value::Null)) => Ordering::Greater,
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
        };
        let ordering = if key.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Describes a multi-record fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub record_type: String,
    #[serde(default)]
    pub predicate: Predicate,
    #[serde(default)]
    pub sort: Vec<SortKey>,
    #[serde(default)]
    pub limit: Option<NonZeroUsize>,
}

impl QueryDescriptor {
    /// A query matching every record of `record_type`, unsorted and unlimited.
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            predicate: Predicate::True,
            sort: Vec::new(),
            limit: None,
        }
    }

    /// Replaces the filter predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Appends a sort key after any existing ones.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort.push(SortKey {
            field: field.into(),
            ascending,
        });
        self
    }

    /// Caps the number of results. Zero is rejected.
    pub fn with_limit(mut self, limit: usize) -> crate::Result<Self> {
        self.limit = Some(NonZeroUsize::new(limit).ok_or(crate::Error::InvalidLimit)?);
        Ok(self)
    }

    /// The limit as a plain count, if any.
    pub fn max_results(&self) -> Option<usize> {
        self.limit.map(NonZeroUsize::get)
    }

    /// True if `record` belongs to this query's type and passes its filter.
    pub fn matches(&self, record: &Record) -> bool {
        record.record_type == self.record_type && self.predicate.matches(record)
    }
}
