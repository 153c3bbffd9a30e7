use pretty_assertions::assert_eq;
use recordkit_types::{Error, Record, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Task {
    title: String,
    status: String,
    #[serde(rename = "createdAt")]
    created_at: i64,
}

fn sample_task() -> Task {
    Task {
        title: "Write docs".into(),
        status: "open".into(),
        created_at: 1_700_000_000,
    }
}

// ── Construction & accessors ─────────────────────────────────────

#[test]
fn new_record_is_empty() {
    let record = Record::new(RecordId::from_name("r1"), "Task");
    assert_eq!(record.record_type, "Task");
    assert!(record.fields.is_empty());
    assert!(record.created_at.is_none());
    assert!(record.change_tag.is_none());
}

#[test]
fn with_field_and_typed_getters() {
    let record = Record::new(RecordId::from_name("r1"), "Task")
        .with_field("title", "x")
        .with_field("count", 3)
        .with_field("ratio", 0.5)
        .with_field("done", true);

    assert_eq!(record.get_str("title"), Some("x"));
    assert_eq!(record.get_i64("count"), Some(3));
    assert_eq!(record.get_f64("ratio"), Some(0.5));
    assert_eq!(record.get_bool("done"), Some(true));
    assert_eq!(record.get_str("count"), None);
    assert_eq!(record.get("missing"), None);
}

// ── Serde helpers ────────────────────────────────────────────────

#[test]
fn from_serializable_then_deserialize_fields() {
    let task = sample_task();
    let record = Record::from_serializable(RecordId::from_name("t1"), "Task", &task).unwrap();

    assert_eq!(record.get_str("status"), Some("open"));
    assert_eq!(record.get_i64("createdAt"), Some(1_700_000_000));
    assert_eq!(record.deserialize_fields::<Task>().unwrap(), task);
}

#[test]
fn from_serializable_rejects_non_object() {
    let err = Record::from_serializable(RecordId::new(), "Task", &vec![1, 2, 3]).unwrap_err();
    assert!(matches!(err, Error::NotAnObject("array")));
}

#[test]
fn deserialize_fields_reports_missing_field() {
    let record = Record::new(RecordId::new(), "Task").with_field("title", "only");
    assert!(matches!(
        record.deserialize_fields::<Task>(),
        Err(Error::Serialization(_))
    ));
}

// ── Metadata ─────────────────────────────────────────────────────

#[test]
fn same_content_ignores_server_fields() {
    let a = Record::new(RecordId::from_name("r"), "Task").with_field("a", 1);
    let mut b = a.clone();
    b.created_at = Some(10);
    b.modified_at = Some(20);
    b.change_tag = Some("3".into());

    assert!(a.same_content(&b));
    assert_ne!(a, b);
}

#[test]
fn record_json_omits_unset_metadata() {
    let record = Record::new(RecordId::from_name("r"), "Task").with_field("a", 1);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({"id": "r", "record_type": "Task", "fields": {"a": 1}})
    );
}
