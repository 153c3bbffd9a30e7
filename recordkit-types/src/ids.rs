//! Identifier types used throughout RecordKit.
//!
//! Record and subscription names are opaque strings owned by the remote
//! container. Locally generated names use UUID v7 so they sort by
//! creation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing name without validation.
            #[must_use]
            pub fn from_name(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Returns the name as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Parses a name, rejecting empty or whitespace-only input.
            pub fn parse(s: &str) -> crate::Result<Self> {
                if s.trim().is_empty() {
                    return Err(crate::Error::InvalidIdentifier(s.to_string()));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Unique name of a record inside the remote container.
    RecordId
);

string_id!(
    /// Stable identifier of the signed-in user, as reported by the container.
    UserId
);

string_id!(
    /// Identifier of a registered subscription.
    SubscriptionId
);

impl RecordId {
    /// Generates a new time-ordered record name.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionId {
    /// Generates a new time-ordered subscription name.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}
