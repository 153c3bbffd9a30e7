use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of the user's account with the remote container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Available,
    NoAccount,
    Restricted,
    CouldNotDetermine,
    TemporarilyUnavailable,
    Unknown,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 6] = [
        AccountStatus::Available,
        AccountStatus::NoAccount,
        AccountStatus::Restricted,
        AccountStatus::CouldNotDetermine,
        AccountStatus::TemporarilyUnavailable,
        AccountStatus::Unknown,
    ];

    #[must_use]
    pub fn is_available(self) -> bool {
        self == AccountStatus::Available
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountStatus::Available => "available",
            AccountStatus::NoAccount => "no account",
            AccountStatus::Restricted => "restricted",
            AccountStatus::CouldNotDetermine => "could not determine",
            AccountStatus::TemporarilyUnavailable => "temporarily unavailable",
            AccountStatus::Unknown => "unknown",
        })
    }
}

/// A user as known to the container's identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    /// Withheld when the user has not opted into discoverability.
    pub display_name: Option<String>,
}

/// The signed-in user. `name` is absent whenever the container withholds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: Option<String>,
}

/// Options for the notification permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionOptions {
    pub alert: bool,
    pub badge: bool,
    pub sound: bool,
}

impl Default for PermissionOptions {
    fn default() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}
