//! Error types for container operations.

use recordkit_types::{AccountStatus, Record, RecordId};
use thiserror::Error;

/// Result type for facade operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for raw container calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A failure reported by the remote container itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not authenticated with the container")]
    NotAuthenticated,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The server copy changed since it was fetched.
    #[error("server record changed: {0}")]
    Conflict(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The remote operation stopped without reporting an outcome.
    #[error("operation interrupted")]
    Interrupted,
}

impl RemoteError {
    /// Returns the server's suggested delay for rate-limit errors.
    ///
    /// RecordKit never retries on its own; this is for callers that do.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            RemoteError::RateLimited { retry_after_secs } => {
                Some(std::time::Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

/// Why the account cannot be used. One variant per non-available status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("no account is signed in")]
    NoAccount,

    #[error("account status could not be determined")]
    CouldNotDetermine,

    #[error("account access is restricted")]
    Restricted,

    #[error("account is temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("account status is unknown")]
    Unknown,
}

impl AccountError {
    /// Maps a status to its error, or `None` when the account is available.
    pub fn from_status(status: AccountStatus) -> Option<Self> {
        match status {
            AccountStatus::Available => None,
            AccountStatus::NoAccount => Some(AccountError::NoAccount),
            AccountStatus::CouldNotDetermine => Some(AccountError::CouldNotDetermine),
            AccountStatus::Restricted => Some(AccountError::Restricted),
            AccountStatus::TemporarilyUnavailable => Some(AccountError::TemporarilyUnavailable),
            AccountStatus::Unknown => Some(AccountError::Unknown),
        }
    }
}

/// Errors surfaced by [`CloudService`](crate::CloudService) and query streams.
///
/// Remote failures are wrapped by the kind of call that produced them so
/// the caller can tell a failed read from a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("account unavailable: {0}")]
    Account(#[from] AccountError),

    #[error("account lookup failed: {0}")]
    Lookup(RemoteError),

    #[error("remote read failed: {0}")]
    Read(RemoteError),

    #[error("remote write failed: {0}")]
    Write(RemoteError),

    #[error("query failed: {0}")]
    Query(RemoteError),

    #[error("subscription request failed: {0}")]
    Subscription(RemoteError),

    #[error("notification permission request failed: {0}")]
    Permission(RemoteError),

    /// A record exists but could not be turned into the requested type.
    #[error("record {id} of type {record_type} could not be decoded")]
    Decode { record_type: String, id: RecordId },

    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn decode(record: &Record) -> Self {
        ClientError::Decode {
            record_type: record.record_type.clone(),
            id: record.id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode { .. })
    }

    /// The underlying container error, if this failure came from one.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            ClientError::Lookup(e)
            | ClientError::Read(e)
            | ClientError::Write(e)
            | ClientError::Query(e)
            | ClientError::Subscription(e)
            | ClientError::Permission(e) => Some(e),
            _ => None,
        }
    }
}

impl From<recordkit_types::Error> for ClientError {
    fn from(err: recordkit_types::Error) -> Self {
        ClientError::InvalidRequest(err.to_string())
    }
}
