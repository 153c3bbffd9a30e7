//! Remote container abstraction.
//!
//! [`CloudContainer`] is the seam between RecordKit and the platform
//! client. Implementations forward each call to the remote service and
//! report its outcome; they never retry or cache.

use crate::config::DatabaseScope;
use crate::error::RemoteResult;
use async_trait::async_trait;
use recordkit_types::{
    AccountStatus, Participant, PermissionOptions, QueryDescriptor, Record, RecordId,
    Subscription, SubscriptionId, UserId,
};
use thiserror::Error;
use tokio::sync::mpsc;

/// Returned by [`QuerySink::record_matched`] once the consumer has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query consumer abandoned the result stream")]
pub struct QueryAbandoned;

/// Event handed from a running query to the consuming stream.
#[derive(Debug)]
pub(crate) enum QueryEvent {
    Matched(Record),
    Finished(RemoteResult<()>),
}

/// Callback endpoint a container reports matched records to.
///
/// Each call waits until the consumer has taken the previous record, so
/// at most one matched record is in flight at a time.
#[derive(Debug)]
pub struct QuerySink {
    tx: mpsc::Sender<QueryEvent>,
}

impl QuerySink {
    pub(crate) fn new(tx: mpsc::Sender<QueryEvent>) -> Self {
        Self { tx }
    }

    /// Reports one matched record.
    ///
    /// Fails with [`QueryAbandoned`] when the consumer dropped the stream;
    /// the container must stop the query and deliver nothing further.
    pub async fn record_matched(&self, record: Record) -> Result<(), QueryAbandoned> {
        self.tx
            .send(QueryEvent::Matched(record))
            .await
            .map_err(|_| QueryAbandoned)
    }

    /// True once the consumer dropped the stream.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Client handle for a remote record container.
///
/// One instance is shared process-wide behind an `Arc`; implementations
/// must tolerate concurrent in-flight calls.
#[async_trait]
pub trait CloudContainer: Send + Sync {
    /// The container identifier, for diagnostics.
    fn identifier(&self) -> &str;

    /// The database operations target.
    fn database(&self) -> DatabaseScope;

    async fn account_status(&self) -> RemoteResult<AccountStatus>;

    async fn current_user_id(&self) -> RemoteResult<UserId>;

    /// Looks up a user's identity. The display name may be withheld.
    async fn fetch_participant(&self, id: &UserId) -> RemoteResult<Participant>;

    /// Stores `record`, replacing any existing record with the same id.
    /// Returns the stored copy including server-assigned fields.
    async fn save(&self, record: Record) -> RemoteResult<Record>;

    /// Fetches a record. `Ok(None)` means no record has this id.
    async fn fetch(&self, id: &RecordId) -> RemoteResult<Option<Record>>;

    /// Deletes a record. `Ok(None)` means no record had this id.
    async fn delete(&self, id: &RecordId) -> RemoteResult<Option<RecordId>>;

    /// Runs one query operation.
    ///
    /// Every matching record is passed to `sink` in the order the container
    /// produces it (applying the query's sort keys and limit). The returned
    /// value is the query's completion: `Ok(())` once all matches were
    /// delivered, or the failure that ended it. If `sink` reports
    /// abandonment the implementation returns promptly without further
    /// sink calls.
    async fn perform_query(&self, query: &QueryDescriptor, sink: &QuerySink) -> RemoteResult<()>;

    async fn save_subscription(&self, subscription: Subscription) -> RemoteResult<Subscription>;

    async fn delete_subscription(&self, id: &SubscriptionId) -> RemoteResult<SubscriptionId>;

    async fn list_subscriptions(&self) -> RemoteResult<Vec<Subscription>>;
}

/// Grants or denies permission to show notifications.
#[async_trait]
pub trait NotificationAuthority: Send + Sync {
    async fn request_permission(&self, options: PermissionOptions) -> RemoteResult<bool>;
}
