//! In-memory container for tests and local development.
//!
//! Behaves like a remote container from the facade's point of view:
//! it evaluates predicates, applies sort keys and limits, assigns
//! server-side record fields and reports query matches one at a time
//! through the [`QuerySink`]. Faults can be injected to exercise error
//! paths, and counters expose query activity.

use crate::config::{ContainerConfig, DatabaseScope};
use crate::container::{CloudContainer, NotificationAuthority, QuerySink};
use crate::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use chrono::Utc;
use recordkit_types::query::compare_records;
use recordkit_types::{
    AccountStatus, Participant, PermissionOptions, QueryDescriptor, Record, RecordId,
    Subscription, SubscriptionId, UserId,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct QueryFault {
    after: usize,
    error: RemoteError,
}

#[derive(Debug)]
struct MemoryState {
    account_status: AccountStatus,
    user: Participant,
    discoverable: bool,
    /// Kept in insertion order so ties under the sort keys are stable.
    records: Vec<Record>,
    subscriptions: Vec<Subscription>,
    write_failure: Option<RemoteError>,
    query_fault: Option<QueryFault>,
    change_counter: u64,
}

#[derive(Debug, Default)]
struct QueryStats {
    started: AtomicUsize,
    active: AtomicUsize,
    delivered: AtomicUsize,
}

/// Decrements the active-query count when a query ends or is aborted.
struct ActiveQuery(Arc<QueryStats>);

impl ActiveQuery {
    fn begin(stats: &Arc<QueryStats>) -> Self {
        stats.started.fetch_add(1, Ordering::SeqCst);
        stats.active.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(stats))
    }
}

impl Drop for ActiveQuery {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A container that keeps everything in process memory.
pub struct MemoryContainer {
    config: ContainerConfig,
    state: RwLock<MemoryState>,
    stats: Arc<QueryStats>,
}

impl MemoryContainer {
    /// Creates an empty container with an available account.
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            state: RwLock::new(MemoryState {
                account_status: AccountStatus::Available,
                user: Participant {
                    id: UserId::from_name("_local_user"),
                    display_name: None,
                },
                discoverable: true,
                records: Vec::new(),
                subscriptions: Vec::new(),
                write_failure: None,
                query_fault: None,
                change_counter: 0,
            }),
            stats: Arc::new(QueryStats::default()),
        }
    }

    pub async fn set_account_status(&self, status: AccountStatus) {
        self.state.write().await.account_status = status;
    }

    /// Sets the signed-in user.
    pub async fn set_user(&self, id: UserId, display_name: Option<String>) {
        self.state.write().await.user = Participant { id, display_name };
    }

    /// When `false`, identity lookups are refused with `PermissionDenied`.
    pub async fn set_discoverable(&self, discoverable: bool) {
        self.state.write().await.discoverable = discoverable;
    }

    /// Makes the next save or delete fail with `error`.
    pub async fn fail_next_write(&self, error: RemoteError) {
        self.state.write().await.write_failure = Some(error);
    }

    /// Makes every query fail with `error` after delivering `after` records.
    pub async fn fail_queries_after(&self, after: usize, error: RemoteError) {
        self.state.write().await.query_fault = Some(QueryFault { after, error });
    }

    pub async fn clear_faults(&self) {
        let mut state = self.state.write().await;
        state.write_failure = None;
        state.query_fault = None;
    }

    /// Stores a record exactly as given, bypassing server-assigned fields.
    pub async fn insert_raw(&self, record: Record) {
        let mut state = self.state.write().await;
        upsert(&mut state.records, record);
    }

    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Number of query operations started so far.
    pub fn queries_started(&self) -> usize {
        self.stats.started.load(Ordering::SeqCst)
    }

    /// Number of query operations still running.
    pub fn active_queries(&self) -> usize {
        self.stats.active.load(Ordering::SeqCst)
    }

    /// Total records handed to query sinks.
    pub fn records_delivered(&self) -> usize {
        self.stats.delivered.load(Ordering::SeqCst)
    }

    fn check_signed_in(state: &MemoryState) -> RemoteResult<()> {
        if state.account_status.is_available() {
            Ok(())
        } else {
            Err(RemoteError::NotAuthenticated)
        }
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

fn upsert(records: &mut Vec<Record>, record: Record) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[async_trait]
impl CloudContainer for MemoryContainer {
    fn identifier(&self) -> &str {
        &self.config.container_id
    }

    fn database(&self) -> DatabaseScope {
        self.config.database
    }

    async fn account_status(&self) -> RemoteResult<AccountStatus> {
        Ok(self.state.read().await.account_status)
    }

    async fn current_user_id(&self) -> RemoteResult<UserId> {
        let state = self.state.read().await;
        Self::check_signed_in(&state)?;
        Ok(state.user.id.clone())
    }

    async fn fetch_participant(&self, id: &UserId) -> RemoteResult<Participant> {
        let state = self.state.read().await;
        if *id != state.user.id {
            return Err(RemoteError::UnknownItem(id.to_string()));
        }
        if !state.discoverable {
            return Err(RemoteError::PermissionDenied(
                "user is not discoverable".to_string(),
            ));
        }
        Ok(state.user.clone())
    }

    async fn save(&self, mut record: Record) -> RemoteResult<Record> {
        let mut state = self.state.write().await;
        if let Some(error) = state.write_failure.take() {
            return Err(error);
        }
        Self::check_signed_in(&state)?;

        let now = Utc::now().timestamp_millis();
        let created_at = state
            .records
            .iter()
            .find(|r| r.id == record.id)
            .and_then(|r| r.created_at);
        state.change_counter += 1;

        record.created_at = Some(created_at.unwrap_or(now));
        record.modified_at = Some(now);
        record.change_tag = Some(format!("{:x}", state.change_counter));

        debug!(id = %record.id, record_type = %record.record_type, "memory container stored record");
        upsert(&mut state.records, record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: &RecordId) -> RemoteResult<Option<Record>> {
        let state = self.state.read().await;
        Self::check_signed_in(&state)?;
        Ok(state.records.iter().find(|r| r.id == *id).cloned())
    }

    async fn delete(&self, id: &RecordId) -> RemoteResult<Option<RecordId>> {
        let mut state = self.state.write().await;
        if let Some(error) = state.write_failure.take() {
            return Err(error);
        }
        Self::check_signed_in(&state)?;

        let Some(index) = state.records.iter().position(|r| r.id == *id) else {
            return Ok(None);
        };
        let removed = state.records.remove(index);
        Ok(Some(removed.id))
    }

    async fn perform_query(&self, query: &QueryDescriptor, sink: &QuerySink) -> RemoteResult<()> {
        let _active = ActiveQuery::begin(&self.stats);

        // Snapshot the matches so no lock is held while the consumer is slow.
        let (matches, fault) = {
            let state = self.state.read().await;
            Self::check_signed_in(&state)?;
            if query.record_type.trim().is_empty() {
                return Err(RemoteError::InvalidQuery("record type is empty".to_string()));
            }
            let mut matches: Vec<Record> = state
                .records
                .iter()
                .filter(|r| query.matches(r))
                .cloned()
                .collect();
            matches.sort_by(|a, b| compare_records(&query.sort, a, b));
            if let Some(limit) = query.max_results() {
                matches.truncate(limit);
            }
            (matches, state.query_fault.clone())
        };

        for (index, record) in matches.into_iter().enumerate() {
            if let Some(fault) = &fault {
                if index == fault.after {
                    return Err(fault.error.clone());
                }
            }
            if sink.record_matched(record).await.is_err() {
                debug!(delivered = index, "query consumer went away");
                return Ok(());
            }
            self.stats.delivered.fetch_add(1, Ordering::SeqCst);
        }

        match fault {
            Some(fault) => Err(fault.error),
            None => Ok(()),
        }
    }

    async fn save_subscription(&self, subscription: Subscription) -> RemoteResult<Subscription> {
        let mut state = self.state.write().await;
        Self::check_signed_in(&state)?;
        match state
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
        {
            Some(existing) => *existing = subscription.clone(),
            None => state.subscriptions.push(subscription.clone()),
        }
        Ok(subscription)
    }

    async fn delete_subscription(&self, id: &SubscriptionId) -> RemoteResult<SubscriptionId> {
        let mut state = self.state.write().await;
        Self::check_signed_in(&state)?;
        let Some(index) = state.subscriptions.iter().position(|s| s.id == *id) else {
            return Err(RemoteError::UnknownItem(id.to_string()));
        };
        Ok(state.subscriptions.remove(index).id)
    }

    async fn list_subscriptions(&self) -> RemoteResult<Vec<Subscription>> {
        let state = self.state.read().await;
        Self::check_signed_in(&state)?;
        Ok(state.subscriptions.clone())
    }
}

/// A notification authority that answers every request the same way.
#[derive(Debug, Default)]
pub struct MemoryAuthority {
    granted: bool,
    requests: AtomicUsize,
}

impl MemoryAuthority {
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationAuthority for MemoryAuthority {
    async fn request_permission(&self, options: PermissionOptions) -> RemoteResult<bool> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!(?options, granted = self.granted, "permission requested");
        Ok(self.granted)
    }
}
