//! The `CloudService` facade.
//!
//! Each method is one round trip to the container (or one query
//! operation). Failures are wrapped by call kind and returned as-is;
//! nothing is retried or cached.

use crate::codec::RecordCodec;
use crate::container::{CloudContainer, NotificationAuthority};
use crate::error::{AccountError, ClientError, ClientResult, RemoteError};
use crate::query::{QueryStream, QueryStreamAdapter};
use futures::TryStreamExt;
use recordkit_types::{
    AccountStatus, PermissionOptions, QueryDescriptor, Record, RecordId, Subscription,
    SubscriptionId, UserIdentity,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Uniform entry point for account, record and subscription operations.
///
/// Cheap to clone; clones share the same container handle.
#[derive(Clone)]
pub struct CloudService {
    container: Arc<dyn CloudContainer>,
    adapter: QueryStreamAdapter,
    notifications: Option<Arc<dyn NotificationAuthority>>,
}

impl CloudService {
    /// Creates a service over a shared container handle.
    pub fn new(container: Arc<dyn CloudContainer>) -> Self {
        Self {
            adapter: QueryStreamAdapter::new(Arc::clone(&container)),
            container,
            notifications: None,
        }
    }

    /// Attaches the authority used by [`request_notification_permission`].
    ///
    /// [`request_notification_permission`]: Self::request_notification_permission
    #[must_use]
    pub fn with_notifications(mut self, authority: Arc<dyn NotificationAuthority>) -> Self {
        self.notifications = Some(authority);
        self
    }

    pub fn container(&self) -> &Arc<dyn CloudContainer> {
        &self.container
    }

    // ── Account ──────────────────────────────────────────────────

    /// Fetches the current account status. Never cached.
    pub async fn account_status(&self) -> ClientResult<AccountStatus> {
        self.container
            .account_status()
            .await
            .map_err(ClientError::Lookup)
    }

    /// Returns `true` if the account is available, or the [`AccountError`]
    /// matching the status otherwise.
    pub async fn check_account(&self) -> ClientResult<bool> {
        let status = self.account_status().await?;
        match AccountError::from_status(status) {
            None => {
                debug!(container = self.container.identifier(), "account available");
                Ok(true)
            }
            Some(err) => {
                warn!(
                    container = self.container.identifier(),
                    %status,
                    "account unavailable"
                );
                Err(err.into())
            }
        }
    }

    /// Returns the signed-in user's id and, when the container discloses
    /// it, their display name.
    pub async fn current_user(&self) -> ClientResult<UserIdentity> {
        let id = self
            .container
            .current_user_id()
            .await
            .map_err(ClientError::Lookup)?;

        let name = match self.container.fetch_participant(&id).await {
            Ok(participant) => participant.display_name,
            Err(RemoteError::PermissionDenied(reason)) => {
                debug!(user = %id, %reason, "display name withheld");
                None
            }
            Err(e) => return Err(ClientError::Lookup(e)),
        };

        Ok(UserIdentity { id, name })
    }

    // ── Records ──────────────────────────────────────────────────

    /// Stores a new entity and returns the record the container kept.
    pub async fn create<E: RecordCodec>(&self, entity: &E) -> ClientResult<Record> {
        self.save(entity.encode()).await
    }

    /// Overwrites an entity. Same write path as [`create`](Self::create):
    /// the whole record is replaced and no change-tag check is made.
    pub async fn update<E: RecordCodec>(&self, entity: &E) -> ClientResult<Record> {
        self.save(entity.encode()).await
    }

    async fn save(&self, record: Record) -> ClientResult<Record> {
        debug!(
            container = self.container.identifier(),
            record_type = %record.record_type,
            id = %record.id,
            "saving record"
        );
        let saved = self
            .container
            .save(record)
            .await
            .map_err(ClientError::Write)?;
        info!(record_type = %saved.record_type, id = %saved.id, "record saved");
        Ok(saved)
    }

    /// Fetches and decodes one entity.
    ///
    /// Fails with [`ClientError::NotFound`] when no record has this id and
    /// with [`ClientError::Decode`] when one does but `E` rejects it.
    pub async fn read<E: RecordCodec>(&self, id: &RecordId) -> ClientResult<E> {
        debug!(container = self.container.identifier(), %id, "fetching record");
        let record = self
            .container
            .fetch(id)
            .await
            .map_err(ClientError::Read)?
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        E::decode(&record).ok_or_else(|| {
            warn!(record_type = %record.record_type, %id, "fetched record could not be decoded");
            ClientError::decode(&record)
        })
    }

    /// Streams the entities matching `query` as the container reports them.
    pub fn query<E: RecordCodec>(&self, query: QueryDescriptor) -> QueryStream<E> {
        self.adapter.execute(query)
    }

    /// Drains [`query`](Self::query) into a list.
    ///
    /// Any error ends the read; entities received before it are discarded.
    pub async fn read_many<E: RecordCodec>(&self, query: QueryDescriptor) -> ClientResult<Vec<E>> {
        self.query(query).try_collect().await
    }

    /// Deletes an entity's record and returns its id.
    pub async fn delete<E: RecordCodec>(&self, entity: &E) -> ClientResult<RecordId> {
        self.delete_by_id(&entity.record_id()).await
    }

    /// Deletes a record by id. Fails with [`ClientError::NotFound`] if absent.
    pub async fn delete_by_id(&self, id: &RecordId) -> ClientResult<RecordId> {
        debug!(container = self.container.identifier(), %id, "deleting record");
        let deleted = self
            .container
            .delete(id)
            .await
            .map_err(ClientError::Write)?
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        info!(id = %deleted, "record deleted");
        Ok(deleted)
    }

    // ── Subscriptions ────────────────────────────────────────────

    /// Registers a subscription with the container's notification system.
    pub async fn subscribe(&self, subscription: Subscription) -> ClientResult<Subscription> {
        subscription.validate()?;
        debug!(
            id = %subscription.id,
            record_type = %subscription.record_type,
            predicate = %subscription.predicate,
            "saving subscription"
        );
        self.container
            .save_subscription(subscription)
            .await
            .map_err(ClientError::Subscription)
    }

    pub async fn unsubscribe(&self, id: &SubscriptionId) -> ClientResult<SubscriptionId> {
        debug!(%id, "deleting subscription");
        self.container
            .delete_subscription(id)
            .await
            .map_err(ClientError::Subscription)
    }

    /// Lists the subscriptions the container currently holds.
    pub async fn subscriptions(&self) -> ClientResult<Vec<Subscription>> {
        self.container
            .list_subscriptions()
            .await
            .map_err(ClientError::Subscription)
    }

    /// Asks the user for permission to show notifications.
    pub async fn request_notification_permission(
        &self,
        options: PermissionOptions,
    ) -> ClientResult<bool> {
        let authority = self.notifications.as_ref().ok_or_else(|| {
            ClientError::Config("no notification authority configured".to_string())
        })?;
        let granted = authority
            .request_permission(options)
            .await
            .map_err(ClientError::Permission)?;
        info!(granted, "notification permission resolved");
        Ok(granted)
    }
}
