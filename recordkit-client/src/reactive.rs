//! Stream-returning variants of the [`CloudService`] operations.
//!
//! Each `*_stream` method wraps the `async fn` of the same name: the call
//! is scheduled when the stream is first polled, and its single outcome
//! (value or error) is emitted before the stream completes. Errors are
//! forwarded unchanged, never turned into an empty stream.

use crate::codec::RecordCodec;
use crate::error::ClientResult;
use crate::service::CloudService;
use futures::stream::{self, BoxStream, StreamExt};
use recordkit_types::{
    AccountStatus, PermissionOptions, QueryDescriptor, Record, RecordId, Subscription,
    SubscriptionId, UserIdentity,
};
use std::future::Future;

/// A stream of results produced by a service call.
pub type Observable<T> = BoxStream<'static, ClientResult<T>>;

/// Wraps a single-shot call as a one-item stream.
pub fn single<T, F>(call: F) -> Observable<T>
where
    T: Send + 'static,
    F: Future<Output = ClientResult<T>> + Send + 'static,
{
    stream::once(call).boxed()
}

impl CloudService {
    pub fn account_status_stream(&self) -> Observable<AccountStatus> {
        let service = self.clone();
        single(async move { service.account_status().await })
    }

    pub fn check_account_stream(&self) -> Observable<bool> {
        let service = self.clone();
        single(async move { service.check_account().await })
    }

    pub fn current_user_stream(&self) -> Observable<UserIdentity> {
        let service = self.clone();
        single(async move { service.current_user().await })
    }

    pub fn create_stream<E: RecordCodec>(&self, entity: E) -> Observable<Record> {
        let service = self.clone();
        single(async move { service.create(&entity).await })
    }

    pub fn update_stream<E: RecordCodec>(&self, entity: E) -> Observable<Record> {
        let service = self.clone();
        single(async move { service.update(&entity).await })
    }

    pub fn read_stream<E: RecordCodec>(&self, id: RecordId) -> Observable<E> {
        let service = self.clone();
        single(async move { service.read::<E>(&id).await })
    }

    /// Emits each matching entity as it arrives, then completes or fails.
    pub fn read_many_stream<E: RecordCodec>(&self, query: QueryDescriptor) -> Observable<E> {
        self.query::<E>(query).boxed()
    }

    pub fn delete_stream<E: RecordCodec>(&self, entity: E) -> Observable<RecordId> {
        let service = self.clone();
        single(async move { service.delete(&entity).await })
    }

    pub fn subscribe_stream(&self, subscription: Subscription) -> Observable<Subscription> {
        let service = self.clone();
        single(async move { service.subscribe(subscription).await })
    }

    pub fn unsubscribe_stream(&self, id: SubscriptionId) -> Observable<SubscriptionId> {
        let service = self.clone();
        single(async move { service.unsubscribe(&id).await })
    }

    pub fn subscriptions_stream(&self) -> Observable<Vec<Subscription>> {
        let service = self.clone();
        single(async move { service.subscriptions().await })
    }

    pub fn request_notification_permission_stream(
        &self,
        options: PermissionOptions,
    ) -> Observable<bool> {
        let service = self.clone();
        single(async move { service.request_notification_permission(options).await })
    }
}
