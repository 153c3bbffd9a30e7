mod common;

use common::{Task, seed_open_tasks, setup};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use recordkit_client::memory::{MemoryAuthority, MemoryContainer};
use recordkit_client::reactive::single;
use recordkit_client::{AccountError, ClientError, CloudService, RecordCodec, RemoteError};
use recordkit_types::{AccountStatus, PermissionOptions, RecordId, Subscription, UserId};
use std::sync::Arc;

// ── Single-shot wrappers ─────────────────────────────────────────

#[tokio::test]
async fn single_emits_one_item_then_completes() {
    let items: Vec<_> = single(async { Ok::<_, ClientError>(7) }).collect().await;
    assert_eq!(items, vec![Ok(7)]);
}

#[tokio::test]
async fn single_forwards_error_instead_of_completing_empty() {
    let items: Vec<_> = single(async { Err::<u8, _>(ClientError::NotFound(RecordId::from("x"))) })
        .collect()
        .await;
    assert_eq!(items, vec![Err(ClientError::NotFound(RecordId::from("x")))]);
}

#[tokio::test]
async fn check_account_stream_matches_async_call() {
    let (container, service) = setup();
    assert_eq!(
        service.check_account_stream().collect::<Vec<_>>().await,
        vec![service.check_account().await]
    );

    container.set_account_status(AccountStatus::Restricted).await;
    let streamed: Vec<_> = service.check_account_stream().collect().await;
    assert_eq!(streamed, vec![Err(ClientError::Account(AccountError::Restricted))]);
    assert_eq!(streamed[0], service.check_account().await);
}

#[tokio::test]
async fn account_status_stream() {
    let (container, service) = setup();
    container.set_account_status(AccountStatus::Unknown).await;
    let mut stream = service.account_status_stream();
    assert_eq!(stream.next().await, Some(Ok(AccountStatus::Unknown)));
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn current_user_stream() {
    let (container, service) = setup();
    container.set_user(UserId::from("_bob"), None).await;

    let user = service.current_user_stream().next().await.unwrap().unwrap();
    assert_eq!(user.id, UserId::from("_bob"));
    assert!(user.name.is_none());
}

#[tokio::test]
async fn calls_are_scheduled_on_first_poll() {
    let (container, service) = setup();
    let stream = service.create_stream(Task::new("lazy", "open", 1));
    assert_eq!(container.record_count().await, 0);

    let saved: Vec<_> = stream.collect().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(container.record_count().await, 1);
}

// ── Records ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_update_read_delete_streams() {
    let (_container, service) = setup();
    let mut task = Task::new("stream me", "open", 5);

    let saved = service
        .create_stream(task.clone())
        .next()
        .await
        .unwrap()
        .unwrap();
    assert!(saved.same_content(&task.encode()));

    task.status = "closed".into();
    service
        .update_stream(task.clone())
        .next()
        .await
        .unwrap()
        .unwrap();

    let read = service
        .read_stream::<Task>(task.id.clone())
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, task);

    let deleted = service
        .delete_stream(task.clone())
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted, task.id);

    let missing: Vec<_> = service.read_stream::<Task>(task.id.clone()).collect().await;
    assert_eq!(missing, vec![Err(ClientError::NotFound(task.id))]);
}

#[tokio::test]
async fn write_errors_match_between_conventions() {
    let (container, service) = setup();
    let task = Task::new("x", "open", 1);

    container.fail_next_write(RemoteError::QuotaExceeded).await;
    let via_async = service.create(&task).await;

    container.fail_next_write(RemoteError::QuotaExceeded).await;
    let via_stream: Vec<_> = service.create_stream(task).collect().await;

    assert_eq!(via_stream, vec![via_async]);
}

#[tokio::test]
async fn read_many_stream_emits_each_entity() {
    let (_container, service) = setup();
    let tasks = seed_open_tasks(&service, 4).await;

    let streamed: Vec<Task> = service
        .read_many_stream::<Task>(Task::query().sort_by("createdAt", true))
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(streamed, tasks);
}

#[tokio::test]
async fn read_many_stream_surfaces_query_failure() {
    let (container, service) = setup();
    seed_open_tasks(&service, 3).await;
    container
        .fail_queries_after(1, RemoteError::ServiceUnavailable("maintenance".into()))
        .await;

    let streamed: Vec<_> = service
        .read_many_stream::<Task>(Task::query().sort_by("createdAt", true))
        .collect()
        .await;
    assert_eq!(streamed.len(), 2);
    assert!(streamed[0].is_ok());
    assert_eq!(
        streamed[1],
        Err(ClientError::Query(RemoteError::ServiceUnavailable(
            "maintenance".into()
        )))
    );

    let via_async = service
        .read_many::<Task>(Task::query().sort_by("createdAt", true))
        .await;
    assert_eq!(via_async.unwrap_err(), streamed[1].clone().unwrap_err());
}

// ── Subscriptions & permission ───────────────────────────────────

#[tokio::test]
async fn subscription_streams() {
    let (_container, service) = setup();
    let sub = Subscription::new(Task::RECORD_TYPE);

    let saved = service
        .subscribe_stream(sub.clone())
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.id, sub.id);

    let listed = service
        .subscriptions_stream()
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.len(), 1);

    let removed = service
        .unsubscribe_stream(sub.id.clone())
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed, sub.id);
}

#[tokio::test]
async fn permission_stream() {
    let authority = Arc::new(MemoryAuthority::new(false));
    let service =
        CloudService::new(Arc::new(MemoryContainer::default())).with_notifications(authority);

    let granted: Vec<_> = service
        .request_notification_permission_stream(PermissionOptions::default())
        .collect()
        .await;
    assert_eq!(granted, vec![Ok(false)]);
}
