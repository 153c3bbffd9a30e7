#![allow(dead_code)]

use recordkit_client::memory::MemoryContainer;
use recordkit_client::{CloudService, RecordCodec};
use recordkit_types::{Record, RecordId};
use std::sync::Arc;
use std::time::Duration;

/// A small entity stored as a `Task` record.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub status: String,
    pub created_at: i64,
}

impl Task {
    pub fn new(title: &str, status: &str, created_at: i64) -> Self {
        Self {
            id: RecordId::new(),
            title: title.to_string(),
            status: status.to_string(),
            created_at,
        }
    }
}

impl RecordCodec for Task {
    const RECORD_TYPE: &'static str = "Task";

    fn record_id(&self) -> RecordId {
        self.id.clone()
    }

    fn encode(&self) -> Record {
        Record::new(self.id.clone(), Self::RECORD_TYPE)
            .with_field("title", self.title.as_str())
            .with_field("status", self.status.as_str())
            .with_field("createdAt", self.created_at)
    }

    fn decode(record: &Record) -> Option<Self> {
        if record.record_type != Self::RECORD_TYPE {
            return None;
        }
        Some(Self {
            id: record.id.clone(),
            title: record.get_str("title")?.to_string(),
            status: record.get_str("status")?.to_string(),
            created_at: record.get_i64("createdAt")?,
        })
    }
}

/// A `Task` record missing its title, which `Task::decode` rejects.
pub fn malformed_task(id: &str, created_at: i64) -> Record {
    Record::new(RecordId::from_name(id), "Task")
        .with_field("status", "open")
        .with_field("createdAt", created_at)
}

/// Routes `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn setup() -> (Arc<MemoryContainer>, CloudService) {
    init_tracing();
    let container = Arc::new(MemoryContainer::default());
    let service = CloudService::new(container.clone());
    (container, service)
}

/// Stores `count` open tasks with `createdAt` values 1..=count.
pub async fn seed_open_tasks(service: &CloudService, count: i64) -> Vec<Task> {
    let mut tasks = Vec::new();
    for n in 1..=count {
        let task = Task::new(&format!("task {n}"), "open", n);
        service.create(&task).await.unwrap();
        tasks.push(task);
    }
    tasks
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
