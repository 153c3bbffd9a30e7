//! Async and stream facade over a remote cloud record container.
//!
//! # Architecture
//!
//! - **Container**: [`CloudContainer`] is the platform client seam. One
//!   handle is shared process-wide behind an `Arc` and injected into the
//!   service, so tests can substitute [`memory::MemoryContainer`].
//! - **Codec**: [`RecordCodec`] converts application entities to and from
//!   the container's opaque [`Record`](recordkit_types::Record)s.
//! - **Query adapter**: [`QueryStreamAdapter`] turns the container's
//!   push-style query callbacks into a pull-based [`QueryStream`].
//! - **Service**: [`CloudService`] exposes account, record and
//!   subscription operations as `async fn`s, and as streams through the
//!   `*_stream` methods in [`reactive`].
//!
//! There is no caching and no retrying: every call is one round trip and
//! every failure is returned to the caller.
//!
//! # Example
//!
//! ```
//! use recordkit_client::memory::MemoryContainer;
//! use recordkit_client::CloudService;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let service = CloudService::new(Arc::new(MemoryContainer::default()));
//! assert!(service.check_account().await.unwrap());
//! # });
//! ```

mod codec;
pub mod config;
pub mod container;
mod error;
pub mod memory;
pub mod query;
pub mod reactive;
mod service;

pub use codec::RecordCodec;
pub use config::{ContainerConfig, DatabaseScope};
pub use container::{CloudContainer, NotificationAuthority, QueryAbandoned, QuerySink};
pub use error::{AccountError, ClientError, ClientResult, RemoteError, RemoteResult};
pub use query::{QueryStream, QueryStreamAdapter};
pub use reactive::Observable;
pub use service::CloudService;
