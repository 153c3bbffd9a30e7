//! Core type definitions for RecordKit.
//!
//! This crate defines the values that cross the boundary between an
//! application and a remote record container:
//! - Record, user and subscription identifiers
//! - [`Record`], the opaque key/value bag the container stores
//! - [`QueryDescriptor`], [`Predicate`] and [`SortKey`] for multi-record fetches
//! - [`AccountStatus`] and user identity types
//! - [`Subscription`] registrations for change notifications
//!
//! Nothing here talks to a container; see `recordkit-client` for that.

mod account;
mod ids;
pub mod query;
mod record;
mod subscription;

pub use account::{AccountStatus, Participant, PermissionOptions, UserIdentity};
pub use ids::{RecordId, SubscriptionId, UserId};
pub use query::{Comparison, Predicate, QueryDescriptor, SortKey};
pub use record::Record;
pub use subscription::{NotificationInfo, Subscription, SubscriptionTriggers};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur building or converting RecordKit values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record fields must serialize to an object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("query limit must be positive")]
    InvalidLimit,

    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
}
