//! Query subscriptions registered with the remote notification system.

use crate::ids::SubscriptionId;
use crate::query::Predicate;
use serde::{Deserialize, Serialize};

/// Which record changes fire a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionTriggers {
    pub on_create: bool,
    pub on_update: bool,
    pub on_delete: bool,
}

impl SubscriptionTriggers {
    pub const ALL: Self = Self {
        on_create: true,
        on_update: true,
        on_delete: true,
    };

    /// True if at least one trigger is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.on_create || self.on_update || self.on_delete
    }
}

impl Default for SubscriptionTriggers {
    fn default() -> Self {
        Self::ALL
    }
}

/// Payload of the push notification sent when a subscription fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInfo {
    pub alert_body: Option<String>,
    pub should_badge: bool,
    /// Deliver silently so the app can fetch in the background.
    pub should_send_content_available: bool,
    /// Record fields copied into the notification payload.
    #[serde(default)]
    pub desired_keys: Vec<String>,
}

/// A registered interest in records of one type matching a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub record_type: String,
    #[serde(default)]
    pub predicate: Predicate,
    #[serde(default)]
    pub triggers: SubscriptionTriggers,
    #[serde(default)]
    pub notification: NotificationInfo,
}

impl Subscription {
    /// A subscription to every change of `record_type`, with a fresh id.
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            id: SubscriptionId::new(),
            record_type: record_type.into(),
            predicate: Predicate::True,
            triggers: SubscriptionTriggers::ALL,
            notification: NotificationInfo::default(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: SubscriptionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    #[must_use]
    pub fn triggers(mut self, triggers: SubscriptionTriggers) -> Self {
        self.triggers = triggers;
        self
    }

    #[must_use]
    pub fn notification(mut self, notification: NotificationInfo) -> Self {
        self.notification = notification;
        self
    }

    /// Checks the subscription can be registered.
    pub fn validate(&self) -> crate::Result<()> {
        if self.record_type.trim().is_empty() {
            return Err(crate::Error::InvalidSubscription(
                "record type is empty".to_string(),
            ));
        }
        if !self.triggers.any() {
            return Err(crate::Error::InvalidSubscription(
                "no triggers selected".to_string(),
            ));
        }
        Ok(())
    }
}
