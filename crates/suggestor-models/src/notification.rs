use serde::{Deserialize, Serialize};

use crate::suggestion::Suggestion;

/// Channel a notification is tagged with; downstream consumers route on
/// it (alert UI, execution bot, audit log).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// A fresh suggestion awaiting a decision.
    Suggestion,
    /// A suggestion was accepted.
    Success,
    /// Informational, e.g. a rejection.
    Info,
    /// Infrastructure failure reports; not emitted by the lifecycle
    /// itself.
    Error,
}

/// A single dispatched notification, carrying the full suggestion so
/// consumers need no follow-up lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub category: NotificationCategory,
    pub suggestion: Suggestion,
}
