use async_trait::async_trait;
use suggestor_models::notification::{Notification, NotificationCategory};
use suggestor_models::suggestion::Suggestion;
use tokio::sync::broadcast;
use tracing::info;

use crate::error::NotifyError;

/// Delivers lifecycle notifications to interested consumers.
///
/// Dispatch failures never roll back the transition that triggered them;
/// the manager logs them and moves on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        message: &str,
        category: NotificationCategory,
        suggestion: &Suggestion,
    ) -> Result<(), NotifyError>;
}

/// Writes notifications to the log. The default sink when nothing
/// downstream subscribes.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        message: &str,
        category: NotificationCategory,
        suggestion: &Suggestion,
    ) -> Result<(), NotifyError> {
        info!(category = ?category, id = %suggestion.id, "{}", message);
        Ok(())
    }
}

/// Fans notifications out to broadcast subscribers (alert UIs, bots).
///
/// Sending into a channel with no subscribers is a normal state, not a
/// dispatch failure.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn notify(
        &self,
        message: &str,
        category: NotificationCategory,
        suggestion: &Suggestion,
    ) -> Result<(), NotifyError> {
        let event = Notification {
            message: message.to_string(),
            category,
            suggestion: suggestion.clone(),
        };
        let _ = self.sender.send(event);
        Ok(())
    }
}
