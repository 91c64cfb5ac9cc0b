use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing;

use crate::manager::SuggestionManager;

/// Periodic expiry sweep over the live index.
///
/// Listing already hides overdue suggestions; the sweep performs the
/// durable transition to `Expired` and keeps the live index small.
pub struct Sweeper {
    manager: Arc<SuggestionManager>,
    interval: Duration,
    cancel: CancellationToken,
}

impl Sweeper {
    pub fn new(manager: Arc<SuggestionManager>, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a CancellationToken that can be used to trigger shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until cancelled. Sweep failures are logged, never fatal.
    pub async fn run(&self) {
        tracing::info!(interval_seconds = self.interval.as_secs(), "Expiry sweeper starting");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Expiry sweeper shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {
                    match self.manager.cleanup_expired(chrono::Utc::now()) {
                        Ok(expired) if expired > 0 => {
                            tracing::info!(expired, "Swept overdue suggestions");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Expiry sweep failed");
                        }
                    }
                }
            }
        }
    }
}
