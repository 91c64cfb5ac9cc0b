//! Suggestor - Trade Suggestion Lifecycle Manager
//!
//! Turns token market snapshots into bounded-lifetime trade suggestions by
//! consulting an external ML model subprocess, and tracks each suggestion
//! through accept, reject, or expiry.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use suggestor::models::{TokenSnapshot, Suggestion, SuggestionStatus};
//! use suggestor::models::config::SuggestorConfig;
//! use suggestor::engine::{SuggestionManager, CommandPredictor, Predictor};
//! use suggestor::engine::{BroadcastNotifier, Notifier, Sweeper};
//! ```

pub use suggestor_engine as engine;
pub use suggestor_models as models;
pub use suggestor_store as store;

pub mod ops;

use std::sync::Arc;
use std::time::Duration;

use suggestor_engine::{CommandPredictor, LogNotifier, SuggestionManager, Sweeper};
use suggestor_models::config::SuggestorConfig;

/// Build a SuggestionManager from configuration, wired to the configured
/// model command and log-based notifications.
pub fn build_manager(config: &SuggestorConfig) -> Arc<SuggestionManager> {
    let predictor = Arc::new(CommandPredictor::new(config.model.clone()));
    let notifier = Arc::new(LogNotifier);

    Arc::new(SuggestionManager::new(
        config.trading.clone(),
        config.suggestions.clone(),
        predictor,
        notifier,
    ))
}

/// Build the background expiry sweeper for a manager.
pub fn build_sweeper(config: &SuggestorConfig, manager: Arc<SuggestionManager>) -> Sweeper {
    Sweeper::new(
        manager,
        Duration::from_secs(config.suggestions.sweep_interval_seconds),
    )
}
