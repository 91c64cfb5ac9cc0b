//! Mock collaborators for exercising the suggestion lifecycle without a
//! real model subprocess or delivery channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use suggestor_models::notification::{Notification, NotificationCategory};
use suggestor_models::prediction::Prediction;
use suggestor_models::suggestion::Suggestion;
use suggestor_models::token::TokenSnapshot;

use crate::error::{NotifyError, PredictionError};
use crate::ids::IdGenerator;
use crate::notifier::Notifier;
use crate::predictor::Predictor;

/// Predictor returning one canned response for every call.
pub struct MockPredictor {
    response: Result<Prediction, PredictionError>,
}

impl MockPredictor {
    /// Succeeds with the given confidence and probability.
    pub fn confident(confidence: Decimal, probability: Decimal) -> Self {
        Self {
            response: Ok(Prediction {
                confidence,
                probability,
            }),
        }
    }

    /// Fails every call with `PredictionError::Unavailable`.
    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(PredictionError::Unavailable(reason.to_string())),
        }
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, _snapshot: &TokenSnapshot) -> Result<Prediction, PredictionError> {
        self.response.clone()
    }
}

/// Notifier recording every dispatched notification.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        message: &str,
        category: NotificationCategory,
        suggestion: &Suggestion,
    ) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Notification {
                message: message.to_string(),
                category,
                suggestion: suggestion.clone(),
            });
        }
        Ok(())
    }
}

/// Notifier that fails every dispatch.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(
        &self,
        _message: &str,
        _category: NotificationCategory,
        _suggestion: &Suggestion,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Dispatch(
            "simulated delivery failure".to_string(),
        ))
    }
}

/// Id generator producing `<prefix>-1`, `<prefix>-2`, ...
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// Id generator returning the same id every call.
pub struct FixedIdGenerator(pub String);

impl IdGenerator for FixedIdGenerator {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

/// Snapshot with strong market signals: high volume, deep liquidity, a
/// healthy holder base.
pub fn hot_token() -> TokenSnapshot {
    TokenSnapshot {
        volume: Some(Decimal::from(150_000)),
        liquidity: Some(Decimal::from(75_000)),
        holders: Some(250),
        volatility: Some(Decimal::new(32, 2)),
        ..TokenSnapshot::new("BONK", "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "Bonk")
    }
}

/// Snapshot with every optional signal absent.
pub fn bare_token() -> TokenSnapshot {
    TokenSnapshot::new("GHOST", "Ghost1111111111111111111111111111111111111", "Ghost Coin")
}
