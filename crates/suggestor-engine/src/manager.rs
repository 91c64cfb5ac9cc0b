use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use suggestor_models::config::{SuggestionConfig, TradingConfig};
use suggestor_models::notification::NotificationCategory;
use suggestor_models::stats::SuggestionStats;
use suggestor_models::suggestion::{
    AcceptedSuggestion, Suggestion, SuggestionStatus, TradeAction, TradeInstruction,
};
use suggestor_models::token::TokenSnapshot;
use suggestor_store::SuggestionStore;
use tracing::{debug, info, warn};

use crate::decision::{self, Decision};
use crate::error::SuggestError;
use crate::ids::{IdGenerator, TimestampIdGenerator};
use crate::notifier::Notifier;
use crate::predictor::Predictor;

/// Outcome of a generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateOutcome {
    /// A buy suggestion was created and is awaiting a decision.
    Suggested(Suggestion),
    /// The model failed; a conservative hold was created instead.
    Conservative {
        reason: String,
        suggestion: Suggestion,
    },
    /// Confidence fell below the gate; nothing was created.
    Filtered { confidence: Decimal },
}

impl GenerateOutcome {
    /// The created suggestion, if the outcome produced one.
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            GenerateOutcome::Suggested(s) => Some(s),
            GenerateOutcome::Conservative { suggestion, .. } => Some(suggestion),
            GenerateOutcome::Filtered { .. } => None,
        }
    }
}

/// Owns suggestion state and drives every lifecycle transition.
///
/// All state sits behind one mutex. Lock scopes never span an await:
/// predictions run before the lock, notifications after it.
pub struct SuggestionManager {
    store: Mutex<SuggestionStore>,
    predictor: Arc<dyn Predictor>,
    notifier: Arc<dyn Notifier>,
    ids: Arc<dyn IdGenerator>,
    trading: TradingConfig,
    config: SuggestionConfig,
}

impl SuggestionManager {
    pub fn new(
        trading: TradingConfig,
        config: SuggestionConfig,
        predictor: Arc<dyn Predictor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store: Mutex::new(SuggestionStore::new(config.history_capacity)),
            predictor,
            notifier,
            ids: Arc::new(TimestampIdGenerator),
            trading,
            config,
        }
    }

    /// Replace the id generator. Tests use this to pin ids.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, SuggestionStore>, SuggestError> {
        self.store
            .lock()
            .map_err(|e| SuggestError::StateLock(format!("Store mutex poisoned: {e}")))
    }

    /// Evaluate a token snapshot and, when warranted, create a pending
    /// suggestion.
    ///
    /// A failed prediction degrades to a conservative hold rather than
    /// an error; only store and lock failures surface as `Err`.
    pub async fn generate(
        &self,
        snapshot: &TokenSnapshot,
    ) -> Result<GenerateOutcome, SuggestError> {
        debug!(token = %snapshot.symbol, "Evaluating token");

        // 1. Ask the model (no lock held across the await)
        let prediction = self.predictor.predict(snapshot).await;

        // 2. Apply the decision rules
        let decision = decision::evaluate(
            snapshot,
            self.trading.base_amount,
            self.config.min_confidence,
            &prediction,
        );

        // 3. Materialize and announce
        match decision {
            Decision::Filtered { confidence } => {
                debug!(token = %snapshot.symbol, confidence = %confidence, "Below confidence gate");
                Ok(GenerateOutcome::Filtered { confidence })
            }
            Decision::Conservative {
                reason,
                confidence,
                reasoning,
            } => {
                warn!(token = %snapshot.symbol, error = %reason, "Prediction failed, holding");
                let suggestion = self.build_suggestion(
                    snapshot,
                    TradeAction::Hold,
                    None,
                    confidence,
                    Decimal::ZERO,
                    reasoning,
                    self.config.hold_ttl_seconds,
                );
                self.lock_store()?.insert(suggestion.clone())?;
                Ok(GenerateOutcome::Conservative { reason, suggestion })
            }
            Decision::Buy {
                amount,
                confidence,
                probability,
                reasoning,
            } => {
                let suggestion = self.build_suggestion(
                    snapshot,
                    TradeAction::Buy,
                    Some(amount),
                    confidence,
                    probability,
                    reasoning,
                    Some(self.config.ttl_seconds),
                );
                self.lock_store()?.insert(suggestion.clone())?;
                info!(
                    id = %suggestion.id,
                    token = %suggestion.token.symbol,
                    confidence = %suggestion.confidence,
                    amount = %amount,
                    "Trade suggestion created"
                );
                self.dispatch(
                    &format!(
                        "Trade suggestion: {} at {} confidence",
                        suggestion.token.symbol, suggestion.confidence
                    ),
                    NotificationCategory::Suggestion,
                    &suggestion,
                )
                .await;
                Ok(GenerateOutcome::Suggested(suggestion))
            }
        }
    }

    fn build_suggestion(
        &self,
        snapshot: &TokenSnapshot,
        action: TradeAction,
        amount: Option<Decimal>,
        confidence: Decimal,
        probability: Decimal,
        reasoning: Vec<String>,
        ttl_seconds: Option<u64>,
    ) -> Suggestion {
        let now = Utc::now();
        Suggestion {
            id: self.ids.generate(),
            token: snapshot.identity(),
            action,
            amount,
            confidence,
            probability,
            reasoning,
            metrics: snapshot.metrics(),
            created_at: now,
            expires_at: ttl_seconds.map(|secs| now + Duration::seconds(secs as i64)),
            status: SuggestionStatus::Pending,
            accepted_at: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    /// Decision-time guards shared by accept and reject.
    ///
    /// Discovering an overdue deadline here performs the `Expired`
    /// transition immediately rather than waiting for the sweep.
    fn guard_decidable(
        store: &mut SuggestionStore,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SuggestError> {
        let current = store
            .get(id)
            .ok_or_else(|| SuggestError::NotFound(id.to_string()))?;
        if current.status.is_terminal() {
            return Err(SuggestError::AlreadyDecided {
                id: id.to_string(),
                status: current.status,
            });
        }
        if current.is_expired_at(now) {
            if let Some(record) = store.get_mut(id) {
                record.status = SuggestionStatus::Expired;
            }
            store.remove_live(id);
            return Err(SuggestError::Expired(id.to_string()));
        }
        Ok(())
    }

    /// Accept a pending suggestion, producing the instruction a trade
    /// executor needs.
    pub async fn accept(&self, id: &str) -> Result<AcceptedSuggestion, SuggestError> {
        let accepted = {
            let mut store = self.lock_store()?;
            let now = Utc::now();
            Self::guard_decidable(&mut store, id, now)?;
            let record = store
                .get_mut(id)
                .ok_or_else(|| SuggestError::NotFound(id.to_string()))?;
            record.status = SuggestionStatus::Accepted;
            record.accepted_at = Some(now);
            let snapshot = record.clone();
            store.remove_live(id);
            snapshot
        };

        info!(id = %accepted.id, token = %accepted.token.symbol, "Trade suggestion accepted");
        self.dispatch(
            &format!("Trade accepted: {}", accepted.token.symbol),
            NotificationCategory::Success,
            &accepted,
        )
        .await;

        let instruction = TradeInstruction::for_suggestion(&accepted);
        Ok(AcceptedSuggestion {
            suggestion: accepted,
            instruction,
        })
    }

    /// Reject a pending suggestion, optionally recording why.
    ///
    /// Same guards as accept: terminal records report `AlreadyDecided`,
    /// overdue ones expire.
    pub async fn reject(
        &self,
        id: &str,
        reason: Option<String>,
    ) -> Result<Suggestion, SuggestError> {
        let rejected = {
            let mut store = self.lock_store()?;
            let now = Utc::now();
            Self::guard_decidable(&mut store, id, now)?;
            let record = store
                .get_mut(id)
                .ok_or_else(|| SuggestError::NotFound(id.to_string()))?;
            record.status = SuggestionStatus::Rejected;
            record.rejected_at = Some(now);
            record.rejection_reason = reason;
            let snapshot = record.clone();
            store.remove_live(id);
            snapshot
        };

        info!(
            id = %rejected.id,
            token = %rejected.token.symbol,
            reason = ?rejected.rejection_reason,
            "Trade suggestion rejected"
        );
        self.dispatch(
            &format!("Trade rejected: {}", rejected.token.symbol),
            NotificationCategory::Info,
            &rejected,
        )
        .await;

        Ok(rejected)
    }

    /// Look up any tracked suggestion, live or decided.
    pub fn get(&self, id: &str) -> Result<Option<Suggestion>, SuggestError> {
        Ok(self.lock_store()?.get(id).cloned())
    }

    /// Pending suggestions still decidable at `now`, oldest first.
    pub fn list_live(&self, now: DateTime<Utc>) -> Result<Vec<Suggestion>, SuggestError> {
        Ok(self.lock_store()?.list_live(now))
    }

    /// Most recent history records, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<Suggestion>, SuggestError> {
        Ok(self.lock_store()?.history(limit))
    }

    /// Aggregate statistics over the retained history.
    pub fn statistics(&self) -> Result<SuggestionStats, SuggestError> {
        Ok(self.lock_store()?.statistics(Utc::now()))
    }

    /// Transition every overdue pending suggestion to `Expired`.
    /// Returns how many transitioned.
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, SuggestError> {
        Ok(self.lock_store()?.expire_overdue(now))
    }

    async fn dispatch(
        &self,
        message: &str,
        category: NotificationCategory,
        suggestion: &Suggestion,
    ) {
        if let Err(e) = self.notifier.notify(message, category, suggestion).await {
            warn!(id = %suggestion.id, error = %e, "Notification dispatch failed");
        }
    }
}
