use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::token::{TokenIdentity, TokenMetrics};

/// What the suggestion proposes doing with the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    /// Issued when the model is unavailable: keep the position as is.
    Hold,
}

/// Lifecycle state of a suggestion.
///
/// `Pending` is the only non-terminal state; every transition out of it
/// is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl SuggestionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Expired => "expired",
        };
        write!(f, "{label}")
    }
}

/// A generated trade suggestion and everything needed to audit it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Store-unique id, `sug_<millis>_<hex>` under the default generator.
    pub id: String,
    pub token: TokenIdentity,
    pub action: TradeAction,
    /// Sized trade amount in SOL. Absent on hold suggestions.
    pub amount: Option<Decimal>,
    pub confidence: Decimal,
    pub probability: Decimal,
    /// Human-readable tags explaining what drove the suggestion.
    pub reasoning: Vec<String>,
    pub metrics: TokenMetrics,
    pub created_at: DateTime<Utc>,
    /// `None` means the suggestion never expires on its own.
    pub expires_at: Option<DateTime<Utc>>,
    pub status: SuggestionStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl Suggestion {
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    /// Whether the deadline has passed at `now`. A record sitting exactly
    /// on its deadline is still decidable.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(deadline) if now > deadline)
    }
}

/// Payload handed to the trade executor when a suggestion is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInstruction {
    pub token: TokenIdentity,
    pub amount: Option<Decimal>,
    pub summary: String,
}

impl TradeInstruction {
    pub fn for_suggestion(suggestion: &Suggestion) -> Self {
        let summary = match suggestion.amount {
            Some(amount) => {
                format!("Execute {} SOL trade on {}", amount, suggestion.token.symbol)
            }
            None => format!("Hold {} - no trade to execute", suggestion.token.symbol),
        };
        Self {
            token: suggestion.token.clone(),
            amount: suggestion.amount,
            summary,
        }
    }
}

/// Result of accepting a suggestion: the final record plus the
/// instruction derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedSuggestion {
    pub suggestion: Suggestion,
    pub instruction: TradeInstruction,
}
