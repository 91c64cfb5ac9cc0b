use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate view over the retained history window, not over everything
/// ever generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionStats {
    /// Records currently retained in history.
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Live suggestions still awaiting a decision.
    pub pending: usize,
    /// `accepted / total` in `[0, 1]`; zero when the history is empty.
    pub acceptance_rate: Decimal,
    /// Mean confidence across retained records; zero when empty.
    pub avg_confidence: Decimal,
}
