use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use suggestor_models::stats::SuggestionStats;
use suggestor_models::suggestion::SuggestionStatus;

use crate::store::SuggestionStore;

impl SuggestionStore {
    /// Aggregate counts and rates over the retained history window.
    ///
    /// `pending` counts live suggestions still decidable at `now`, so a
    /// record past its deadline stops counting even before the sweep
    /// transitions it.
    pub fn statistics(&self, now: DateTime<Utc>) -> SuggestionStats {
        let total = self.history_len();
        if total == 0 {
            return SuggestionStats::default();
        }

        let mut accepted = 0usize;
        let mut rejected = 0usize;
        let mut confidence_sum = Decimal::ZERO;
        for record in self.history_records() {
            match record.status {
                SuggestionStatus::Accepted => accepted += 1,
                SuggestionStatus::Rejected => rejected += 1,
                _ => {}
            }
            confidence_sum += record.confidence;
        }

        let total_dec = Decimal::from(total);
        SuggestionStats {
            total,
            accepted,
            rejected,
            pending: self.list_live(now).len(),
            acceptance_rate: Decimal::from(accepted) / total_dec,
            avg_confidence: confidence_sum / total_dec,
        }
    }
}
