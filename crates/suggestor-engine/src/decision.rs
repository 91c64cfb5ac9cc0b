use rust_decimal::Decimal;
use suggestor_models::prediction::Prediction;
use suggestor_models::token::TokenSnapshot;

use crate::error::PredictionError;

/// Tag attached when the model's class probability clears 0.7.
pub const STRONG_SIGNAL: &str = "Strong buy signal from ML model";
pub const MODERATE_SIGNAL: &str = "Moderate buy signal";
pub const HIGH_VOLUME: &str = "High trading volume detected";
pub const GOOD_LIQUIDITY: &str = "Good liquidity available";
pub const HEALTHY_HOLDERS: &str = "Healthy holder distribution";
/// Sole tag on conservative fallback suggestions.
pub const MODEL_UNAVAILABLE: &str = "ML model unavailable - conservative approach";

/// What the rules concluded for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Confident prediction: an actionable buy with a sized amount.
    Buy {
        amount: Decimal,
        confidence: Decimal,
        probability: Decimal,
        reasoning: Vec<String>,
    },
    /// The model was unreachable; fall back to a hold suggestion.
    Conservative {
        reason: String,
        confidence: Decimal,
        reasoning: Vec<String>,
    },
    /// Confidence below the gate; no suggestion is materialized.
    Filtered { confidence: Decimal },
}

/// Apply the decision rules to one prediction outcome.
///
/// A prediction failure is an expected operational state and maps to
/// `Conservative`, never to an error.
pub fn evaluate(
    snapshot: &TokenSnapshot,
    base_amount: Decimal,
    min_confidence: Decimal,
    prediction: &Result<Prediction, PredictionError>,
) -> Decision {
    match prediction {
        Err(err) => Decision::Conservative {
            reason: err.to_string(),
            confidence: Decimal::new(3, 1),
            reasoning: vec![MODEL_UNAVAILABLE.to_string()],
        },
        Ok(p) if p.confidence < min_confidence => Decision::Filtered {
            confidence: p.confidence,
        },
        Ok(p) => Decision::Buy {
            amount: size_amount(base_amount, p.confidence),
            confidence: p.confidence,
            probability: p.probability,
            reasoning: reasoning_tags(snapshot, p),
        },
    }
}

/// Scale the base amount by confidence. The result never exceeds 1.5x
/// base, even if the model reports confidence above 1.0.
pub fn size_amount(base_amount: Decimal, confidence: Decimal) -> Decimal {
    let cap = base_amount * Decimal::new(15, 1);
    (base_amount * confidence).min(cap)
}

/// Human-readable tags explaining the suggestion.
///
/// Signal strength comes from the class probability; the remaining tags
/// fire on absolute market-size thresholds.
pub fn reasoning_tags(snapshot: &TokenSnapshot, prediction: &Prediction) -> Vec<String> {
    let mut tags = Vec::new();
    if prediction.probability > Decimal::new(7, 1) {
        tags.push(STRONG_SIGNAL.to_string());
    } else if prediction.probability > Decimal::new(6, 1) {
        tags.push(MODERATE_SIGNAL.to_string());
    }
    if snapshot.volume.is_some_and(|v| v > Decimal::from(100_000)) {
        tags.push(HIGH_VOLUME.to_string());
    }
    if snapshot.liquidity.is_some_and(|l| l > Decimal::from(50_000)) {
        tags.push(GOOD_LIQUIDITY.to_string());
    }
    if snapshot.holders.is_some_and(|h| h > 100) {
        tags.push(HEALTHY_HOLDERS.to_string());
    }
    tags
}
