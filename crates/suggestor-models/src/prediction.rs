use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A successful model verdict for one token snapshot.
///
/// `confidence` drives gating and sizing; `probability` is the model's
/// raw class probability and only feeds the reasoning tags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub confidence: Decimal,
    pub probability: Decimal,
}
