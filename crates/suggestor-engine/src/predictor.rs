use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use suggestor_models::config::ModelConfig;
use suggestor_models::prediction::Prediction;
use suggestor_models::token::TokenSnapshot;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::PredictionError;

/// Produces a model verdict for a token snapshot.
///
/// Failures are expected operational states, not bugs; the manager maps
/// them to conservative hold suggestions.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, snapshot: &TokenSnapshot) -> Result<Prediction, PredictionError>;
}

/// Invokes the prediction model as a subprocess, passing the feature
/// payload as the final argument and reading one JSON verdict from
/// stdout. The default configuration runs `python3 ml/model.py predict '<json>'`.
pub struct CommandPredictor {
    config: ModelConfig,
}

impl CommandPredictor {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Predictor for CommandPredictor {
    async fn predict(&self, snapshot: &TokenSnapshot) -> Result<Prediction, PredictionError> {
        let payload = snapshot.feature_payload().to_string();
        debug!(command = %self.config.command, token = %snapshot.symbol, "Invoking prediction model");

        let result = tokio::time::timeout(Duration::from_secs(self.config.timeout_seconds), async {
            Command::new(&self.config.command)
                .args(&self.config.args)
                .arg(&payload)
                .output()
                .await
        })
        .await
        .map_err(|_| PredictionError::Timeout(self.config.timeout_seconds))?
        .map_err(|e| {
            PredictionError::Unavailable(format!("Failed to spawn {}: {e}", self.config.command))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(status = %result.status, stderr = %stderr, "Prediction model failed");
            return Err(PredictionError::Unavailable(format!(
                "model exited {}: {}",
                result.status, stderr
            )));
        }

        parse_verdict(&String::from_utf8_lossy(&result.stdout))
    }
}

/// Check if the configured model command responds at all.
pub async fn check_model_available(config: &ModelConfig) -> bool {
    match Command::new(&config.command).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Raw verdict printed by the model CLI.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    confidence: Option<Decimal>,
    probability: Option<Decimal>,
    error: Option<String>,
}

/// Parse the model's stdout into a verdict.
///
/// The model reports handled failures as JSON with an `error` field, so
/// that check runs before the field check.
pub(crate) fn parse_verdict(raw: &str) -> Result<Prediction, PredictionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PredictionError::Malformed(
            "model returned empty output".to_string(),
        ));
    }

    let verdict: RawVerdict = serde_json::from_str(trimmed)
        .map_err(|e| PredictionError::Malformed(format!("invalid JSON: {e}")))?;

    if let Some(reason) = verdict.error {
        return Err(PredictionError::Unavailable(reason));
    }

    match (verdict.confidence, verdict.probability) {
        (Some(confidence), Some(probability)) => Ok(Prediction {
            confidence,
            probability,
        }),
        _ => Err(PredictionError::Malformed(
            "verdict missing confidence or probability".to_string(),
        )),
    }
}
