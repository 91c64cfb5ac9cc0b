use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the suggestion stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestorConfig {
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Sizing inputs shared by every suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingConfig {
    /// Baseline trade size in SOL before confidence scaling.
    #[serde(default = "default_base_amount")]
    pub base_amount: Decimal,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            base_amount: default_base_amount(),
        }
    }
}

/// Lifecycle knobs for generated suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionConfig {
    /// Seconds a buy suggestion stays decidable before it expires.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// History records retained; the oldest fall off first.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Predictions below this confidence never become suggestions.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Decimal,
    /// Optional deadline for conservative hold suggestions. `None` keeps
    /// them decidable indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_ttl_seconds: Option<u64>,
    /// Seconds between background expiry sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            history_capacity: default_history_capacity(),
            min_confidence: default_min_confidence(),
            hold_ttl_seconds: None,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

/// How to invoke the prediction model CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Interpreter or binary to spawn.
    #[serde(default = "default_model_command")]
    pub command: String,
    /// Arguments placed before the JSON feature payload.
    #[serde(default = "default_model_args")]
    pub args: Vec<String>,
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            command: default_model_command(),
            args: default_model_args(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

fn default_base_amount() -> Decimal {
    Decimal::ONE
}
fn default_ttl_seconds() -> u64 {
    300
}
fn default_history_capacity() -> usize {
    100
}
fn default_min_confidence() -> Decimal {
    Decimal::new(6, 1)
}
fn default_sweep_interval() -> u64 {
    60
}
fn default_model_command() -> String {
    "python3".to_string()
}
fn default_model_args() -> Vec<String> {
    vec!["ml/model.py".to_string(), "predict".to_string()]
}
fn default_model_timeout() -> u64 {
    10
}
