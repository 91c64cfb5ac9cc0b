pub mod config;
pub mod notification;
pub mod prediction;
pub mod stats;
pub mod suggestion;
pub mod token;

pub use config::{ModelConfig, SuggestionConfig, SuggestorConfig, TradingConfig};
pub use notification::{Notification, NotificationCategory};
pub use prediction::Prediction;
pub use stats::SuggestionStats;
pub use suggestion::{
    AcceptedSuggestion, Suggestion, SuggestionStatus, TradeAction, TradeInstruction,
};
pub use token::{TokenIdentity, TokenMetrics, TokenSnapshot};
