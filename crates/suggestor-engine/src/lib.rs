pub mod decision;
pub mod error;
pub mod ids;
pub mod manager;
pub mod notifier;
pub mod predictor;
pub mod sweeper;

pub mod test_support;

pub use error::{NotifyError, PredictionError, SuggestError};
pub use ids::{IdGenerator, TimestampIdGenerator};
pub use manager::{GenerateOutcome, SuggestionManager};
pub use notifier::{BroadcastNotifier, LogNotifier, Notifier};
pub use predictor::{CommandPredictor, Predictor};
pub use sweeper::Sweeper;
