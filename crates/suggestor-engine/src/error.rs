use suggestor_models::suggestion::SuggestionStatus;
use suggestor_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PredictionError {
    #[error("Prediction unavailable: {0}")]
    Unavailable(String),

    #[error("Prediction timed out after {0} seconds")]
    Timeout(u64),

    #[error("Malformed prediction output: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone)]
pub enum NotifyError {
    #[error("Notification dispatch failed: {0}")]
    Dispatch(String),
}

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Suggestion not found: {0}")]
    NotFound(String),

    #[error("Suggestion {id} already {status}")]
    AlreadyDecided { id: String, status: SuggestionStatus },

    #[error("Suggestion expired: {0}")]
    Expired(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Suggestion state unavailable: {0}")]
    StateLock(String),
}
