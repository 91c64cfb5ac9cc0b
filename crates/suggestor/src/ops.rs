use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use suggestor_engine::error::SuggestError;
use suggestor_engine::manager::SuggestionManager;
use suggestor_models::token::TokenSnapshot;

/// Default number of history entries returned when the operation does not
/// ask for a specific limit.
const DEFAULT_HISTORY_LIMIT: usize = 20;

/// A single operation from the command stream.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Evaluate a token snapshot and possibly create a suggestion.
    Suggest { token: TokenSnapshot },
    /// Accept a pending suggestion, producing a trade instruction.
    Accept { id: String },
    /// Reject a pending suggestion, optionally with a reason.
    Reject {
        id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Fetch a single suggestion by id.
    Get { id: String },
    /// List pending suggestions that are still actionable.
    Live,
    /// List recent suggestions, newest first.
    History {
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Report aggregate statistics over the history window.
    Stats,
}

/// Apply one operation against the manager and return the JSON value to
/// emit for it.
///
/// Domain rejections (unknown id, already decided, expired) come back as
/// `{"error": ...}` values so the stream keeps going; infrastructure
/// failures propagate and abort the stream.
pub async fn apply(manager: &Arc<SuggestionManager>, op: Op) -> anyhow::Result<Value> {
    match op {
        Op::Suggest { token } => {
            let outcome = manager.generate(&token).await?;
            Ok(serde_json::to_value(outcome)?)
        }
        Op::Accept { id } => match manager.accept(&id).await {
            Ok(accepted) => Ok(serde_json::to_value(accepted)?),
            Err(err) => domain_error(err),
        },
        Op::Reject { id, reason } => match manager.reject(&id, reason).await {
            Ok(rejected) => Ok(serde_json::to_value(rejected)?),
            Err(err) => domain_error(err),
        },
        Op::Get { id } => Ok(serde_json::to_value(manager.get(&id)?)?),
        Op::Live => Ok(serde_json::to_value(manager.list_live(chrono::Utc::now())?)?),
        Op::History { limit } => Ok(serde_json::to_value(
            manager.history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))?,
        )?),
        Op::Stats => Ok(serde_json::to_value(manager.statistics()?)?),
    }
}

/// Suggestion-level failures are part of normal operation; everything else
/// is a real error.
fn domain_error(err: SuggestError) -> anyhow::Result<Value> {
    match err {
        SuggestError::NotFound(_)
        | SuggestError::AlreadyDecided { .. }
        | SuggestError::Expired(_) => Ok(json!({ "error": err.to_string() })),
        other => Err(other.into()),
    }
}
