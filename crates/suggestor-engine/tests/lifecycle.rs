//! Integration tests for the suggestion lifecycle: generation through
//! accept/reject, lazy expiry, bounded history, statistics, and graceful
//! sweeper shutdown via CancellationToken.
//!
//! Everything runs against mock collaborators; no model subprocess is
//! spawned. Run with:
//! ```bash
//! cargo test -p suggestor-engine --test lifecycle
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;
use suggestor_engine::decision;
use suggestor_engine::error::SuggestError;
use suggestor_engine::manager::{GenerateOutcome, SuggestionManager};
use suggestor_engine::notifier::BroadcastNotifier;
use suggestor_engine::sweeper::Sweeper;
use suggestor_engine::test_support::{
    bare_token, hot_token, MockPredictor, RecordingNotifier, SequentialIdGenerator,
};
use suggestor_models::config::{SuggestionConfig, TradingConfig};
use suggestor_models::notification::NotificationCategory;
use suggestor_models::suggestion::{SuggestionStatus, TradeAction};

fn manager_with(
    predictor: MockPredictor,
    notifier: Arc<RecordingNotifier>,
    config: SuggestionConfig,
) -> SuggestionManager {
    SuggestionManager::new(
        TradingConfig {
            base_amount: dec!(1),
        },
        config,
        Arc::new(predictor),
        notifier,
    )
    .with_id_generator(Arc::new(SequentialIdGenerator::new("sug-test")))
}

fn short_ttl(ttl_seconds: u64) -> SuggestionConfig {
    SuggestionConfig {
        ttl_seconds,
        ..SuggestionConfig::default()
    }
}

/// A strong prediction on a liquid token becomes a pending buy suggestion
/// with a sized amount, reasoning tags, a deadline, and a notification.
#[tokio::test]
async fn strong_prediction_creates_buy_suggestion() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.9), dec!(0.75)),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    let suggestion = match outcome {
        GenerateOutcome::Suggested(s) => s,
        other => panic!("Expected a buy suggestion, got {other:?}"),
    };

    assert_eq!(suggestion.action, TradeAction::Buy);
    assert_eq!(suggestion.amount, Some(dec!(0.9)));
    assert_eq!(suggestion.status, SuggestionStatus::Pending);
    assert_eq!(
        suggestion.reasoning,
        vec![
            decision::STRONG_SIGNAL,
            decision::HIGH_VOLUME,
            decision::GOOD_LIQUIDITY,
            decision::HEALTHY_HOLDERS,
        ]
    );

    let deadline = suggestion.expires_at.expect("buy suggestions carry a deadline");
    assert_eq!((deadline - suggestion.created_at).num_seconds(), 300);

    let live = manager.list_live(Utc::now()).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, suggestion.id);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, NotificationCategory::Suggestion);
    assert!(sent[0].message.contains("BONK"));
}

/// A prediction below the confidence gate leaves no trace: no record, no
/// history entry, no notification.
#[tokio::test]
async fn weak_prediction_is_filtered_without_state() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.5), dec!(0.4)),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    assert!(
        matches!(outcome, GenerateOutcome::Filtered { confidence } if confidence == dec!(0.5))
    );
    assert!(manager.list_live(Utc::now()).unwrap().is_empty());
    assert!(manager.history(20).unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

/// When the model is down the system degrades to a conservative hold
/// that stays decidable and carries no deadline.
#[tokio::test]
async fn failed_prediction_degrades_to_hold() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::failing("model offline"),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let outcome = manager.generate(&bare_token()).await.unwrap();
    let (reason, suggestion) = match outcome {
        GenerateOutcome::Conservative { reason, suggestion } => (reason, suggestion),
        other => panic!("Expected conservative outcome, got {other:?}"),
    };

    assert!(reason.contains("model offline"));
    assert_eq!(suggestion.action, TradeAction::Hold);
    assert_eq!(suggestion.confidence, dec!(0.3));
    assert_eq!(suggestion.amount, None);
    assert_eq!(suggestion.expires_at, None);
    assert_eq!(suggestion.reasoning, vec![decision::MODEL_UNAVAILABLE]);

    // the hold is a real pending suggestion and can be decided later
    let accepted = manager.accept(&suggestion.id).await.unwrap();
    assert_eq!(accepted.suggestion.status, SuggestionStatus::Accepted);
    assert_eq!(accepted.instruction.amount, None);

    // conservative generation is silent; the acceptance notifies
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, NotificationCategory::Success);
}

/// Accepting finalizes the record and returns an executable instruction.
#[tokio::test]
async fn accept_returns_instruction_and_finalizes() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    let id = outcome.suggestion().unwrap().id.clone();

    let accepted = manager.accept(&id).await.unwrap();
    assert_eq!(accepted.suggestion.status, SuggestionStatus::Accepted);
    assert!(accepted.suggestion.accepted_at.is_some());
    assert_eq!(accepted.instruction.amount, Some(dec!(0.8)));
    assert_eq!(accepted.instruction.summary, "Execute 0.8 SOL trade on BONK");

    // live index drained, record still queryable through history
    assert!(manager.list_live(Utc::now()).unwrap().is_empty());
    let stored = manager.get(&id).unwrap().unwrap();
    assert_eq!(stored.status, SuggestionStatus::Accepted);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].category, NotificationCategory::Success);
    assert_eq!(sent[1].message, "Trade accepted: BONK");
}

/// Terminal states are sticky: a decided suggestion reports
/// `AlreadyDecided` on any further decision, in either direction.
#[tokio::test]
async fn decisions_are_exactly_once() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let first = manager.generate(&hot_token()).await.unwrap();
    let first_id = first.suggestion().unwrap().id.clone();
    let second = manager.generate(&hot_token()).await.unwrap();
    let second_id = second.suggestion().unwrap().id.clone();

    // accept then try both decisions again
    let accepted = manager.accept(&first_id).await.unwrap();
    let accepted_at = accepted.suggestion.accepted_at;

    let err = manager.accept(&first_id).await.unwrap_err();
    assert!(matches!(
        err,
        SuggestError::AlreadyDecided { status: SuggestionStatus::Accepted, .. }
    ));
    let err = manager.reject(&first_id, None).await.unwrap_err();
    assert!(matches!(err, SuggestError::AlreadyDecided { .. }));

    // the original decision is untouched
    let stored = manager.get(&first_id).unwrap().unwrap();
    assert_eq!(stored.accepted_at, accepted_at);
    assert_eq!(stored.rejected_at, None);

    // reject then try to accept
    manager.reject(&second_id, None).await.unwrap();
    let err = manager.accept(&second_id).await.unwrap_err();
    assert!(matches!(
        err,
        SuggestError::AlreadyDecided { status: SuggestionStatus::Rejected, .. }
    ));
}

/// Rejection records the caller's reason on the record.
#[tokio::test]
async fn reject_records_reason() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier.clone(),
        SuggestionConfig::default(),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    let id = outcome.suggestion().unwrap().id.clone();

    let rejected = manager
        .reject(&id, Some("too volatile".to_string()))
        .await
        .unwrap();
    assert_eq!(rejected.status, SuggestionStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("too volatile"));
    assert!(rejected.rejected_at.is_some());

    let sent = notifier.sent();
    assert_eq!(sent[1].category, NotificationCategory::Info);
    assert_eq!(sent[1].message, "Trade rejected: BONK");
}

/// Unknown ids report `NotFound` from both decision paths.
#[tokio::test]
async fn unknown_ids_are_not_found() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        SuggestionConfig::default(),
    );

    assert!(matches!(
        manager.accept("sug-missing").await.unwrap_err(),
        SuggestError::NotFound(_)
    ));
    assert!(matches!(
        manager.reject("sug-missing", None).await.unwrap_err(),
        SuggestError::NotFound(_)
    ));
}

/// Accepting past the deadline expires the record instead: the decision
/// fails, and the suggestion is spent either way.
#[tokio::test]
async fn overdue_accept_expires_instead() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier.clone(),
        short_ttl(0),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    let id = outcome.suggestion().unwrap().id.clone();

    // deadline is created_at itself; any later instant is overdue
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = manager.accept(&id).await.unwrap_err();
    assert!(matches!(err, SuggestError::Expired(ref missed) if missed == &id));

    let stored = manager.get(&id).unwrap().unwrap();
    assert_eq!(stored.status, SuggestionStatus::Expired);
    assert!(manager.list_live(Utc::now()).unwrap().is_empty());

    // expired is terminal: the other decision path reports it as decided
    let err = manager.reject(&id, None).await.unwrap_err();
    assert!(matches!(
        err,
        SuggestError::AlreadyDecided { status: SuggestionStatus::Expired, .. }
    ));

    // only the generation notification went out
    assert_eq!(notifier.sent().len(), 1);
}

/// Listing hides overdue records immediately; the explicit cleanup
/// performs the durable transition.
#[tokio::test]
async fn listing_hides_overdue_until_cleaned() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        short_ttl(0),
    );

    for _ in 0..3 {
        manager.generate(&hot_token()).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(10)).await;

    // hidden from listing, but untouched until the sweep
    assert!(manager.list_live(Utc::now()).unwrap().is_empty());
    let still_pending = manager.get("sug-test-1").unwrap().unwrap();
    assert_eq!(still_pending.status, SuggestionStatus::Pending);

    assert_eq!(manager.cleanup_expired(Utc::now()).unwrap(), 3);
    assert_eq!(
        manager.get("sug-test-1").unwrap().unwrap().status,
        SuggestionStatus::Expired
    );

    // nothing left to sweep
    assert_eq!(manager.cleanup_expired(Utc::now()).unwrap(), 0);
}

/// The background sweeper expires overdue suggestions on schedule.
#[tokio::test]
async fn sweeper_expires_overdue_suggestions() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = Arc::new(manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        short_ttl(0),
    ));

    manager.generate(&hot_token()).await.unwrap();
    manager.generate(&hot_token()).await.unwrap();

    let sweeper = Sweeper::new(manager.clone(), Duration::from_millis(50));
    let cancel = sweeper.cancel_token();
    let handle = tokio::spawn(async move { sweeper.run().await });

    // Give the sweeper time for at least one pass
    tokio::time::sleep(Duration::from_millis(150)).await;

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sweeper did not shut down in time")
        .expect("sweeper panicked");

    let history = manager.history(20).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| s.status == SuggestionStatus::Expired));
    assert!(manager.list_live(Utc::now()).unwrap().is_empty());
}

/// CancellationToken stops the sweeper promptly even mid-interval.
#[tokio::test]
async fn cancellation_stops_sweeper_promptly() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = Arc::new(manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        SuggestionConfig::default(),
    ));

    // long interval: shutdown must not wait for a tick
    let sweeper = Sweeper::new(manager, Duration::from_secs(60));
    let cancel = sweeper.cancel_token();
    let handle = tokio::spawn(async move { sweeper.run().await });

    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(
        result.is_ok(),
        "Sweeper did not respond to cancellation within 1 second"
    );
}

/// History keeps only the most recent records, newest first, while a
/// pending record evicted from history stays decidable.
#[tokio::test]
async fn history_is_bounded_and_newest_first() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        SuggestionConfig {
            history_capacity: 3,
            ..SuggestionConfig::default()
        },
    );

    for _ in 0..5 {
        manager.generate(&hot_token()).await.unwrap();
    }

    let ids: Vec<String> = manager
        .history(20)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["sug-test-5", "sug-test-4", "sug-test-3"]);

    let ids: Vec<String> = manager
        .history(2)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["sug-test-5", "sug-test-4"]);

    // evicted but still pending: decidable until decided, then released
    let evicted = manager.get("sug-test-1").unwrap().unwrap();
    assert_eq!(evicted.status, SuggestionStatus::Pending);
    assert_eq!(manager.list_live(Utc::now()).unwrap().len(), 5);

    manager.accept("sug-test-1").await.unwrap();
    assert_eq!(manager.get("sug-test-1").unwrap(), None);
}

/// Statistics aggregate the history window and live count.
#[tokio::test]
async fn statistics_track_decisions() {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = manager_with(
        MockPredictor::confident(dec!(0.8), dec!(0.7)),
        notifier,
        SuggestionConfig::default(),
    );

    // a fresh manager reports all zeros
    let empty = manager.statistics().unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.acceptance_rate, dec!(0));
    assert_eq!(empty.avg_confidence, dec!(0));

    for _ in 0..4 {
        manager.generate(&hot_token()).await.unwrap();
    }
    manager.accept("sug-test-1").await.unwrap();
    manager
        .reject("sug-test-2", Some("changed my mind".to_string()))
        .await
        .unwrap();

    let stats = manager.statistics().unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.acceptance_rate, dec!(0.25));
    assert_eq!(stats.avg_confidence, dec!(0.8));
}

/// Broadcast subscribers observe the full lifecycle in order.
#[tokio::test]
async fn broadcast_subscribers_see_lifecycle_events() {
    let notifier = Arc::new(BroadcastNotifier::new(16));
    let mut rx = notifier.subscribe();
    let manager = SuggestionManager::new(
        TradingConfig {
            base_amount: dec!(1),
        },
        SuggestionConfig::default(),
        Arc::new(MockPredictor::confident(dec!(0.8), dec!(0.7))),
        notifier.clone(),
    );

    let outcome = manager.generate(&hot_token()).await.unwrap();
    let id = outcome.suggestion().unwrap().id.clone();
    manager.accept(&id).await.unwrap();

    let first = rx.recv().await.unwrap();
    assert_eq!(first.category, NotificationCategory::Suggestion);
    assert_eq!(first.suggestion.id, id);

    let second = rx.recv().await.unwrap();
    assert_eq!(second.category, NotificationCategory::Success);
    assert_eq!(second.message, "Trade accepted: BONK");
}
