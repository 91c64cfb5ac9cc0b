use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use suggestor_models::suggestion::{Suggestion, SuggestionStatus};
use tracing::debug;

use crate::error::StoreError;

/// Owns every tracked suggestion record.
///
/// Two indexes overlay the records: `live` holds ids still awaiting a
/// decision, `history` holds the most recent `capacity` generated ids in
/// insertion order. A record is released once it appears in neither.
#[derive(Debug)]
pub struct SuggestionStore {
    records: HashMap<String, Suggestion>,
    live: HashSet<String>,
    history: VecDeque<String>,
    capacity: usize,
}

impl SuggestionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: HashMap::new(),
            live: HashSet::new(),
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Track a freshly generated suggestion.
    ///
    /// Pending records are indexed live. The insert also lands in history,
    /// evicting the oldest entry beyond capacity; an evicted id whose
    /// record is still live keeps its record until decided.
    pub fn insert(&mut self, suggestion: Suggestion) -> Result<(), StoreError> {
        if self.records.contains_key(&suggestion.id) {
            return Err(StoreError::DuplicateId(suggestion.id.clone()));
        }
        let id = suggestion.id.clone();
        if suggestion.is_pending() {
            self.live.insert(id.clone());
        }
        self.records.insert(id.clone(), suggestion);
        self.history.push_back(id);
        while self.history.len() > self.capacity {
            if let Some(evicted) = self.history.pop_front() {
                if !self.live.contains(&evicted) {
                    self.records.remove(&evicted);
                }
                debug!(id = %evicted, "Evicted oldest history entry");
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Suggestion> {
        self.records.get(id)
    }

    /// Mutable access for lifecycle transitions. Callers that move a
    /// record out of `Pending` must also call [`SuggestionStore::remove_live`].
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Suggestion> {
        self.records.get_mut(id)
    }

    /// Drop an id from the live index, releasing the record entirely if
    /// history no longer references it.
    pub fn remove_live(&mut self, id: &str) -> bool {
        let removed = self.live.remove(id);
        if removed && !self.history.iter().any(|h| h == id) {
            self.records.remove(id);
        }
        removed
    }

    /// Pending suggestions still decidable at `now`, oldest first.
    ///
    /// Records past their deadline are filtered out but left untouched;
    /// the expiry sweep performs the actual transition.
    pub fn list_live(&self, now: DateTime<Utc>) -> Vec<Suggestion> {
        let mut live: Vec<Suggestion> = self
            .live
            .iter()
            .filter_map(|id| self.records.get(id))
            .filter(|s| !s.is_expired_at(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        live
    }

    /// Transition every overdue live suggestion to `Expired`. Returns how
    /// many records transitioned.
    pub fn expire_overdue(&mut self, now: DateTime<Utc>) -> usize {
        let overdue: Vec<String> = self
            .live
            .iter()
            .filter(|id| {
                self.records
                    .get(id.as_str())
                    .is_some_and(|s| s.is_expired_at(now))
            })
            .cloned()
            .collect();
        for id in &overdue {
            if let Some(record) = self.records.get_mut(id) {
                record.status = SuggestionStatus::Expired;
            }
            self.remove_live(id);
            debug!(id = %id, "Suggestion expired");
        }
        overdue.len()
    }

    /// Most recent history records, newest first.
    pub fn history(&self, limit: usize) -> Vec<Suggestion> {
        self.history
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    pub(crate) fn history_records(&self) -> impl Iterator<Item = &Suggestion> {
        self.history.iter().filter_map(|id| self.records.get(id))
    }

    /// Size of the live index, including records whose deadline has
    /// passed but which have not been swept yet.
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
