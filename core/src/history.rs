use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::results::QuizOutcome;
use crate::settings::QuizSettings;

/// The signed-in user. Passed explicitly to anything that reads or writes
/// history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// What gets persisted for a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub settings: QuizSettings,
    pub score: u32,
    pub total_problems: u32,
    pub percentage: u32,
}

impl QuizRecord {
    pub fn from_outcome(
        identity: &Identity,
        settings: &QuizSettings,
        outcome: &QuizOutcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            timestamp,
            settings: *settings,
            score: outcome.score(),
            total_problems: outcome.total(),
            percentage: outcome.percentage(),
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage)
    }
}

/// A record as returned by a store, with the id the store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    #[serde(flatten)]
    pub record: QuizRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => ScoreBand::Good,
            50.. => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

pub trait HistoryStore {
    /// Persists a record and returns its new id.
    fn save(&mut self, record: &QuizRecord) -> Result<String, StoreError>;

    fn load(&self, user_id: &str) -> Result<Vec<StoredRecord>, StoreError>;

    fn delete(&mut self, user_id: &str, record_id: &str) -> Result<(), StoreError>;

    /// Removes every record of the user, returning how many went.
    fn delete_all(&mut self, user_id: &str) -> Result<usize, StoreError>;
}

/// Best-effort save of a finished quiz. Failures are logged and swallowed so
/// results are always shown.
pub fn save_outcome(
    store: &mut dyn HistoryStore,
    identity: &Identity,
    settings: &QuizSettings,
    outcome: &QuizOutcome,
) -> Option<String> {
    let record = QuizRecord::from_outcome(identity, settings, outcome, Utc::now());
    match store.save(&record) {
        Ok(id) => {
            tracing::info!(user = %identity.user_id, record = %id, "quiz result saved");
            Some(id)
        }
        Err(e) => {
            tracing::warn!(user = %identity.user_id, error = %e, "failed to save quiz result");
            None
        }
    }
}

/// A user's saved quizzes, newest first.
#[derive(Debug, Clone)]
pub struct History {
    identity: Identity,
    records: Vec<StoredRecord>,
}

impl History {
    pub fn load(store: &dyn HistoryStore, identity: &Identity) -> Result<Self, StoreError> {
        let mut records = store.load(&identity.user_id)?;
        records.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));
        tracing::debug!(user = %identity.user_id, records = records.len(), "history loaded");
        Ok(Self {
            identity: identity.clone(),
            records,
        })
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deletes one record. The list only changes once the store confirms.
    pub fn delete(
        &mut self,
        store: &mut dyn HistoryStore,
        record_id: &str,
    ) -> Result<(), StoreError> {
        store.delete(&self.identity.user_id, record_id)?;
        self.records.retain(|r| r.id != record_id);
        Ok(())
    }

    /// Deletes every record of the user, with the same confirm-then-update rule.
    pub fn clear(&mut self, store: &mut dyn HistoryStore) -> Result<usize, StoreError> {
        let removed = store.delete_all(&self.identity.user_id)?;
        self.records.clear();
        Ok(removed)
    }
}
