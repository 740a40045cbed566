//! Core types — RelationshipRecord, ConversationLogEntry, Snapshot.
//!
//! Serde names follow the on-disk memory file so an existing
//! `jinxecho_memory.json` loads unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Relationships ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Map key in the snapshot; restored on load.
    #[serde(skip)]
    pub identity: String,
    #[serde(rename = "first_met")]
    pub first_seen: String,
    #[serde(rename = "interactions")]
    pub interaction_count: u32,
    #[serde(rename = "avg_resonance")]
    pub average_score: f64,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl RelationshipRecord {
    pub fn new(identity: &str, score: f64, first_seen: String) -> Self {
        Self {
            identity: identity.to_string(),
            first_seen,
            interaction_count: 1,
            average_score: score,
            topics: Vec::new(),
        }
    }

    /// Fold one more score into the running average.
    ///
    /// Reproduces the incremental recurrence
    /// `(old * (n - 1) + score) / n` with `n` the post-increment count,
    /// rather than recomputing the mean from the log.
    pub fn absorb(&mut self, score: f64) {
        self.interaction_count = self.interaction_count.saturating_add(1);
        let n = f64::from(self.interaction_count);
        self.average_score = (self.average_score * (n - 1.0) + score) / n;
    }
}

// ── Conversation log ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLogEntry {
    pub timestamp: String,
    #[serde(rename = "person")]
    pub identity: String,
    pub content: String,
    #[serde(rename = "resonance")]
    pub score: f64,
}

// ── Persisted snapshot ──

/// The full memory file. Every field is optional on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub conversations: Vec<ConversationLogEntry>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipRecord>,
    /// Free-form; never interpreted on load.
    #[serde(default)]
    pub patterns: BTreeMap<String, serde_json::Value>,
    /// Scalar resonance readings, oldest first.
    #[serde(default)]
    pub emotions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_save: Option<String>,
}

impl Snapshot {
    /// Copy map keys into each record's `identity` and lift each count to
    /// at least the number of logged exchanges with that identity (never
    /// below 1). Older files store 0 after a first meeting.
    pub(crate) fn reconcile(&mut self) {
        let mut logged: BTreeMap<&str, u32> = BTreeMap::new();
        for entry in &self.conversations {
            let n = logged.entry(entry.identity.as_str()).or_default();
            *n = n.saturating_add(1);
        }
        for (key, record) in self.relationships.iter_mut() {
            record.identity = key.clone();
            let seen = logged.get(key.as_str()).copied().unwrap_or(0);
            record.interaction_count = record.interaction_count.max(seen).max(1);
        }
    }
}
