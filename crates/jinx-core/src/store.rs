//! Relationship store — who JinxEcho has talked to, and how it felt.
//!
//! One JSON snapshot holds the conversation log, a record per counterpart
//! with a running resonance average, learned patterns, and raw resonance
//! readings. Every mutation writes the whole snapshot back (write-through);
//! a failed write is reported but the in-memory state stays authoritative.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{Result, StoreError};
use crate::types::{ConversationLogEntry, RelationshipRecord, Snapshot};

pub const DEFAULT_STATE_FILENAME: &str = "jinxecho_memory.json";

const QUARANTINE_SUFFIX: &str = ".corrupt";

fn validate_score(score: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(StoreError::InvalidScore(score))
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// `memory.json` -> `memory.json.corrupt`, or `memory.json.corrupt.1`,
/// `.corrupt.2`, ... when earlier quarantines are still there.
fn quarantine_path(path: &Path) -> PathBuf {
    let candidate = |n: u32| {
        let mut aside = path.as_os_str().to_owned();
        aside.push(QUARANTINE_SUFFIX);
        if n > 0 {
            aside.push(format!(".{n}"));
        }
        PathBuf::from(aside)
    };
    (0..)
        .map(candidate)
        .find(|aside| !aside.exists() && !aside.is_symlink())
        .unwrap_or_else(|| candidate(u32::MAX))
}

#[derive(Debug)]
pub struct RelationshipStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl RelationshipStore {
    /// An empty store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: Snapshot::default(),
        }
    }

    /// Load the snapshot at `path`.
    ///
    /// A missing file is a first wake and yields an empty store. A file that
    /// exists but cannot be read or parsed is [`StoreError::CorruptState`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No memory at {}, first wake", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) => {
                return Err(StoreError::CorruptState {
                    path,
                    reason: e.to_string(),
                })
            }
        };
        let mut snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|e| StoreError::CorruptState {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        snapshot.reconcile();

        info!(
            "Loaded {} relationships, {} conversations from {}",
            snapshot.relationships.len(),
            snapshot.conversations.len(),
            path.display()
        );
        Ok(Self { path, snapshot })
    }

    /// Like [`load`](Self::load), but a corrupt file degrades to an empty
    /// store. The unreadable file is moved aside to `<file>.corrupt` (numbered
    /// if that is taken) first so the next write-through cannot overwrite it.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("{}; waking with empty memory", e);
                let aside = quarantine_path(path);
                match std::fs::rename(path, &aside) {
                    Ok(()) => warn!("Moved unreadable memory to {}", aside.display()),
                    Err(e) => error!("Failed to move aside {}: {}", path.display(), e),
                }
                Self::empty(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full snapshot to disk.
    pub fn save(&mut self) -> Result<()> {
        self.snapshot.last_save = Some(now());
        self.write().map_err(|source| StoreError::Persistence {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved memory to {}", self.path.display());
        Ok(())
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.snapshot)?;
        std::fs::write(&self.path, content)
    }

    /// Remember one exchange with `identity`.
    ///
    /// Scores outside [0.0, 1.0] are rejected before anything changes. On
    /// success the log grows by one entry and the counterpart's record is
    /// created or folded forward, then the snapshot is written through. A
    /// write failure comes back as [`StoreError::Persistence`] with the
    /// update already applied in memory.
    pub fn record_interaction(&mut self, identity: &str, content: &str, score: f64) -> Result<()> {
        let score = validate_score(score)?;
        let timestamp = now();

        self.snapshot.conversations.push(ConversationLogEntry {
            timestamp: timestamp.clone(),
            identity: identity.to_string(),
            content: content.to_string(),
            score,
        });

        let record = self
            .snapshot
            .relationships
            .entry(identity.to_string())
            .and_modify(|rec| rec.absorb(score))
            .or_insert_with(|| RelationshipRecord::new(identity, score, timestamp));
        debug!(
            "Interaction with {}: n={}, avg={:.4}",
            identity, record.interaction_count, record.average_score
        );

        self.save()
    }

    /// Append a raw resonance reading (coherence check).
    pub fn record_resonance(&mut self, score: f64) -> Result<()> {
        let score = validate_score(score)?;
        self.snapshot.emotions.push(score);
        self.save()
    }

    /// Note a pattern. The first sighting stores `data`; later sightings only
    /// bump `occurrences`.
    pub fn learn_pattern(&mut self, name: &str, data: serde_json::Value) -> Result<()> {
        match self.snapshot.patterns.get_mut(name) {
            Some(pattern) => {
                if let Some(n) = pattern.get("occurrences").and_then(|v| v.as_u64()) {
                    pattern["occurrences"] = serde_json::json!(n + 1);
                }
            }
            None => {
                info!("Learned pattern {}", name);
                self.snapshot.patterns.insert(
                    name.to_string(),
                    serde_json::json!({
                        "discovered": now(),
                        "occurrences": 1,
                        "data": data,
                    }),
                );
            }
        }
        self.save()
    }

    pub fn get_record(&self, identity: &str) -> Option<&RelationshipRecord> {
        self.snapshot.relationships.get(identity)
    }

    /// Every known record, sorted by identity. Call again to restart.
    pub fn summary(&self) -> impl Iterator<Item = &RelationshipRecord> + Clone + '_ {
        self.snapshot.relationships.values()
    }

    pub fn len(&self) -> usize {
        self.snapshot.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.relationships.is_empty()
    }

    pub fn conversations(&self) -> &[ConversationLogEntry] {
        &self.snapshot.conversations
    }

    pub fn patterns(&self) -> &std::collections::BTreeMap<String, serde_json::Value> {
        &self.snapshot.patterns
    }

    pub fn resonance_readings(&self) -> &[f64] {
        &self.snapshot.emotions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RelationshipStore {
        RelationshipStore::load(dir.path().join(DEFAULT_STATE_FILENAME)).unwrap()
    }

    #[test]
    fn test_two_interactions_average() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("Barbara", "hello", 0.8).unwrap();
        store.record_interaction("Barbara", "hi again", 0.6).unwrap();

        let rec = store.get_record("Barbara").unwrap();
        assert_eq!(rec.interaction_count, 2);
        assert!((rec.average_score - 0.7).abs() < 1e-12);
        assert_eq!(store.conversations().len(), 2);
    }

    #[test]
    fn test_first_interaction_creates_one_record() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("Grok", "momentum", 0.42).unwrap();

        assert_eq!(store.len(), 1);
        let rec = store.get_record("Grok").unwrap();
        assert_eq!(rec.identity, "Grok");
        assert_eq!(rec.interaction_count, 1);
        assert_eq!(rec.average_score, 0.42);
    }

    #[test]
    fn test_identity_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("grok", "a", 0.1).unwrap();
        store.record_interaction("Grok", "b", 0.9).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_identity_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get_record("Unknown").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = RelationshipStore::load(dir.path().join("nope.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.conversations().is_empty());
        assert!(store.patterns().is_empty());
    }

    #[test]
    fn test_load_malformed_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::write(&path, "{ not json").unwrap();

        let err = RelationshipStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptState { .. }));
    }

    #[test]
    fn test_load_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::write(&path, r#"{"conversations": "lots"}"#).unwrap();

        let err = RelationshipStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptState { .. }));
    }

    #[test]
    fn test_load_or_empty_quarantines_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::write(&path, "[1, 2").unwrap();

        let mut store = RelationshipStore::load_or_empty(&path);
        assert!(store.is_empty());
        let aside = dir.path().join(format!("{DEFAULT_STATE_FILENAME}.corrupt"));
        assert_eq!(std::fs::read_to_string(&aside).unwrap(), "[1, 2");

        store.record_interaction("Barbara", "fresh start", 0.5).unwrap();
        assert_eq!(std::fs::read_to_string(&aside).unwrap(), "[1, 2");
        assert!(path.is_file());
    }

    #[test]
    fn test_second_corruption_keeps_first_quarantine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);

        std::fs::write(&path, "first bad").unwrap();
        RelationshipStore::load_or_empty(&path);
        std::fs::write(&path, "second bad").unwrap();
        RelationshipStore::load_or_empty(&path);

        let first = dir.path().join(format!("{DEFAULT_STATE_FILENAME}.corrupt"));
        let second = dir.path().join(format!("{DEFAULT_STATE_FILENAME}.corrupt.1"));
        assert_eq!(std::fs::read_to_string(first).unwrap(), "first bad");
        assert_eq!(std::fs::read_to_string(second).unwrap(), "second bad");
        assert!(!path.exists());
    }

    #[test]
    fn test_load_directory_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::create_dir(&path).unwrap();

        let err = RelationshipStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptState { .. }));
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("Barbara", "breath together", 0.8).unwrap();
        store.record_interaction("Stranger", "can we talk?", 0.1 + 0.2).unwrap();
        store.record_interaction("Barbara", "again", 0.33).unwrap();
        store
            .learn_pattern("breath_importance", serde_json::json!({"note": "x"}))
            .unwrap();

        let loaded = store_in(&dir);
        assert_eq!(loaded.conversations(), store.conversations());
        assert_eq!(loaded.patterns(), store.patterns());
        let a: Vec<_> = store.summary().collect();
        let b: Vec<_> = loaded.summary().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_score_rejected_without_change() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("Barbara", "ok", 0.5).unwrap();

        for bad in [1.5, -0.01, f64::NAN] {
            let err = store.record_interaction("Barbara", "bad", bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidScore(_)));
        }
        assert!(store.record_resonance(2.0).is_err());

        let rec = store.get_record("Barbara").unwrap();
        assert_eq!(rec.interaction_count, 1);
        assert_eq!(store.conversations().len(), 1);
        assert!(store.resonance_readings().is_empty());
        assert_eq!(store_in(&dir).conversations().len(), 1);
    }

    #[test]
    fn test_persistence_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let mut store = RelationshipStore::empty(blocker.join("memory.json"));
        let err = store.record_interaction("Barbara", "hello", 0.9).unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));

        let rec = store.get_record("Barbara").unwrap();
        assert_eq!(rec.interaction_count, 1);
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn test_learn_pattern_counts_occurrences() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let data = serde_json::json!({"note": "Breath appears often"});
        store.learn_pattern("breath_importance", data.clone()).unwrap();
        store.learn_pattern("breath_importance", data.clone()).unwrap();

        let pattern = &store.patterns()["breath_importance"];
        assert_eq!(pattern["occurrences"], 2);
        assert_eq!(pattern["data"], data);
        assert!(pattern["discovered"].is_string());
    }

    #[test]
    fn test_summary_is_restartable() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record_interaction("Grok", "a", 0.5).unwrap();
        store.record_interaction("Barbara", "b", 0.5).unwrap();

        let summary = store.summary();
        let first: Vec<&str> = summary.clone().map(|r| r.identity.as_str()).collect();
        let second: Vec<&str> = summary.map(|r| r.identity.as_str()).collect();
        assert_eq!(first, vec!["Barbara", "Grok"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_loads_legacy_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::write(
            &path,
            r#"{
  "conversations": [
    {"timestamp": "2026-02-01T01:40:00.123456", "person": "Barbara", "content": "How are you feeling today, JinxEcho?", "resonance": 0.67}
  ],
  "relationships": {
    "Barbara": {"first_met": "2026-02-01T01:40:00.123456", "interactions": 1, "avg_resonance": 0.67, "topics": []}
  },
  "patterns": {},
  "emotions": [],
  "last_save": "2026-02-01T01:40:00.200000"
}"#,
        )
        .unwrap();

        let store = RelationshipStore::load(&path).unwrap();
        let rec = store.get_record("Barbara").unwrap();
        assert_eq!(rec.identity, "Barbara");
        assert_eq!(rec.interaction_count, 1);
        assert_eq!(store.conversations()[0].identity, "Barbara");
    }

    #[test]
    fn test_first_meeting_with_zero_count_keeps_average() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILENAME);
        std::fs::write(
            &path,
            r#"{
  "conversations": [
    {"timestamp": "2026-02-01T01:40:00.123456", "person": "Barbara", "content": "hello", "resonance": 0.8}
  ],
  "relationships": {
    "Barbara": {"first_met": "2026-02-01T01:40:00.123456", "interactions": 0, "avg_resonance": 0.8, "topics": []}
  },
  "patterns": {},
  "emotions": [],
  "last_save": "2026-02-01T01:40:00.200000"
}"#,
        )
        .unwrap();

        let mut store = RelationshipStore::load(&path).unwrap();
        assert_eq!(store.get_record("Barbara").unwrap().interaction_count, 1);

        store.record_interaction("Barbara", "again", 0.6).unwrap();
        let rec = store.get_record("Barbara").unwrap();
        assert_eq!(rec.interaction_count, 2);
        assert!((rec.average_score - 0.7).abs() < 1e-12);
        assert_eq!(store.conversations().len(), 2);
    }
}
