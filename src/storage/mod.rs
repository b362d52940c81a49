// Storage module - the session repository, backed by a single JSON file
//
// The whole history lives in one pretty-printed document:
//
//   { "sessions": [ { "date": "...", "game": "...", ... }, ... ] }
//
// It is read once at startup and rewritten in full after every mutation.
// Writes go to a sibling temp file first and are then renamed over the
// original, so a crash mid-write leaves the previous version intact.
//
// Sessions are addressed by their position in the file.

use crate::demo;
use crate::session::{Session, SessionDraft, SessionPatch, ValidationError};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk document
#[derive(Debug, Default, Serialize)]
struct SessionFile<'a> {
    sessions: &'a [Session],
}

/// Document as read back, with records still unvalidated
#[derive(Debug, Deserialize)]
struct RawSessionFile {
    #[serde(default)]
    sessions: Vec<serde_json::Value>,
}

/// Why a repository mutation was refused
#[derive(Debug)]
pub enum StoreError {
    /// No session at this index
    NotFound { index: usize, len: usize },
    /// The resulting session would not validate
    Invalid(ValidationError),
    /// The mutation could not be persisted; in-memory state was rolled back
    Io(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { index, len } => {
                write!(f, "no session at index {} ({} sessions stored)", index, len)
            }
            Self::Invalid(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "failed to save sessions: {:#}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

/// JSON-file session repository
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Load the data file. A missing file is seeded with the demo history
    /// (or left empty when `seed_demo` is off) and written immediately.
    pub fn open(path: impl Into<PathBuf>, seed_demo: bool) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            let sessions = if seed_demo {
                demo::demo_sessions()
            } else {
                Vec::new()
            };
            tracing::info!(
                path = %path.display(),
                sessions = sessions.len(),
                "No data file found, creating one"
            );
            let store = Self { path, sessions };
            store.save()?;
            return Ok(store);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;
        let file: RawSessionFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse data file: {}", path.display()))?;

        let total = file.sessions.len();
        let sessions = load_records(file.sessions);
        if sessions.len() < total {
            tracing::warn!(
                path = %path.display(),
                skipped = total - sessions.len(),
                "Some stored sessions could not be read and were skipped"
            );
        }

        tracing::info!(
            path = %path.display(),
            sessions = sessions.len(),
            "Loaded sessions"
        );
        Ok(Self { path, sessions })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sessions in repository order
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Validate and append a new session, returning its index
    pub fn create(&mut self, draft: SessionDraft) -> Result<usize, StoreError> {
        let session = draft.into_session(Utc::now())?;
        self.sessions.push(session);

        if let Err(e) = self.save() {
            self.sessions.pop();
            return Err(StoreError::Io(e));
        }
        let index = self.sessions.len() - 1;
        tracing::debug!(index, "Session created");
        Ok(index)
    }

    /// Apply a partial update to the session at `index`
    pub fn update(&mut self, index: usize, patch: SessionPatch) -> Result<&Session, StoreError> {
        let len = self.sessions.len();
        let session = self
            .sessions
            .get_mut(index)
            .ok_or(StoreError::NotFound { index, len })?;
        let previous = session.clone();
        session.apply(patch)?;

        if let Err(e) = self.save() {
            self.sessions[index] = previous;
            return Err(StoreError::Io(e));
        }
        tracing::debug!(index, "Session updated");
        Ok(&self.sessions[index])
    }

    /// Remove and return the session at `index`
    pub fn delete(&mut self, index: usize) -> Result<Session, StoreError> {
        let len = self.sessions.len();
        if index >= len {
            return Err(StoreError::NotFound { index, len });
        }
        let removed = self.sessions.remove(index);

        if let Err(e) = self.save() {
            self.sessions.insert(index, removed);
            return Err(StoreError::Io(e));
        }
        tracing::debug!(index, "Session deleted");
        Ok(removed)
    }

    /// Rewrite the data file from memory
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let document = SessionFile {
            sessions: &self.sessions,
        };
        let json =
            serde_json::to_string_pretty(&document).context("Failed to serialize sessions")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write data file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace data file: {}", self.path.display()))?;
        Ok(())
    }
}

/// Convert stored records one by one, dropping those that cannot be read
fn load_records(records: Vec<serde_json::Value>) -> Vec<Session> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value(record) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(position, error = %e, "Skipping unreadable session record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(game: &str, buy_in: f64, cash_out: f64) -> SessionDraft {
        SessionDraft {
            game: game.to_string(),
            buy_in,
            cash_out,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_seeds_demo_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("sessions.json");

        let store = SessionStore::open(&path, true).unwrap();
        assert_eq!(store.sessions().len(), 20);
        assert!(path.exists());

        let reopened = SessionStore::open(&path, true).unwrap();
        assert_eq!(reopened.sessions(), store.sessions());
    }

    #[test]
    fn test_missing_file_without_seed_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");

        let store = SessionStore::open(&path, false).unwrap();
        assert!(store.sessions().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_create_update_delete_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        let mut store = SessionStore::open(&path, false).unwrap();

        let index = store.create(draft("0.10/0.20 NLH", 20.0, 42.0)).unwrap();
        assert_eq!(index, 0);
        store.create(draft("PLO", 20.0, 5.0)).unwrap();

        let patch = SessionPatch {
            cash_out: Some(50.0),
            ..Default::default()
        };
        let updated = store.update(0, patch).unwrap();
        assert_eq!(updated.cash_out, 50.0);
        assert_eq!(updated.stake.as_deref(), Some("0.10/0.20"));

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.game, "PLO");

        let reopened = SessionStore::open(&path, false).unwrap();
        assert_eq!(reopened.sessions().len(), 1);
        assert_eq!(reopened.sessions()[0].cash_out, 50.0);
    }

    #[test]
    fn test_out_of_range_index_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(dir.path().join("s.json"), false).unwrap();

        assert!(matches!(
            store.delete(0),
            Err(StoreError::NotFound { index: 0, len: 0 })
        ));
        assert!(matches!(
            store.update(3, SessionPatch::default()),
            Err(StoreError::NotFound { index: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_draft_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        let mut store = SessionStore::open(&path, false).unwrap();

        let err = store.create(draft("NLH", -1.0, 10.0)).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref e) if e.field == "buy_in"));
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SessionStore::open(&path, true).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse data file"));
    }

    #[test]
    fn test_reads_legacy_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(
            &path,
            r#"{"sessions": [{"game": "0.10/0.20 NLH", "buy_in": 20, "cash_out": 42,
                "location": "Online", "hours_played": 2.5, "notes": "Ran hot",
                "date": "2025-01-01T00:00:00", "bullets": 1, "tag": "A-game",
                "format": "cash", "stake": null}]}"#,
        )
        .unwrap();

        let store = SessionStore::open(&path, true).unwrap();
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.sessions()[0].cash_out, 42.0);
        assert_eq!(store.sessions()[0].tag, None);
    }

    #[test]
    fn test_undated_record_loads_with_current_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(
            &path,
            r#"{"sessions": [
                {"game": "NLH", "buy_in": 20, "cash_out": 30, "date": "2025-01-01T00:00:00"},
                {"game": "PLO", "buy_in": 50, "cash_out": 10, "date": null}
            ]}"#,
        )
        .unwrap();

        let before = Utc::now();
        let store = SessionStore::open(&path, true).unwrap();
        assert_eq!(store.sessions().len(), 2);
        assert_eq!(store.sessions()[1].game, "PLO");
        assert!(store.sessions()[1].date >= before);
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(
            &path,
            r#"{"sessions": [
                {"game": "NLH", "buy_in": 20, "cash_out": 30, "date": "yesterday"},
                {"game": "NLH", "buy_in": -5, "cash_out": 30},
                {"game": "PLO", "buy_in": 50, "cash_out": 10, "date": "2025-01-02T00:00:00"}
            ]}"#,
        )
        .unwrap();

        let store = SessionStore::open(&path, true).unwrap();
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.sessions()[0].game, "PLO");
    }
}
