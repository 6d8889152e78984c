//! JSONL-backed record store for classified items, one JSON object per
//! line. A missing file is an empty store (first run); an unreadable path
//! is `StorageError::Unavailable`. A malformed line fails only that
//! record's load: it is skipped, reported, and left untouched on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{ClassifiedItem, Status};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One persisted line that failed to decode during a load.
#[derive(Debug)]
pub struct SkippedRecord {
    pub line: usize,
    pub error: String,
}

pub struct FeedbackStore {
    path: PathBuf,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: std::io::Error) -> StorageError {
        StorageError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    /// Load every decodable record, collecting the lines that were not.
    pub fn load_all(&self) -> Result<(Vec<ClassifiedItem>, Vec<SkippedRecord>), StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file not present yet - path={}", self.path.display());
                return Ok((Vec::new(), Vec::new()));
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut items = Vec::new();
        let mut skipped = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ClassifiedItem>(line) {
                Ok(item) => items.push(item),
                Err(e) => skipped.push(SkippedRecord {
                    line: idx + 1,
                    error: e.to_string(),
                }),
            }
        }

        debug!(
            "Store loaded - path={}, items={}, skipped={}",
            self.path.display(),
            items.len(),
            skipped.len()
        );
        Ok((items, skipped))
    }

    /// Append one record.
    pub fn save(&self, item: &ClassifiedItem) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
            }
        }
        let encoded = serde_json::to_string(item)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;
        writeln!(file, "{encoded}").map_err(|e| self.unavailable(e))?;
        Ok(())
    }

    /// Set the status of one record, the only mutation the store supports.
    /// Rewrites the file line-wise; undecodable lines are carried over
    /// verbatim. Returns whether the id was found.
    pub fn update_status(&self, id: &str, status: Status) -> Result<bool, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut found = false;
        let mut out = String::with_capacity(contents.len());
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ClassifiedItem>(line) {
                Ok(mut item) if item.id == id => {
                    item.status = status;
                    found = true;
                    out.push_str(&serde_json::to_string(&item)?);
                }
                _ => out.push_str(line),
            }
            out.push('\n');
        }

        if found {
            fs::write(&self.path, out).map_err(|e| self.unavailable(e))?;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Analysis, Disposition, Sentiment, Severity, UserTier};
    use chrono::Utc;

    fn sample(id: &str) -> ClassifiedItem {
        ClassifiedItem {
            id: id.into(),
            title: "Deploys failing".into(),
            body: "500s on every deploy".into(),
            author: "user@example.com".into(),
            created_at: Utc::now(),
            status: Status::New,
            analysis: Some(Analysis {
                disposition: Disposition::Bug {
                    severity: Severity::P1,
                },
                theme: "api".into(),
                user_tier: UserTier::Business,
                sentiment: Sentiment::Negative,
                key_points: vec![],
                suggested_tags: vec!["api".into()],
                summary: "Deploys failing".into(),
            }),
        }
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::new(dir.path().join("feedbacks.jsonl"));
        let (items, skipped) = store.load_all().unwrap();
        assert!(items.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::new(dir.path().join("data").join("feedbacks.jsonl"));

        store.save(&sample("a")).unwrap();
        store.save(&sample("b")).unwrap();

        let (items, skipped) = store.load_all().unwrap();
        assert_eq!(items.len(), 2);
        assert!(skipped.is_empty());
        assert_eq!(items[0].id, "a");
        assert_eq!(items[1].id, "b");
        assert_eq!(items[0].severity(), Some(Severity::P1));
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedbacks.jsonl");
        let store = FeedbackStore::new(&path);

        store.save(&sample("a")).unwrap();
        {
            let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{not json").unwrap();
        }
        store.save(&sample("b")).unwrap();

        let (items, skipped) = store.load_all().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 2);
    }

    #[test]
    fn update_status_rewrites_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedbacks.jsonl");
        let store = FeedbackStore::new(&path);

        store.save(&sample("a")).unwrap();
        {
            let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{not json").unwrap();
        }
        store.save(&sample("b")).unwrap();

        assert!(store.update_status("b", Status::Resolved).unwrap());
        assert!(!store.update_status("zzz", Status::Closed).unwrap());

        let (items, skipped) = store.load_all().unwrap();
        assert_eq!(items[0].status, Status::New);
        assert_eq!(items[1].status, Status::Resolved);
        // the malformed line survives the rewrite untouched
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn unreadable_path_is_reported_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // the path's parent is a file, so reads and writes both fail
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = FeedbackStore::new(blocker.join("feedbacks.jsonl"));

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));

        let err = store.save(&sample("a")).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }
}
