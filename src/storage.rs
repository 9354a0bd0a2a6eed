use directories::ProjectDirs;
use mq_core::{HistoryStore, QuizRecord, StoreError, StoredRecord};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const APP_NAME: &str = "math_quiz";
const ORG_NAME: &str = "practice";
const HISTORY_FILE: &str = "history.json";

fn get_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", ORG_NAME, APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Quiz history kept as one JSON array on local disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Uses `data_dir` when given, otherwise the platform data directory.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let dir = data_dir.or_else(get_data_dir).ok_or(StoreError::NoDataDir)?;
        Ok(Self::in_dir(dir))
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the file in one rename so a crash mid-write never leaves a
    /// truncated history behind.
    fn write_all(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(records)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl HistoryStore for JsonFileStore {
    fn save(&mut self, record: &QuizRecord) -> Result<String, StoreError> {
        let mut records = self.read_all()?;
        let id = Uuid::new_v4().to_string();
        records.push(StoredRecord {
            id: id.clone(),
            record: record.clone(),
        });
        self.write_all(&records)?;
        Ok(id)
    }

    fn load(&self, user_id: &str) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.record.user_id == user_id)
            .collect())
    }

    fn delete(&mut self, user_id: &str, record_id: &str) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| !(r.id == record_id && r.record.user_id == user_id));
        if records.len() == before {
            return Err(StoreError::NotFound(record_id.to_string()));
        }
        self.write_all(&records)
    }

    fn delete_all(&mut self, user_id: &str) -> Result<usize, StoreError> {
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| r.record.user_id != user_id);
        let removed = before - records.len();
        if removed > 0 {
            self.write_all(&records)?;
        }
        Ok(removed)
    }
}
