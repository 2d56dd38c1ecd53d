//! Key-value persistence for the record list and the reference date

use chrono::NaiveDate;
use directories::ProjectDirs;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;

use super::types::{default_records, QualificationRecord};

const RECORDS_KEY: &str = "qualifications";
const REFERENCE_DATE_KEY: &str = "selected_date";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),
}

/// String values by key, the way a browser's local storage behaves
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory for the app
    pub fn open_default() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("com", "qualplan", "qualplan").ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir()))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl Storage for DirStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;

        // Temp file then rename
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

/// In-memory storage for tests and for running without a data dir
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed load/save pairs on top of a [`Storage`]
pub struct PlannerStore {
    storage: Box<dyn Storage>,
}

impl PlannerStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Stored records, or the built-in sample set if missing or unreadable
    pub fn load_records(&self) -> Vec<QualificationRecord> {
        match self.try_load_records() {
            Ok(Some(records)) => {
                tracing::debug!(count = records.len(), "loaded qualifications");
                records
            }
            Ok(None) => {
                tracing::info!("no stored qualifications, using defaults");
                default_records()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored qualifications unreadable, using defaults");
                default_records()
            }
        }
    }

    fn try_load_records(&self) -> Result<Option<Vec<QualificationRecord>>, StorageError> {
        let Some(raw) = self.storage.read(RECORDS_KEY)? else {
            return Ok(None);
        };
        let mut records: Vec<QualificationRecord> = serde_json::from_str(&raw)?;
        // Reversed ranges never reach the layout engine
        if let Some(bad) = records.iter().find(|r| r.end_date < r.start_date) {
            return Err(StorageError::InvalidRecord(format!(
                "record {} ends before it starts",
                bad.id
            )));
        }
        // Ids are unique and leave room for the next one
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id)) {
            return Err(StorageError::InvalidRecord(format!("duplicate id {}", dup.id)));
        }
        if let Some(bad) = records.iter().find(|r| r.id.0 == i64::MAX) {
            return Err(StorageError::InvalidRecord(format!("id {} is out of range", bad.id)));
        }
        for record in &mut records {
            record.resolve_color();
        }
        Ok(Some(records))
    }

    pub fn save_records(&mut self, records: &[QualificationRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(records)?;
        self.storage.write(RECORDS_KEY, &json)?;
        tracing::debug!(count = records.len(), "saved qualifications");
        Ok(())
    }

    /// Stored reference date, or `today` if missing or unreadable
    pub fn load_reference_date(&self, today: NaiveDate) -> NaiveDate {
        match self.try_load_reference_date() {
            Ok(Some(date)) => date,
            Ok(None) => today,
            Err(e) => {
                tracing::warn!(error = %e, "stored reference date unreadable, using today");
                today
            }
        }
    }

    fn try_load_reference_date(&self) -> Result<Option<NaiveDate>, StorageError> {
        let Some(raw) = self.storage.read(REFERENCE_DATE_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save_reference_date(&mut self, date: NaiveDate) -> Result<(), StorageError> {
        let json = serde_json::to_string(&date)?;
        self.storage.write(REFERENCE_DATE_KEY, &json)
    }
}
