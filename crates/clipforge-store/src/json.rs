//! JSON file backend.
//!
//! The file holds a single pretty-printed array of records. Every mutation
//! loads the whole array, changes it, and writes it back. A process-local
//! mutex serializes these cycles; there is no cross-process locking.

use std::path::{Path, PathBuf};

use clipforge_common::{Error, Result, VideoId, VideoRecord};
use parking_lot::Mutex;

use crate::RecordStore;

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<VideoRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::storage(format!("failed to read {}: {e}", self.path.display()))
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::storage(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    fn write_all(&self, records: &[VideoRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json).map_err(|e| {
            Error::storage(format!("failed to write {}: {e}", self.path.display()))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Saved catalog"
        );
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Vec<VideoRecord>> {
        let _guard = self.lock.lock();
        self.read_all()
    }

    fn append(&self, record: VideoRecord) -> Result<()> {
        let _guard = self.lock.lock();
        let mut records = self.read_all()?;

        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::validation(format!(
                "video id already exists: {}",
                record.id
            )));
        }

        records.push(record);
        self.write_all(&records)
    }

    fn replace(
        &self,
        id: VideoId,
        mutator: &mut dyn FnMut(&mut VideoRecord),
    ) -> Result<VideoRecord> {
        let _guard = self.lock.lock();
        let mut records = self.read_all()?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found("video", id))?;
        mutator(record);
        let updated = record.clone();

        self.write_all(&records)?;
        Ok(updated)
    }

    fn delete(&self, id: VideoId) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut records = self.read_all()?;

        let len_before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == len_before {
            return Ok(false);
        }

        self.write_all(&records)?;
        Ok(true)
    }
}
