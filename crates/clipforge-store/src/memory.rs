//! In-memory backend.

use clipforge_common::{Error, Result, VideoId, VideoRecord};
use parking_lot::RwLock;

use crate::RecordStore;

/// Keeps the catalog in a `Vec`; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<VideoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_records(records: Vec<VideoRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<VideoRecord>> {
        Ok(self.records.read().clone())
    }

    fn append(&self, record: VideoRecord) -> Result<()> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::validation(format!(
                "video id already exists: {}",
                record.id
            )));
        }
        records.push(record);
        Ok(())
    }

    fn replace(
        &self,
        id: VideoId,
        mutator: &mut dyn FnMut(&mut VideoRecord),
    ) -> Result<VideoRecord> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found("video", id))?;
        mutator(record);
        Ok(record.clone())
    }

    fn delete(&self, id: VideoId) -> Result<bool> {
        let mut records = self.records.write();
        let len_before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < len_before)
    }
}
