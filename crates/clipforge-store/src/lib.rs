//! Clipforge-Store: persistence for generated-video records.
//!
//! The catalog is small and always handled as a whole collection. Backends
//! implement [`RecordStore`] so the pipeline and the dashboard never depend on
//! the on-disk format.
//!
//! # Modules
//!
//! - `json` - Pretty-printed JSON array file, read-modify-write on every change
//! - `memory` - In-process store for tests and dry runs
//!
//! # Example
//!
//! ```no_run
//! use clipforge_common::VideoRecord;
//! use clipforge_store::{JsonFileStore, RecordStore};
//!
//! let store = JsonFileStore::new("data/videos.json");
//! store.append(VideoRecord::generated("title", "script", "a.txt", "v.mp4")).unwrap();
//! assert_eq!(store.load().unwrap().len(), 1);
//! ```

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use clipforge_common::{Result, VideoId, VideoRecord};

/// Whole-collection access to the catalog.
///
/// Implementations are single-writer: callers in separate processes must not
/// mutate the same backing store concurrently.
pub trait RecordStore: Send + Sync {
    /// Load every record in insertion order.
    fn load(&self) -> Result<Vec<VideoRecord>>;

    /// Append a new record. Fails if a record with the same id exists.
    fn append(&self, record: VideoRecord) -> Result<()>;

    /// Apply `mutator` to the record with `id` and persist the result.
    ///
    /// Returns the updated record, or `Error::NotFound` if no record matches.
    fn replace(&self, id: VideoId, mutator: &mut dyn FnMut(&mut VideoRecord))
        -> Result<VideoRecord>;

    /// Remove the record with `id`. Returns `false` when nothing matched.
    fn delete(&self, id: VideoId) -> Result<bool>;

    /// Set the `posted` flag of a record.
    fn set_posted(&self, id: VideoId, posted: bool) -> Result<VideoRecord> {
        self.replace(id, &mut |record: &mut VideoRecord| record.posted = posted)
    }
}
