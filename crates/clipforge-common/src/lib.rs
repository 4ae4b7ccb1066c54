//! Clipforge-Common: Shared types and errors.
//!
//! This crate provides the pieces used by both the pipeline and the record store:
//!
//! - **Typed IDs**: [`VideoId`], a UUID wrapper for catalog records
//! - **Records**: [`VideoRecord`] and its [`VideoStatus`]
//! - **Stats**: [`CatalogStats`] aggregated over a record collection
//! - **Error Handling**: the unified [`Error`] type and [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use clipforge_common::{CatalogStats, VideoRecord};
//!
//! let record = VideoRecord::generated("Rust tips", "Hook: ...", "audio/a.txt", "videos/v.mp4");
//! let stats = CatalogStats::from_records(&[record]);
//! assert_eq!(stats.total, 1);
//! assert_eq!(stats.drafts, 1);
//! ```

pub mod error;
pub mod ids;
pub mod record;

pub use error::{Error, Result};
pub use ids::VideoId;
pub use record::{CatalogStats, VideoRecord, VideoStatus};
