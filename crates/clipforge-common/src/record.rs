//! Catalog record types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::VideoId;

/// Lifecycle status of a catalog record.
///
/// Serialized as `"Generated"` / `"Failed"` to match the catalog file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoStatus {
    Generated,
    Failed,
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated => write!(f, "Generated"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A generated video and the artifacts it was built from.
///
/// Once persisted, only `posted` and `status` change; everything else is
/// fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub script: String,
    /// Path or URL of the audio artifact (may be a transcript fallback).
    pub audio_path: String,
    /// URL of the rendered video, or the path of a placeholder artifact.
    pub video_url: String,
    pub status: VideoStatus,
    #[serde(default)]
    pub posted: bool,
    /// Unix timestamp in seconds.
    pub created_at: i64,
}

impl VideoRecord {
    /// Build a fresh `Generated` record with a new id and the current time.
    pub fn generated(
        title: impl Into<String>,
        script: impl Into<String>,
        audio_path: impl Into<String>,
        video_url: impl Into<String>,
    ) -> Self {
        Self {
            id: VideoId::new(),
            title: title.into(),
            script: script.into(),
            audio_path: audio_path.into(),
            video_url: video_url.into(),
            status: VideoStatus::Generated,
            posted: false,
            created_at: Utc::now().timestamp(),
        }
    }

    /// A generated record that has not been published yet.
    pub fn is_draft(&self) -> bool {
        !self.posted && self.status == VideoStatus::Generated
    }
}

/// Aggregate counters over the catalog, as shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub posted: usize,
    pub drafts: usize,
    pub failed: usize,
    /// Percentage of non-failed records, rounded to one decimal place.
    pub success_rate: f64,
}

impl CatalogStats {
    pub fn from_records(records: &[VideoRecord]) -> Self {
        let total = records.len();
        let posted = records.iter().filter(|r| r.posted).count();
        let drafts = records.iter().filter(|r| r.is_draft()).count();
        let failed = records
            .iter()
            .filter(|r| r.status == VideoStatus::Failed)
            .count();

        let success_rate = if total == 0 {
            0.0
        } else {
            let pct = (total - failed) as f64 / total as f64 * 100.0;
            (pct * 10.0).round() / 10.0
        };

        Self {
            total,
            posted,
            drafts,
            failed,
            success_rate,
        }
    }
}
