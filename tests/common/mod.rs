//! Shared test harness for integration tests.
//!
//! [`TestHarness`] owns a temporary directory holding the JSON catalog and
//! artifact folders, plus a default config pointing at it. No provider
//! credentials are set, so every stage uses its local fallback unless a test
//! wires its own adapters.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use clipforge::artifacts::ArtifactStore;
use clipforge::config::Config;
use clipforge::pipeline::PipelineExecutor;
use clipforge::server::{create_router, AppContext};
use clipforge_common::{VideoRecord, VideoStatus};
use clipforge_store::{JsonFileStore, RecordStore};
use http_body_util::BodyExt;
use tempfile::TempDir;

pub struct TestHarness {
    pub dir: TempDir,
    pub config: Config,
    pub store: Arc<JsonFileStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.paths.data_file = dir.path().join("data/videos.json");
        config.paths.audio_dir = dir.path().join("audio");
        config.paths.videos_dir = dir.path().join("videos");

        let store = Arc::new(JsonFileStore::new(&config.paths.data_file));

        Self { dir, config, store }
    }

    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::from_config(&self.config.paths)
    }

    /// Executor wired from the harness config (fallback providers only).
    pub fn executor(&self) -> PipelineExecutor {
        PipelineExecutor::from_config(&self.config, self.store.clone())
    }

    pub fn router(&self) -> Router {
        let ctx = AppContext::new(self.store.clone());
        create_router(ctx, None)
    }

    /// Append `records` to the catalog in order.
    pub fn seed(&self, records: &[VideoRecord]) {
        for record in records {
            self.store.append(record.clone()).expect("seed append");
        }
    }
}

pub fn record(title: &str, status: VideoStatus, posted: bool) -> VideoRecord {
    let mut record = VideoRecord::generated(
        title,
        format!("script for {title}"),
        format!("audio/{title}.txt"),
        format!("https://videos.test/{title}.mp4"),
    );
    record.status = status;
    record.posted = posted;
    record
}

/// Three generated records (one posted) and one failed.
pub fn sample_catalog() -> Vec<VideoRecord> {
    vec![
        record("one", VideoStatus::Generated, true),
        record("two", VideoStatus::Generated, false),
        record("three", VideoStatus::Generated, false),
        record("four", VideoStatus::Failed, false),
    ]
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
