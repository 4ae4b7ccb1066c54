//! Topic-to-record orchestration.
//!
//! One topic runs script → speech → video → assemble → persist → sync, each
//! stage awaited before the next starts. Only the script stage can stop a
//! topic; speech and video always hand back something usable, and catalog
//! sync runs after the record is already on disk.

use std::sync::Arc;

use clipforge_common::{Error, Result, VideoRecord};
use clipforge_store::RecordStore;
use tracing::{debug, error, info, warn};

use super::stage::{PipelineStage, TopicOutcome};
use crate::artifacts::ArtifactStore;
use crate::config::Config;
use crate::providers::{
    CatalogAdapter, CatalogSink, ScriptAdapter, ScriptWriter, SpeechAdapter, SpeechSynthesizer,
    StageOutcome, VideoAdapter, VideoRenderer,
};

/// Called after each completed stage with a short description of its output.
pub type StageCallback = Box<dyn Fn(PipelineStage, &str) + Send + Sync>;

pub struct PipelineExecutor {
    script: Box<dyn ScriptWriter>,
    speech: Box<dyn SpeechSynthesizer>,
    video: Box<dyn VideoRenderer>,
    catalog: Box<dyn CatalogSink>,
    store: Arc<dyn RecordStore>,
    stage_callback: Option<StageCallback>,
}

impl PipelineExecutor {
    pub fn new(
        script: Box<dyn ScriptWriter>,
        speech: Box<dyn SpeechSynthesizer>,
        video: Box<dyn VideoRenderer>,
        catalog: Box<dyn CatalogSink>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            script,
            speech,
            video,
            catalog,
            store,
            stage_callback: None,
        }
    }

    /// Wire every stage from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        let artifacts = ArtifactStore::from_config(&config.paths);

        let executor = Self::new(
            Box::new(ScriptAdapter::from_config(&config.script)),
            Box::new(SpeechAdapter::from_config(&config.speech, artifacts.clone())),
            Box::new(VideoAdapter::from_config(&config.video, artifacts)),
            Box::new(CatalogAdapter::from_config(&config.catalog)),
            store,
        );

        info!(
            script = executor.script.name(),
            speech = executor.speech.name(),
            video = executor.video.name(),
            catalog = executor.catalog.name(),
            "Pipeline providers"
        );

        executor
    }

    pub fn with_stage_callback(mut self, callback: StageCallback) -> Self {
        self.stage_callback = Some(callback);
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    fn report(&self, stage: PipelineStage, detail: &str) {
        if let Some(ref cb) = self.stage_callback {
            cb(stage, detail);
        }
        debug!(%stage, detail, "Stage complete");
    }

    /// Generate, persist and sync one video for `topic`.
    ///
    /// # Errors
    ///
    /// Fails on an empty topic, a script provider error, or a local I/O or
    /// store error. Nothing is persisted in those cases.
    pub async fn run(&self, topic: &str) -> Result<VideoRecord> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::validation("topic must not be empty"));
        }

        info!(topic, "Generating video");

        let script = self.script.write_script(topic).await?;
        let script = settle(PipelineStage::Script, self.script.name(), script);
        self.report(PipelineStage::Script, &script.title);

        let speech = self.speech.synthesize(&script.script).await?;
        let speech = settle(PipelineStage::Speech, self.speech.name(), speech);
        let audio_path = speech.path.display().to_string();
        self.report(PipelineStage::Speech, &audio_path);

        let video = self.video.render(&script.script, &speech).await?;
        let video_url = settle(PipelineStage::Video, self.video.name(), video);
        self.report(PipelineStage::Video, &video_url);

        let record = VideoRecord::generated(script.title, script.script, audio_path, video_url);
        self.report(PipelineStage::Assemble, &record.id.to_string());

        self.store.append(record.clone())?;
        info!(id = %record.id, title = %record.title, "Saved video record");
        self.report(PipelineStage::Persist, &record.id.to_string());

        match self.catalog.sync(&record).await {
            Ok(Some(_)) => {
                info!(id = %record.id, catalog = self.catalog.name(), "Catalog updated");
                self.report(PipelineStage::Sync, self.catalog.name());
            }
            Ok(None) => {
                debug!(id = %record.id, "No catalog configured, skipping sync");
                self.report(PipelineStage::Sync, "skipped");
            }
            Err(e) => {
                warn!(
                    id = %record.id,
                    catalog = self.catalog.name(),
                    error = %e,
                    "Catalog sync failed; local record kept"
                );
                self.report(PipelineStage::Sync, "failed");
            }
        }

        Ok(record)
    }

    /// Run every topic in order. A failing topic is reported and skipped.
    pub async fn run_batch<S: AsRef<str>>(&self, topics: &[S]) -> Vec<TopicOutcome> {
        let total = topics.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, topic) in topics.iter().enumerate() {
            let topic = topic.as_ref();
            info!("[{}/{}] {}", i + 1, total, topic);

            match self.run(topic).await {
                Ok(record) => outcomes.push(TopicOutcome::Generated(record)),
                Err(e) => {
                    error!(topic, error = %e, "Topic failed");
                    outcomes.push(TopicOutcome::Failed {
                        title: topic.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }
}

/// Unwrap a stage outcome, logging when a fallback was used.
fn settle<T>(stage: PipelineStage, provider: &str, outcome: StageOutcome<T>) -> T {
    if let Some(reason) = outcome.reason() {
        warn!(%stage, provider, reason, "Stage degraded to fallback");
    }
    outcome.into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Script, SpeechArtifact, SpeechKind};
    use async_trait::async_trait;
    use clipforge_common::VideoStatus;
    use clipforge_store::MemoryStore;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    struct FakeScript {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl ScriptWriter for FakeScript {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn write_script(&self, topic: &str) -> Result<StageOutcome<Script>> {
            if self.fail_on == Some(topic) {
                return Err(Error::provider("script", "HTTP 500: upstream down"));
            }
            Ok(StageOutcome::Produced(Script {
                title: topic.to_string(),
                script: format!("about {topic}"),
            }))
        }
    }

    struct FakeSpeech;

    #[async_trait]
    impl SpeechSynthesizer for FakeSpeech {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn synthesize(&self, _text: &str) -> Result<StageOutcome<SpeechArtifact>> {
            Ok(StageOutcome::degraded(
                SpeechArtifact {
                    path: PathBuf::from("audio/one.txt"),
                    kind: SpeechKind::Transcript,
                },
                "not configured",
            ))
        }
    }

    struct FakeVideo;

    #[async_trait]
    impl VideoRenderer for FakeVideo {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn render(
            &self,
            _script: &str,
            _speech: &SpeechArtifact,
        ) -> Result<StageOutcome<String>> {
            Ok(StageOutcome::Produced("https://videos.test/1.mp4".to_string()))
        }
    }

    /// Records how many rows the store held when sync was called.
    struct FakeCatalog {
        store: Arc<MemoryStore>,
        seen: Arc<Mutex<Vec<usize>>>,
        fail: bool,
    }

    struct NoCatalog;

    #[async_trait]
    impl CatalogSink for NoCatalog {
        fn name(&self) -> &'static str {
            "none"
        }

        async fn sync(&self, _record: &VideoRecord) -> Result<Option<serde_json::Value>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl CatalogSink for FakeCatalog {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn sync(&self, _record: &VideoRecord) -> Result<Option<serde_json::Value>> {
            let count = self.store.load()?.len();
            self.seen.lock().push(count);
            if self.fail {
                return Err(Error::provider("catalog", "HTTP 422: bad field"));
            }
            Ok(Some(serde_json::json!({"id": "rec1"})))
        }
    }

    fn executor(
        fail_on: Option<&'static str>,
        catalog_fails: bool,
    ) -> (PipelineExecutor, Arc<MemoryStore>, Arc<Mutex<Vec<usize>>>) {
        let store = Arc::new(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let executor = PipelineExecutor::new(
            Box::new(FakeScript { fail_on }),
            Box::new(FakeSpeech),
            Box::new(FakeVideo),
            Box::new(FakeCatalog {
                store: store.clone(),
                seen: seen.clone(),
                fail: catalog_fails,
            }),
            store.clone(),
        );
        (executor, store, seen)
    }

    #[tokio::test]
    async fn run_assembles_and_persists_record() {
        let (executor, store, seen) = executor(None, false);

        let record = executor.run("  cats  ").await.unwrap();

        assert_eq!(record.title, "cats");
        assert_eq!(record.script, "about cats");
        assert_eq!(record.audio_path, "audio/one.txt");
        assert_eq!(record.video_url, "https://videos.test/1.mp4");
        assert_eq!(record.status, VideoStatus::Generated);
        assert!(!record.posted);
        assert_eq!(store.load().unwrap(), vec![record]);
        // Sync only ever sees an already persisted record.
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[tokio::test]
    async fn empty_topic_is_rejected() {
        let (executor, store, _) = executor(None, false);

        let err = executor.run("   ").await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_failure_keeps_local_record() {
        let (executor, store, _) = executor(None, true);

        let record = tokio_test::assert_ok!(executor.run("dogs").await);

        assert_eq!(store.load().unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn batch_isolates_failing_topic() {
        let (executor, store, _) = executor(Some("broken"), false);

        let outcomes = executor.run_batch(&["broken", "cats"]).await;

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_success());
        assert_eq!(outcomes[0].title(), "broken");
        assert!(outcomes[1].is_success());

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "cats");
    }

    #[tokio::test]
    async fn stage_callback_sees_every_stage_in_order() {
        let (executor, _, _) = executor(None, false);
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();
        let executor = executor.with_stage_callback(Box::new(move |stage, _| {
            sink.lock().push(stage);
        }));

        executor.run("cats").await.unwrap();

        assert_eq!(*stages.lock(), PipelineStage::ALL.to_vec());
    }

    type StageLog = Arc<Mutex<Vec<(PipelineStage, String)>>>;

    fn recording(executor: PipelineExecutor) -> (PipelineExecutor, StageLog) {
        let log: StageLog = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let executor =
            executor.with_stage_callback(Box::new(move |stage: PipelineStage, detail: &str| {
                sink.lock().push((stage, detail.to_string()));
            }));
        (executor, log)
    }

    #[tokio::test]
    async fn failed_sync_is_still_reported() {
        let (executor, _, _) = executor(None, true);
        let (executor, log) = recording(executor);

        executor.run("cats").await.unwrap();

        let log = log.lock();
        assert_eq!(log.len(), PipelineStage::ALL.len());
        assert_eq!(log.last(), Some(&(PipelineStage::Sync, "failed".to_string())));
    }

    #[tokio::test]
    async fn unconfigured_sync_is_reported_as_skipped() {
        let store = Arc::new(MemoryStore::new());
        let executor = PipelineExecutor::new(
            Box::new(FakeScript { fail_on: None }),
            Box::new(FakeSpeech),
            Box::new(FakeVideo),
            Box::new(NoCatalog),
            store.clone(),
        );
        let (executor, log) = recording(executor);

        executor.run("cats").await.unwrap();

        let stages: Vec<_> = log.lock().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, PipelineStage::ALL.to_vec());
        assert_eq!(log.lock().last().unwrap().1, "skipped");
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
