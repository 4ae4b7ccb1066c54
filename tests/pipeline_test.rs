//! Pipeline integration tests
//!
//! Runs whole topics through [`PipelineExecutor`] into a JSON catalog on disk.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use clipforge::artifacts::MISSING_KEY_MARKER;
use clipforge::config::{CatalogConfig, ScriptConfig, SpeechConfig, VideoConfig};
use clipforge::pipeline::{PipelineExecutor, TopicOutcome};
use clipforge::providers::{
    CatalogAdapter, HeyGenClient, PollPolicy, Provider, ScriptAdapter, SpeechAdapter, VideoAdapter,
};
use clipforge_common::VideoStatus;
use clipforge_store::RecordStore;
use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn unconfigured_run_produces_local_artifacts() {
    let harness = TestHarness::new();

    let record = harness.executor().run("sourdough").await.unwrap();

    assert_eq!(record.status, VideoStatus::Generated);
    assert!(!record.posted);
    assert!(record.script.contains("sourdough"));

    let transcript = std::fs::read_to_string(&record.audio_path).unwrap();
    assert_eq!(transcript, record.script);
    assert_eq!(
        std::fs::read_to_string(&record.video_url).unwrap(),
        MISSING_KEY_MARKER
    );

    assert_eq!(harness.store.load().unwrap(), vec![record]);
}

#[tokio::test]
async fn batch_appends_one_record_per_topic() {
    let harness = TestHarness::new();
    let topics = ["cats", "dogs", "ferrets", "owls"];

    let outcomes = harness.executor().run_batch(&topics).await;

    assert!(outcomes.iter().all(TopicOutcome::is_success));

    let records = harness.store.load().unwrap();
    assert_eq!(records.len(), topics.len());
    let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), topics.len());
    for (record, topic) in records.iter().zip(topics) {
        assert!(record.title.contains(topic));
    }
}

#[tokio::test]
async fn failing_script_does_not_abort_batch() {
    let harness = TestHarness::new();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Hook: cats rule"}}]
        })))
        .mount(&server)
        .await;

    let executor = PipelineExecutor::new(
        Box::new(ScriptAdapter::from_config(&ScriptConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            ..ScriptConfig::default()
        })),
        Box::new(SpeechAdapter::from_config(
            &SpeechConfig::default(),
            harness.artifacts(),
        )),
        Box::new(VideoAdapter::from_config(
            &VideoConfig::default(),
            harness.artifacts(),
        )),
        Box::new(CatalogAdapter::from_config(&CatalogConfig::default())),
        harness.store.clone(),
    );

    let outcomes = executor.run_batch(&["broken", "cats"]).await;

    assert_eq!(outcomes.len(), 2);
    match &outcomes[0] {
        TopicOutcome::Failed { title, error } => {
            assert_eq!(title, "broken");
            assert!(error.contains("500"), "{error}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(outcomes[1].is_success());

    let records = harness.store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "cats");
    assert_eq!(records[0].script, "Hook: cats rule");
}

#[tokio::test]
async fn fully_configured_run_uses_every_provider() {
    let harness = TestHarness::new();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Hook: owls at night"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/alloy"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-owls".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .and(body_string_contains("ID3-owls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "owl-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/owl-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "finished",
            "video_url": "https://cdn.test/owl-1.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v0/appBase/Videos"))
        .and(body_string_contains("https://cdn.test/owl-1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "rec1"})))
        .expect(1)
        .mount(&server)
        .await;

    let video_config = VideoConfig {
        api_key: Some("hg-key".into()),
        base_url: server.uri(),
        ..VideoConfig::default()
    };
    let video = HeyGenClient::new(&video_config, "hg-key").with_poll_policy(PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 3,
    });

    let executor = PipelineExecutor::new(
        Box::new(ScriptAdapter::from_config(&ScriptConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            ..ScriptConfig::default()
        })),
        Box::new(SpeechAdapter::from_config(
            &SpeechConfig {
                api_key: Some("el-key".into()),
                base_url: server.uri(),
                ..SpeechConfig::default()
            },
            harness.artifacts(),
        )),
        Box::new(VideoAdapter::new(
            Provider::Configured(video),
            harness.artifacts(),
        )),
        Box::new(CatalogAdapter::from_config(&CatalogConfig {
            api_key: Some("at-key".into()),
            base_id: Some("appBase".into()),
            base_url: server.uri(),
            ..CatalogConfig::default()
        })),
        harness.store.clone(),
    );

    let record = executor.run("owls").await.unwrap();

    assert_eq!(record.title, "owls");
    assert_eq!(record.script, "Hook: owls at night");
    assert!(record.audio_path.ends_with(".mp3"));
    assert_eq!(std::fs::read(&record.audio_path).unwrap(), b"ID3-owls");
    assert_eq!(record.video_url, "https://cdn.test/owl-1.mp4");
    assert_eq!(harness.store.load().unwrap(), vec![record]);
}

#[tokio::test]
async fn catalog_outage_still_persists_locally() {
    let harness = TestHarness::new();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0/appBase/Videos"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = harness.config.clone();
    config.catalog = CatalogConfig {
        api_key: Some("at-key".into()),
        base_id: Some("appBase".into()),
        base_url: server.uri(),
        ..CatalogConfig::default()
    };
    let executor = PipelineExecutor::from_config(&config, harness.store.clone());

    let record = executor.run("cats").await.unwrap();

    assert_eq!(harness.store.load().unwrap(), vec![record]);
}
