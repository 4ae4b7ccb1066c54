//! Video stage: avatar renderer client with job polling.
//!
//! A submission either answers with a finished `video_url`, or with a
//! `job_id` that has to be polled until the job reports `finished` or
//! `failed`. Polling is capped by [`PollPolicy`]; running out of attempts
//! counts as a render failure.
//!
//! Every render failure is turned into a placeholder `.mp4` artifact so the
//! pipeline always has something to record.

use std::time::Duration;

use async_trait::async_trait;
use clipforge_common::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    error_for_status, http_client, Provider, SpeechArtifact, SpeechKind, StageOutcome,
    VideoRenderer,
};
use crate::artifacts::{ArtifactStore, MISSING_KEY_MARKER, RENDER_FAILED_PREFIX};
use crate::config::{credential, VideoConfig};

const STAGE: &str = "video";

/// How long to wait for an asynchronous render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two consecutive status requests.
    pub interval: Duration,
    /// Maximum number of status requests for one job.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// What a successful exchange with the renderer produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// A playable video URL.
    Url(String),
    /// The submission response had neither `video_url` nor `job_id`.
    Unexpected(Value),
}

/// Job state reported by the status endpoint.
#[derive(Debug, Clone, PartialEq)]
enum JobState {
    Finished(String),
    Failed(String),
    Pending,
}

/// HeyGen-compatible render client.
pub struct HeyGenClient {
    client: Client,
    base_url: String,
    api_key: String,
    avatar_id: Option<String>,
    background_id: Option<String>,
    submit_timeout: Duration,
    poll_timeout: Duration,
    poll: PollPolicy,
}

impl HeyGenClient {
    pub fn new(config: &VideoConfig, api_key: &str) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            avatar_id: config.avatar_id.clone().filter(|s| !s.trim().is_empty()),
            background_id: config.background_id.clone().filter(|s| !s.trim().is_empty()),
            submit_timeout: Duration::from_secs(config.submit_timeout_secs),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            poll: PollPolicy {
                interval: config.poll_interval(),
                max_attempts: config.max_poll_attempts,
            },
        }
    }

    /// Override the polling cadence.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Submit a render and wait for its result.
    pub async fn render(&self, script: &str, speech: &SpeechArtifact) -> Result<RenderResult> {
        let response = self.submit(script, speech).await?;

        if let Some(url) = non_empty_str(&response, "video_url") {
            info!("Renderer returned video directly");
            return Ok(RenderResult::Url(url.to_string()));
        }

        if let Some(job_id) = job_id(&response) {
            info!(job_id = %job_id, "Render job submitted, polling for completion");
            return self.wait_for_job(&job_id).await.map(RenderResult::Url);
        }

        Ok(RenderResult::Unexpected(response))
    }

    async fn submit(&self, script: &str, speech: &SpeechArtifact) -> Result<Value> {
        let url = format!("{}/v1/videos", self.base_url);

        let mut form = Form::new().text("script", script.to_string());
        if let Some(ref avatar_id) = self.avatar_id {
            form = form.text("avatar_id", avatar_id.clone());
        }
        if let Some(ref background_id) = self.background_id {
            form = form.text("background_id", background_id.clone());
        }
        if let Some(part) = audio_part(speech).await? {
            form = form.part("audio_file", part);
        }

        debug!(url = %url, "Submitting render");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.submit_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let response = error_for_status(response)
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        response
            .json()
            .await
            .map_err(|e| Error::provider(STAGE, format!("invalid submission response: {e}")))
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<String> {
        let max_attempts = self.poll.max_attempts;

        for attempt in 1..=max_attempts {
            match self.job_state(job_id).await? {
                JobState::Finished(url) => {
                    info!(job_id = %job_id, attempt, "Render job finished");
                    return Ok(url);
                }
                JobState::Failed(detail) => {
                    return Err(Error::provider(
                        STAGE,
                        format!("render job {job_id} failed: {detail}"),
                    ));
                }
                JobState::Pending => {
                    debug!(job_id = %job_id, attempt, max_attempts, "Render job still running");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }

        Err(Error::provider(
            STAGE,
            format!("render job {job_id} did not finish after {max_attempts} polls"),
        ))
    }

    async fn job_state(&self, job_id: &str) -> Result<JobState> {
        let url = format!("{}/v1/videos/{}", self.base_url, job_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.poll_timeout)
            .send()
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let response = error_for_status(response)
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::provider(STAGE, format!("invalid job status response: {e}")))?;

        Ok(parse_job_state(&body))
    }
}

fn parse_job_state(body: &Value) -> JobState {
    match body.get("status").and_then(Value::as_str) {
        Some("finished") => match non_empty_str(body, "video_url") {
            Some(url) => JobState::Finished(url.to_string()),
            None => JobState::Failed("job finished without a video_url".to_string()),
        },
        Some("failed") => JobState::Failed(
            non_empty_str(body, "error")
                .unwrap_or("provider reported failure")
                .to_string(),
        ),
        _ => JobState::Pending,
    }
}

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Job ids come back as strings from some API versions and numbers from others.
fn job_id(body: &Value) -> Option<String> {
    match body.get("job_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Attach synthesized audio when there is some; transcripts are not sent.
async fn audio_part(speech: &SpeechArtifact) -> Result<Option<Part>> {
    if speech.kind != SpeechKind::Audio || !speech.path.is_file() {
        return Ok(None);
    }

    let bytes = tokio::fs::read(&speech.path).await?;
    let file_name = speech
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio.mp3".to_string());

    Ok(Some(Part::bytes(bytes).file_name(file_name)))
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct VideoAdapter {
    provider: Provider<HeyGenClient>,
    artifacts: ArtifactStore,
}

impl VideoAdapter {
    pub fn new(provider: Provider<HeyGenClient>, artifacts: ArtifactStore) -> Self {
        Self {
            provider,
            artifacts,
        }
    }

    pub fn from_config(config: &VideoConfig, artifacts: ArtifactStore) -> Self {
        let provider = match credential(&config.api_key) {
            Some(key) => Provider::Configured(HeyGenClient::new(config, key)),
            None => Provider::Unconfigured,
        };
        Self::new(provider, artifacts)
    }

    async fn placeholder(&self, body: &str, reason: String) -> Result<StageOutcome<String>> {
        let path = self.artifacts.write_placeholder_video(body).await?;
        Ok(StageOutcome::degraded(path.display().to_string(), reason))
    }
}

#[async_trait]
impl VideoRenderer for VideoAdapter {
    fn name(&self) -> &'static str {
        match self.provider {
            Provider::Configured(_) => "heygen",
            Provider::Unconfigured => "placeholder",
        }
    }

    async fn render(
        &self,
        script: &str,
        speech: &SpeechArtifact,
    ) -> Result<StageOutcome<String>> {
        let client = match &self.provider {
            Provider::Configured(client) => client,
            Provider::Unconfigured => {
                return self
                    .placeholder(MISSING_KEY_MARKER, "video provider not configured".to_string())
                    .await;
            }
        };

        match client.render(script, speech).await {
            Ok(RenderResult::Url(url)) => Ok(StageOutcome::Produced(url)),
            Ok(RenderResult::Unexpected(body)) => {
                warn!(response = %body, "Renderer returned an unexpected response shape");
                Ok(StageOutcome::degraded(
                    body.to_string(),
                    "unexpected response shape",
                ))
            }
            Err(e) => {
                warn!(error = %e, "Render failed, writing placeholder video");
                self.placeholder(&format!("{RENDER_FAILED_PREFIX}{e}"), e.to_string())
                    .await
            }
        }
    }
}
