//! Speech stage: text-to-speech client with transcript fallback.

use std::time::Duration;

use async_trait::async_trait;
use clipforge_common::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    error_for_status, http_client, Provider, SpeechArtifact, SpeechKind, SpeechSynthesizer,
    StageOutcome,
};
use crate::artifacts::ArtifactStore;
use crate::config::{credential, SpeechConfig};

const STAGE: &str = "speech";

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
}

/// ElevenLabs-compatible text-to-speech client.
pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
    api_key: String,
    voice: String,
    timeout: Duration,
}

impl ElevenLabsClient {
    pub fn new(config: &SpeechConfig, api_key: &str) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            voice: config.voice.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesize `text` and return the raw audio bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice);
        debug!(url = %url, chars = text.len(), "Requesting speech");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&SynthesisRequest { text })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let response = error_for_status(response)
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::provider(STAGE, format!("failed to read audio: {e}")))?;

        Ok(bytes.to_vec())
    }
}

pub struct SpeechAdapter {
    provider: Provider<ElevenLabsClient>,
    artifacts: ArtifactStore,
}

impl SpeechAdapter {
    pub fn new(provider: Provider<ElevenLabsClient>, artifacts: ArtifactStore) -> Self {
        Self {
            provider,
            artifacts,
        }
    }

    pub fn from_config(config: &SpeechConfig, artifacts: ArtifactStore) -> Self {
        let provider = match credential(&config.api_key) {
            Some(key) => Provider::Configured(ElevenLabsClient::new(config, key)),
            None => Provider::Unconfigured,
        };
        Self::new(provider, artifacts)
    }

    async fn transcript(&self, text: &str, reason: String) -> Result<StageOutcome<SpeechArtifact>> {
        let path = self.artifacts.write_transcript(text).await?;
        Ok(StageOutcome::degraded(
            SpeechArtifact {
                path,
                kind: SpeechKind::Transcript,
            },
            reason,
        ))
    }

    async fn synthesize_audio(&self, client: &ElevenLabsClient, text: &str) -> Result<SpeechArtifact> {
        let bytes = client.synthesize(text).await?;
        let path = self.artifacts.write_audio(&bytes).await?;
        Ok(SpeechArtifact {
            path,
            kind: SpeechKind::Audio,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechAdapter {
    fn name(&self) -> &'static str {
        match self.provider {
            Provider::Configured(_) => "elevenlabs",
            Provider::Unconfigured => "transcript",
        }
    }

    async fn synthesize(&self, text: &str) -> Result<StageOutcome<SpeechArtifact>> {
        let client = match &self.provider {
            Provider::Configured(client) => client,
            Provider::Unconfigured => {
                return self
                    .transcript(text, "speech provider not configured".to_string())
                    .await;
            }
        };

        match self.synthesize_audio(client, text).await {
            Ok(artifact) => Ok(StageOutcome::Produced(artifact)),
            Err(e) => {
                warn!(voice = %client.voice(), error = %e, "Speech synthesis failed, writing transcript instead");
                self.transcript(text, e.to_string()).await
            }
        }
    }
}
