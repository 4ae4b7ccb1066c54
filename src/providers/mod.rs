//! Adapters for the external services the pipeline depends on.
//!
//! Each stage is an async trait ([`ScriptWriter`], [`SpeechSynthesizer`],
//! [`VideoRenderer`], [`CatalogSink`]) so the orchestrator can be driven by
//! test doubles. The production adapters wrap a [`Provider`], which is either
//! a configured HTTP client or `Unconfigured` when no credential was given.

pub mod catalog;
pub mod script;
pub mod speech;
pub mod video;

pub use catalog::{AirtableClient, CatalogAdapter};
pub use script::{OpenAiScriptClient, ScriptAdapter};
pub use speech::{ElevenLabsClient, SpeechAdapter};
pub use video::{HeyGenClient, PollPolicy, RenderResult, VideoAdapter};

use std::path::PathBuf;

use async_trait::async_trait;
use clipforge_common::{Result, VideoRecord};
use reqwest::Client;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stage results
// ---------------------------------------------------------------------------

/// Result of a stage that did not hard-fail.
///
/// Hard failures are the `Err` side of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The preferred path produced the value.
    Produced(T),
    /// A fallback value was substituted; `reason` says why.
    Degraded { value: T, reason: String },
}

impl<T> StageOutcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        StageOutcome::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            StageOutcome::Produced(value) | StageOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Produced(value) | StageOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StageOutcome::Produced(_) => None,
            StageOutcome::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// A configured client, or nothing to call.
#[derive(Debug, Clone)]
pub enum Provider<C> {
    Configured(C),
    Unconfigured,
}

impl<C> Provider<C> {
    pub fn is_configured(&self) -> bool {
        matches!(self, Provider::Configured(_))
    }
}

// ---------------------------------------------------------------------------
// Stage data
// ---------------------------------------------------------------------------

/// Output of the script stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    pub script: String,
}

/// What the speech stage actually stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechKind {
    /// Synthesized audio from the provider.
    Audio,
    /// The script text written out because no audio was available.
    Transcript,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechArtifact {
    pub path: PathBuf,
    pub kind: SpeechKind,
}

// ---------------------------------------------------------------------------
// Stage traits
// ---------------------------------------------------------------------------

/// Turns a topic into a title and script. The only stage allowed to hard-fail.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn write_script(&self, topic: &str) -> Result<StageOutcome<Script>>;
}

/// Turns script text into a stored speech artifact.
///
/// Provider failures degrade to a transcript; only local I/O errors surface.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, text: &str) -> Result<StageOutcome<SpeechArtifact>>;
}

/// Turns a script and its speech into a video reference.
///
/// Provider failures degrade to a placeholder artifact; only local I/O
/// errors surface.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(
        &self,
        script: &str,
        speech: &SpeechArtifact,
    ) -> Result<StageOutcome<String>>;
}

/// Mirrors a persisted record into an external catalog.
///
/// `Ok(None)` means there was nothing to sync to.
#[async_trait]
pub trait CatalogSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn sync(&self, record: &VideoRecord) -> Result<Option<serde_json::Value>>;
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const USER_AGENT: &str = concat!("clipforge/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client. Adapters set a timeout on every request, so
/// the plain fallback client loses only the user agent.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client: {}", e);
            Client::new()
        })
}

/// Turn a non-success response into an error message carrying its body.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(format!("HTTP {}: {}", status, body.trim()))
}
