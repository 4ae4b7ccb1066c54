//! Script stage: chat-completions client plus the local template fallback.

use std::time::Duration;

use async_trait::async_trait;
use clipforge_common::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_for_status, http_client, Provider, Script, ScriptWriter, StageOutcome};
use crate::config::{credential, ScriptConfig};

const STAGE: &str = "script";

// ---------------------------------------------------------------------------
// Wire types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat-completions client.
pub struct OpenAiScriptClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiScriptClient {
    pub fn new(config: &ScriptConfig, api_key: &str) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Ask the model for a short-form script about `topic`.
    pub async fn generate(&self, topic: &str) -> Result<Script> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let prompt = script_prompt(topic);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(url = %url, model = %self.model, "Requesting script");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let response = error_for_status(response)
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(STAGE, format!("invalid response body: {e}")))?;

        let script = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::provider(STAGE, "response contained no script text"))?;

        Ok(Script {
            title: topic.to_string(),
            script,
        })
    }
}

fn script_prompt(topic: &str) -> String {
    format!(
        "Create a 15-30 second TikTok style script for the topic '{topic}'. \
         Include a hook, value, and CTA. Return only the script text."
    )
}

/// Deterministic hook/value/CTA script used when no model is configured.
pub fn template_script(topic: &str) -> Script {
    Script {
        title: format!("{topic} - Quick Tip"),
        script: format!(
            "Hook: Want a quick {topic} tip?\n\
             Value: Here's one fast tip you can use today...\n\
             CTA: Follow for more."
        ),
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct ScriptAdapter {
    provider: Provider<OpenAiScriptClient>,
}

impl ScriptAdapter {
    pub fn new(provider: Provider<OpenAiScriptClient>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &ScriptConfig) -> Self {
        let provider = match credential(&config.api_key) {
            Some(key) => Provider::Configured(OpenAiScriptClient::new(config, key)),
            None => Provider::Unconfigured,
        };
        Self::new(provider)
    }
}

#[async_trait]
impl ScriptWriter for ScriptAdapter {
    fn name(&self) -> &'static str {
        match self.provider {
            Provider::Configured(_) => "openai",
            Provider::Unconfigured => "template",
        }
    }

    async fn write_script(&self, topic: &str) -> Result<StageOutcome<Script>> {
        match &self.provider {
            Provider::Configured(client) => client.generate(topic).await.map(StageOutcome::Produced),
            Provider::Unconfigured => Ok(StageOutcome::Produced(template_script(topic))),
        }
    }
}
