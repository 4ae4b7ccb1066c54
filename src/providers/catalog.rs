//! Catalog stage: best-effort mirror of saved records into an
//! Airtable-compatible table.

use std::time::Duration;

use async_trait::async_trait;
use clipforge_common::{Error, Result, VideoRecord, VideoStatus};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{error_for_status, http_client, CatalogSink, Provider};
use crate::config::{credential, CatalogConfig};

const STAGE: &str = "catalog";

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a> {
    fields: CatalogFields<'a>,
}

#[derive(Debug, Serialize)]
struct CatalogFields<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Script")]
    script: &'a str,
    #[serde(rename = "AudioURL")]
    audio_url: &'a str,
    #[serde(rename = "VideoURL")]
    video_url: &'a str,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Posted")]
    posted: bool,
}

/// Airtable-compatible table client.
pub struct AirtableClient {
    client: Client,
    table_url: String,
    api_key: String,
    timeout: Duration,
}

impl AirtableClient {
    pub fn new(config: &CatalogConfig, api_key: &str, base_id: &str) -> Self {
        Self {
            client: http_client(),
            table_url: format!(
                "{}/v0/{}/{}",
                config.base_url.trim_end_matches('/'),
                base_id,
                config.table_name
            ),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Create one row for a freshly generated video. Not retried.
    pub async fn create_record(&self, record: &VideoRecord) -> Result<Value> {
        let body = CreateRecordRequest {
            fields: CatalogFields {
                title: &record.title,
                script: &record.script,
                audio_url: &record.audio_path,
                video_url: &record.video_url,
                status: VideoStatus::Generated.to_string(),
                posted: false,
            },
        };

        let response = self
            .client
            .post(&self.table_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        let response = error_for_status(response)
            .await
            .map_err(|e| Error::provider(STAGE, e))?;

        response
            .json()
            .await
            .map_err(|e| Error::provider(STAGE, format!("invalid response body: {e}")))
    }
}

pub struct CatalogAdapter {
    provider: Provider<AirtableClient>,
}

impl CatalogAdapter {
    pub fn new(provider: Provider<AirtableClient>) -> Self {
        Self { provider }
    }

    /// Needs both an API key and a base id; either missing means no sync.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let provider = match (credential(&config.api_key), credential(&config.base_id)) {
            (Some(key), Some(base_id)) => {
                Provider::Configured(AirtableClient::new(config, key, base_id))
            }
            _ => Provider::Unconfigured,
        };
        Self::new(provider)
    }
}

#[async_trait]
impl CatalogSink for CatalogAdapter {
    fn name(&self) -> &'static str {
        match self.provider {
            Provider::Configured(_) => "airtable",
            Provider::Unconfigured => "none",
        }
    }

    async fn sync(&self, record: &VideoRecord) -> Result<Option<Value>> {
        match &self.provider {
            Provider::Configured(client) => client.create_record(record).await.map(Some),
            Provider::Unconfigured => Ok(None),
        }
    }
}
