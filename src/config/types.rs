use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub script: ScriptConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub video: VideoConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Where the catalog and generated artifacts live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    #[serde(default = "default_videos_dir")]
    pub videos_dir: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/videos.json")
}
fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}
fn default_videos_dir() -> PathBuf {
    PathBuf::from("videos")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            audio_dir: default_audio_dir(),
            videos_dir: default_videos_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the dashboard front-end, served as a fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Chat-completions provider used to write scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptConfig {
    /// Bearer token (overridden by `OPENAI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_script_base_url")]
    pub base_url: String,

    #[serde(default = "default_script_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_script_timeout")]
    pub timeout_secs: u64,
}

fn default_script_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_script_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_max_tokens() -> u32 {
    200
}
fn default_script_timeout() -> u64 {
    30
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_script_base_url(),
            model: default_script_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_script_timeout(),
        }
    }
}

/// Text-to-speech provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// API key sent as `xi-api-key` (overridden by `ELEVENLABS_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

fn default_speech_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}
fn default_voice() -> String {
    "alloy".to_string()
}
fn default_speech_timeout() -> u64 {
    60
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_speech_base_url(),
            voice: default_voice(),
            timeout_secs: default_speech_timeout(),
        }
    }
}

/// Avatar video renderer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoConfig {
    /// Bearer token (overridden by `HEYGEN_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_video_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub avatar_id: Option<String>,

    #[serde(default)]
    pub background_id: Option<String>,

    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Pause between consecutive job-status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_video_base_url() -> String {
    "https://api.heygen.com".to_string()
}
fn default_submit_timeout() -> u64 {
    120
}
fn default_poll_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    2
}
fn default_max_poll_attempts() -> u32 {
    30
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_video_base_url(),
            avatar_id: None,
            background_id: None,
            submit_timeout_secs: default_submit_timeout(),
            poll_timeout_secs: default_poll_timeout(),
            poll_interval_secs: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl VideoConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Tabular catalog mirror.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Bearer token (overridden by `AIRTABLE_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base identifier (overridden by `AIRTABLE_BASE_ID`)
    #[serde(default)]
    pub base_id: Option<String>,

    /// Table name (overridden by `AIRTABLE_TABLE_NAME`)
    #[serde(default = "default_table_name")]
    pub table_name: String,

    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_table_name() -> String {
    "Videos".to_string()
}
fn default_catalog_base_url() -> String {
    "https://api.airtable.com".to_string()
}
fn default_catalog_timeout() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: None,
            table_name: default_table_name(),
            base_url: default_catalog_base_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

/// Treat a missing or blank credential as "not configured".
pub fn credential(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
