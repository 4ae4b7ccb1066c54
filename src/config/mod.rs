mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override credentials from the config file.
const ENV_OVERRIDES: &[&str] = &[
    "OPENAI_API_KEY",
    "ELEVENLABS_API_KEY",
    "HEYGEN_API_KEY",
    "AIRTABLE_API_KEY",
    "AIRTABLE_BASE_ID",
    "AIRTABLE_TABLE_NAME",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./clipforge.toml",
        "./config.toml",
        "~/.config/clipforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Overlay credentials from the environment onto `config`.
///
/// `lookup` is `std::env::var` in production; blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in ENV_OVERRIDES {
        let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        match *key {
            "OPENAI_API_KEY" => config.script.api_key = Some(value),
            "ELEVENLABS_API_KEY" => config.speech.api_key = Some(value),
            "HEYGEN_API_KEY" => config.video.api_key = Some(value),
            "AIRTABLE_API_KEY" => config.catalog.api_key = Some(value),
            "AIRTABLE_BASE_ID" => config.catalog.base_id = Some(value),
            "AIRTABLE_TABLE_NAME" => config.catalog.table_name = value,
            _ => {}
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.video.max_poll_attempts == 0 {
        anyhow::bail!("video.max_poll_attempts must be at least 1");
    }

    if credential(&config.catalog.api_key).is_some() && credential(&config.catalog.base_id).is_none()
    {
        anyhow::bail!("catalog.api_key is set but catalog.base_id is missing");
    }

    if config.catalog.table_name.trim().is_empty() {
        anyhow::bail!("catalog.table_name cannot be empty");
    }

    if let Some(ref dir) = config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Dashboard static dir does not exist: {:?}", dir);
        }
    }

    Ok(())
}
