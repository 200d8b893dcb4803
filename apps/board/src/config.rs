use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use board_core::loader::DEFAULT_ENDPOINT;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "board.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub database_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ENDPOINT.into(),
            database_url: "sqlite://./data/board.db".into(),
            request_timeout_seconds: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    database_url: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Defaults, then `board.toml` (or `path`), then environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    let settings = layered_settings(raw.as_deref(), |name| std::env::var(name).ok())
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    Ok(settings)
}

fn layered_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.database_url {
            settings.database_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_seconds {
            settings.request_timeout_seconds = v;
        }
    }

    if let Some(v) = env("BOARD_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    Ok(settings)
}

pub fn validate_api_url(raw: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid api url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => bail!("unsupported api url scheme '{other}' in '{raw}'"),
    }
}

/// Accepts plain paths and `sqlite:` shorthands; anything with a scheme passes through.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    match raw_database_url.trim() {
        "" => Settings::default().database_url,
        url if url.contains("://") || url.starts_with("sqlite::memory:") => url.to_string(),
        path => {
            let path = path.strip_prefix("sqlite:").unwrap_or(path);
            format!("sqlite://{}", path.replace('\\', "/"))
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
