use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{DEFAULT_PER_PAGE, DEFAULT_SLEEP_SECONDS, DEFAULT_USER_AGENT};
use crate::error::{Result, SyncError};

/// Optional `config.toml` overrides for client behavior.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub discogs: DiscogsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscogsSection {
    pub username: Option<String>,
    pub folder_id: Option<u32>,
    pub user_agent: Option<String>,
    pub per_page: Option<u32>,
    pub sleep_seconds: Option<f64>,
}

impl FileConfig {
    /// Reads the config file when present; absence is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

/// CLI-provided values; `None` defers down the resolution chain.
#[derive(Debug, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub folder_id: Option<u32>,
    pub token: Option<String>,
    pub user_agent: Option<String>,
    pub per_page: Option<u32>,
    pub sleep_seconds: Option<f64>,
}

/// Fully resolved sync settings.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub username: String,
    pub folder_id: u32,
    pub token: Option<String>,
    pub user_agent: String,
    pub per_page: u32,
    pub sleep_seconds: f64,
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolves every knob as CLI argument, then environment, then config
/// file, then built-in default. Only the username is mandatory.
pub fn resolve(cli: Overrides, file: FileConfig) -> Result<SyncSettings> {
    let discogs = file.discogs;

    let username = cli
        .username
        .or_else(|| env_var("DISCOGS_USERNAME"))
        .or(discogs.username)
        .ok_or_else(|| {
            SyncError::Config(
                "username is required (pass --username or set DISCOGS_USERNAME)".to_string(),
            )
        })?;

    let folder_id = cli
        .folder_id
        .or_else(|| env_var("DISCOGS_FOLDER_ID").and_then(|v| v.parse().ok()))
        .or(discogs.folder_id)
        .unwrap_or(0);

    let token = match cli.token.or_else(|| env_var("DISCOGS_TOKEN")) {
        Some(token) => Some(token),
        None => match env_var("DISCOGS_TOKEN_SECRET") {
            Some(secret) => Some(token_from_secret(&secret)?),
            None => None,
        },
    };

    let user_agent = cli
        .user_agent
        .or_else(|| env_var("DISCOGS_USER_AGENT"))
        .or(discogs.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    let per_page = cli
        .per_page
        .or_else(|| env_var("DISCOGS_PER_PAGE").and_then(|v| v.parse().ok()))
        .or(discogs.per_page)
        .unwrap_or(DEFAULT_PER_PAGE);

    let sleep_seconds = cli
        .sleep_seconds
        .or_else(|| env_var("DISCOGS_SLEEP_SECONDS").and_then(|v| v.parse().ok()))
        .or(discogs.sleep_seconds)
        .unwrap_or(DEFAULT_SLEEP_SECONDS);

    Ok(SyncSettings {
        username,
        folder_id,
        token,
        user_agent,
        per_page,
        sleep_seconds,
    })
}

/// Extracts an access token from a secret blob.
///
/// The blob is either the bare token or a JSON object carrying it under
/// one of `token`, `discogs_token`, `api_token`, or `value` (tried in that
/// order), matching how secret managers commonly wrap simple credentials.
pub fn token_from_secret(secret: &str) -> Result<String> {
    let stripped = secret.trim();
    if stripped.is_empty() {
        return Err(SyncError::Config("Discogs token secret is empty".to_string()));
    }

    if stripped.starts_with('{') {
        let payload: serde_json::Value = serde_json::from_str(stripped)
            .map_err(|_| SyncError::Config("Discogs token secret JSON is invalid".to_string()))?;
        for key in ["token", "discogs_token", "api_token", "value"] {
            if let Some(token) = payload[key].as_str() {
                let token = token.trim();
                if !token.is_empty() {
                    return Ok(token.to_string());
                }
            }
        }
        return Err(SyncError::Config(
            "Discogs token secret JSON must include one of: token, discogs_token, api_token, value"
                .to_string(),
        ));
    }

    Ok(stripped.to_string())
}
