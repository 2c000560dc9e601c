//! Config file parsing for `~/.config/ean-search/config.toml`.
//!
//! The file is optional; a missing or malformed file falls back to defaults.
//! The API token may also come from the `EAN_SEARCH_API_TOKEN` environment
//! variable, with an explicit value (e.g. a CLI flag) taking precedence over
//! both.

use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_SECS};

pub const TOKEN_ENV_VAR: &str = "EAN_SEARCH_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API token. Optional here; resolution order is flag > file > env.
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_language")]
    pub language: u32,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_language() -> u32 {
    DEFAULT_LANGUAGE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: DEFAULT_LANGUAGE,
        }
    }
}

/// Load config from the default path (`~/.config/ean-search/config.toml`).
pub fn load_config() -> AppConfig {
    let config_path = match config_path() {
        Some(p) => p,
        None => return AppConfig::default(),
    };

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => cfg,
        Err(_) => AppConfig::default(),
    }
}

/// Return the default config file path.
pub fn config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("ean-search");
        p.push("config.toml");
        p
    })
}

/// Resolve the API token: explicit value, then config file, then environment.
pub fn resolve_token(explicit: Option<&str>, cfg: &AppConfig) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| cfg.api.token.clone())
        .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
}
