use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::conversation::{SessionIdentity, DEFAULT_THREAD_ID, DEFAULT_USER_ID};
use crate::core::modes::Mode;

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides the configured backend URL.
pub const API_URL_ENV: &str = "NOVAHUB_API_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the agent backend (e.g., "http://127.0.0.1:8000")
    pub api_url: Option<String>,
    pub thread_id: Option<String>,
    pub user_id: Option<String>,
    /// Mode selected when a session starts
    pub default_mode: Option<Mode>,
}

impl Config {
    /// Pick the backend URL: explicit flag, then environment, then this file,
    /// then [`DEFAULT_API_URL`]. Blank values are skipped.
    pub fn resolve_api_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    /// [`Config::resolve_api_url`] with the environment read from
    /// [`API_URL_ENV`].
    pub fn api_url_for(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        self.resolve_api_url(flag, env.as_deref())
    }

    pub fn resolve_mode(&self, flag: Option<Mode>) -> Mode {
        flag.or(self.default_mode).unwrap_or_default()
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            thread_id: non_blank(&self.thread_id).unwrap_or(DEFAULT_THREAD_ID).to_string(),
            user_id: non_blank(&self.user_id).unwrap_or(DEFAULT_USER_ID).to_string(),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), InvalidConfigValue> {
        let value = value.trim();
        if value.is_empty() {
            return Err(InvalidConfigValue {
                key,
                reason: "value must not be empty".to_string(),
            });
        }

        match key {
            ConfigKey::ApiUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(InvalidConfigValue {
                        key,
                        reason: format!("'{value}' is not an http(s) URL"),
                    });
                }
                self.api_url = Some(value.to_string());
            }
            ConfigKey::ThreadId => self.thread_id = Some(value.to_string()),
            ConfigKey::UserId => self.user_id = Some(value.to_string()),
            ConfigKey::DefaultMode => {
                let mode = value.parse::<Mode>().map_err(|err| InvalidConfigValue {
                    key,
                    reason: err.to_string(),
                })?;
                self.default_mode = Some(mode);
            }
        }
        Ok(())
    }

    /// Clear a key. Returns whether it held a value.
    pub fn unset(&mut self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::ApiUrl => self.api_url.take().is_some(),
            ConfigKey::ThreadId => self.thread_id.take().is_some(),
            ConfigKey::UserId => self.user_id.take().is_some(),
            ConfigKey::DefaultMode => self.default_mode.take().is_some(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Keys accepted by `novahub set` and `novahub unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiUrl,
    ThreadId,
    UserId,
    DefaultMode,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::ApiUrl,
        ConfigKey::ThreadId,
        ConfigKey::UserId,
        ConfigKey::DefaultMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api-url",
            ConfigKey::ThreadId => "thread-id",
            ConfigKey::UserId => "user-id",
            ConfigKey::DefaultMode => "default-mode",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConfigKey {
    pub input: String,
}

impl fmt::Display for UnknownConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
        write!(
            f,
            "Unknown config key '{}'. Available keys: {}",
            self.input,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownConfigKey {}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Accept the TOML spelling too.
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "api-url" => Ok(ConfigKey::ApiUrl),
            "thread-id" => Ok(ConfigKey::ThreadId),
            "user-id" => Ok(ConfigKey::UserId),
            "default-mode" | "mode" => Ok(ConfigKey::DefaultMode),
            _ => Err(UnknownConfigKey {
                input: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConfigValue {
    pub key: ConfigKey,
    pub reason: String,
}

impl fmt::Display for InvalidConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid value for {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for InvalidConfigValue {}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/novahub/config.toml` → `~/.config/novahub/config.toml`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
