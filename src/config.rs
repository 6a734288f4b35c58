//! Configuration and settings management
//!
//! Loads settings from `.env`, optional config files and environment variables,
//! and defines the remove.bg and reply constants.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Default remove.bg endpoint.
pub const REMOVE_BG_API_URL: &str = "https://api.remove.bg/v1.0/removebg";
/// Timeout for a single remove.bg request (seconds).
pub const REMOVE_BG_TIMEOUT_SECS: u64 = 60;
/// Header carrying the remove.bg API key.
pub const REMOVE_BG_API_KEY_HEADER: &str = "X-Api-Key";
/// Value of the `size` form field sent to remove.bg.
pub const REMOVE_BG_SIZE: &str = "auto";
/// File name of the uploaded image part.
pub const REMOVE_BG_UPLOAD_FILE_NAME: &str = "image.png";

/// File name of the PNG sent back to the user.
pub const RESULT_FILE_NAME: &str = "no-bg.png";
/// Caption attached to the processed PNG.
pub const RESULT_CAPTION: &str = "Done ✅ Background removed.";

/// Application settings loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token (`TELEGRAM_BOT_TOKEN`)
    pub telegram_bot_token: String,

    /// remove.bg API key (`REMOVE_BG_API_KEY`)
    pub remove_bg_api_key: Option<String>,

    /// remove.bg endpoint (`REMOVE_BG_API_URL`)
    #[serde(default = "default_remove_bg_api_url")]
    pub remove_bg_api_url: String,

    /// remove.bg request timeout in seconds (`REMOVE_BG_TIMEOUT_SECS`)
    #[serde(default = "default_remove_bg_timeout_secs")]
    pub remove_bg_timeout_secs: u64,
}

fn default_remove_bg_api_url() -> String {
    REMOVE_BG_API_URL.to_string()
}

const fn default_remove_bg_timeout_secs() -> u64 {
    REMOVE_BG_TIMEOUT_SECS
}

/// Build the layered configuration source.
///
/// Order (later wins): `config/default`, `config/{RUN_MODE}`, `config/local`,
/// `APP__*` variables, then plain environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Environment::default() maps UPPER_SNAKE_CASE to snake_case keys
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the bot token is missing.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(build_config()?)
    }

    /// Deserialize and check settings from an already built [`Config`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if deserialization fails or the bot token is blank.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        if settings.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "TELEGRAM_BOT_TOKEN is missing in environment/.env".to_string(),
            ));
        }
        Ok(settings)
    }

    /// The remove.bg API key, if one is configured and non-blank.
    #[must_use]
    pub fn remove_bg_api_key(&self) -> Option<&str> {
        self.remove_bg_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Timeout applied to each remove.bg request.
    #[must_use]
    pub const fn remove_bg_timeout(&self) -> Duration {
        Duration::from_secs(self.remove_bg_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let settings =
            Settings::from_config(config_with(&[("telegram_bot_token", "123:abc")])).unwrap();

        assert_eq!(settings.remove_bg_api_url, REMOVE_BG_API_URL);
        assert_eq!(settings.remove_bg_timeout(), Duration::from_secs(60));
        assert!(settings.remove_bg_api_key().is_none());
    }

    #[test]
    fn test_overrides_and_api_key() {
        let settings = Settings::from_config(config_with(&[
            ("telegram_bot_token", "123:abc"),
            ("remove_bg_api_key", "secret"),
            ("remove_bg_api_url", "http://localhost:9000/removebg"),
            ("remove_bg_timeout_secs", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.remove_bg_api_key(), Some("secret"));
        assert_eq!(settings.remove_bg_api_url, "http://localhost:9000/removebg");
        assert_eq!(settings.remove_bg_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let settings = Settings::from_config(config_with(&[
            ("telegram_bot_token", "123:abc"),
            ("remove_bg_api_key", "   "),
        ]))
        .unwrap();

        assert!(settings.remove_bg_api_key().is_none());
    }

    #[test]
    fn test_missing_token_is_error() {
        assert!(Settings::from_config(config_with(&[("remove_bg_api_key", "secret")])).is_err());
        assert!(Settings::from_config(config_with(&[("telegram_bot_token", " ")])).is_err());
    }
}
