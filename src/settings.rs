use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Required. Startup fails when `APP_GEMINI_API_KEY` is not set.
    pub gemini_api_key: String,
    pub gemini_base_url: Url,
    pub gemini_model: String,
    pub output_dir: String,
    pub debug: bool,
    pub auth_token: String,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix; "__" keeps
            // snake_case keys like APP_GEMINI_API_KEY flat.
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_default(
                "gemini_base_url",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("gemini_model", "gemini-2.0-flash")?
            .set_default("output_dir", "calendars")?
            .set_default("debug", false)?
            .set_default("auth_token", "default-token-change-me")?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .build()?;

        config.try_deserialize()
    }
}
