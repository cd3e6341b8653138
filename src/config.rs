use crate::booking::constants::DEFAULT_ACCEPTED_COLOR;
use std::env;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const DEFAULT_CREDENTIALS_FILE: &str = "credentials.txt";

/// Runtime configuration, read from the environment (a .env file is loaded
/// at startup). Cloned into each session loop; nothing is shared afterwards.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// chromedriver endpoint.
    pub webdriver_url: String,
    /// Path to the plain-text credential list.
    pub credentials_path: String,
    /// Rendered background colour a bookable slot must match exactly.
    pub accepted_color: String,
}

impl BotConfig {
    pub fn from_env() -> Self {
        BotConfig {
            webdriver_url: env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
            credentials_path: env::var("CREDENTIALS_FILE")
                .unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string()),
            accepted_color: env::var("ACCEPTED_COLOR")
                .unwrap_or_else(|_| DEFAULT_ACCEPTED_COLOR.to_string()),
        }
    }
}
