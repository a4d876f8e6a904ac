use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Process configuration, read from the environment exactly once at startup.
/// Provider credential presence is frozen here for the process lifetime; there
/// is no runtime re-detection.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_api_token: Option<String>,
    pub zerogpt_api_key: Option<String>,
    pub languagetool_api_url: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = non_empty("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL is required".to_string()))?;

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT is not a valid port: {e}")))?,
            None => 5000,
        };

        let log_dir = non_empty("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs"));

        Ok(Self {
            database_url,
            port,
            log_dir,
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            perplexity_api_key: non_empty("PERPLEXITY_API_KEY"),
            cloudflare_account_id: non_empty("CLOUDFLARE_ACCOUNT_ID"),
            cloudflare_api_token: non_empty("CLOUDFLARE_API_TOKEN"),
            zerogpt_api_key: non_empty("ZEROGPT_API_KEY"),
            languagetool_api_url: non_empty("LANGUAGETOOL_API_URL"),
        })
    }

    /// Cloudflare Workers AI needs both the account id and the API token.
    pub fn cloudflare_credentials(&self) -> Option<(String, String)> {
        match (&self.cloudflare_account_id, &self.cloudflare_api_token) {
            (Some(account), Some(token)) => Some((account.clone(), token.clone())),
            _ => None,
        }
    }
}
