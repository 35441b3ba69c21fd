use std::env;
use std::time::Duration;

use anyhow::{bail, Context};

const DEV_SESSION_SECRET: &str = "change-me-to-a-random-32-char-string";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub backend_url: String,
    pub session_secret: String,
    pub secure_cookies: bool,
    pub cors_origin: String,
    pub listing_timeout: Duration,
    pub ai_timeout: Duration,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => bail!("DATABASE_URL is not defined in the environment"),
        };

        let config = Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            database_url,
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEV_SESSION_SECRET.to_string()),
            secure_cookies: env::var("SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            listing_timeout: seconds_from_env("LISTING_TIMEOUT_SECS", 20)?,
            ai_timeout: seconds_from_env("AI_TIMEOUT_SECS", 30)?,
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        Ok(config)
    }

    /// True when a production deployment still runs with the built-in secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.secure_cookies && self.session_secret == DEV_SESSION_SECRET
    }
}

fn seconds_from_env(key: &str, default: u64) -> anyhow::Result<Duration> {
    let secs = match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds"))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
impl Config {
    pub fn for_tests(backend_url: &str) -> Self {
        Self {
            server_port: 0,
            database_url: ":memory:".to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            session_secret: "test-session-secret".to_string(),
            secure_cookies: false,
            cors_origin: "http://localhost:3000".to_string(),
            listing_timeout: Duration::from_secs(2),
            ai_timeout: Duration::from_secs(2),
            log_json: false,
        }
    }
}
