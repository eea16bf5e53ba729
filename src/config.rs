use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_THUMB_CONCURRENCY: usize = 8;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        api_url: get_env_or_default("SCENESEARCH_API_URL", DEFAULT_API_URL),
        bind: get_env_or_default("SCENESEARCH_BIND", DEFAULT_BIND),
        timeout: get_env_parsed::<u64>("SCENESEARCH_TIMEOUT_SECS").map(Duration::from_secs),
        thumb_concurrency: get_env_parsed("SCENESEARCH_THUMB_CONCURRENCY")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_THUMB_CONCURRENCY),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub bind: String,
    /// Per-request timeout for backend calls. `None` means wait indefinitely.
    pub timeout: Option<Duration>,
    pub thumb_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            bind: DEFAULT_BIND.to_string(),
            timeout: None,
            thumb_concurrency: DEFAULT_THUMB_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring unparseable {key}={raw}");
            None
        }
    }
}
