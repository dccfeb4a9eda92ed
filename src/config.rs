use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/search";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        endpoint: get_env_or_default("CURIOSITY_ENDPOINT", DEFAULT_ENDPOINT),
        page_size: get_env_parsed("CURIOSITY_PAGE_SIZE"),
        timeout_ms: get_env_parsed("CURIOSITY_TIMEOUT_MS"),
    }
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    /// Results per page; the backend picks (and caps) it when unset.
    pub page_size: Option<usize>,
    /// Off unless set. Without it a stalled request waits until cancelled.
    pub timeout_ms: Option<u64>,
}

impl Config {
    pub fn new(endpoint: impl Into<String>) -> Config {
        Config {
            endpoint: endpoint.into(),
            page_size: None,
            timeout_ms: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_ENDPOINT)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    Some(
        raw.trim()
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for environment variable {key}: {raw:?}")),
    )
}
