use std::net::SocketAddr;

use crate::error::AppError;

pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Runtime settings, read from the process environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// FRED key. Absence is not fatal at startup; handlers that need it answer 500.
    pub fred_api_key: Option<String>,
    pub fred_base_url: String,
    pub yahoo_base_url: String,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fred_api_key = std::env::var("FRED_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let fred_base_url = std::env::var("FRED_BASE_URL").unwrap_or(defaults.fred_base_url);
        let yahoo_base_url = std::env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url);
        let host = std::env::var("API_HOST").unwrap_or(defaults.host);
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            fred_api_key,
            fred_base_url: fred_base_url.trim_end_matches('/').to_string(),
            yahoo_base_url: yahoo_base_url.trim_end_matches('/').to_string(),
            host,
            port,
        }
    }

    /// The FRED key, or the 500 every FRED-backed handler answers with when it is unset.
    pub fn require_fred_key(&self) -> Result<&str, AppError> {
        self.fred_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Missing FRED_API_KEY".to_string()))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
