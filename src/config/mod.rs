use std::env;

use thiserror::Error;
use url::Url;

use crate::resolver::{ResolverConfig, DEFAULT_DATA_API_ENDPOINT, DEFAULT_OEMBED_ENDPOINT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("invalid {name} URL: {value}")]
    InvalidEndpoint { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Shared secret every `/metadata` request must present in `X-API-Key`.
    pub api_key: String,
    /// Enables the YouTube Data API tier when set.
    pub yt_api_key: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    pub oembed_endpoint: Url,
    pub data_api_endpoint: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = non_blank("API_KEY").ok_or(ConfigError::MissingVar("API_KEY"))?;

        let server_port = match env::var("PORT") {
            Ok(port) if !port.trim().is_empty() => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            _ => 8080,
        };

        Ok(Config {
            api_key,
            yt_api_key: non_blank("YT_API_KEY"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port,
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            oembed_endpoint: endpoint("OEMBED_ENDPOINT", DEFAULT_OEMBED_ENDPOINT)?,
            data_api_endpoint: endpoint("YT_DATA_API_ENDPOINT", DEFAULT_DATA_API_ENDPOINT)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            oembed_endpoint: self.oembed_endpoint.clone(),
            data_api_endpoint: self.data_api_endpoint.clone(),
            data_api_key: self.yt_api_key.clone(),
            ..ResolverConfig::default()
        }
    }
}

fn non_blank(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn endpoint(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let value = non_blank(name).unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|_| ConfigError::InvalidEndpoint { name, value })
}
