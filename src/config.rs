use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::api::SortBy;
use crate::cli::{Cli, LogFormat};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid server URL `{url}`: {reason}")]
    ServerUrl { url: String, reason: String },
    #[error("server URL `{0}` must use http or https")]
    Scheme(String),
    #[error("page size must be greater than zero")]
    PageSize,
    #[error("request timeout must be greater than zero")]
    Timeout,
}

/// Validated settings shared by the TUI and the one-shot commands.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: Url,
    pub page_size: u32,
    pub sort_by: SortBy,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let server_url = Url::parse(&cli.server_url).map_err(|e| ConfigError::ServerUrl {
            url: cli.server_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(ConfigError::Scheme(cli.server_url.clone()));
        }
        if cli.page_size == 0 {
            return Err(ConfigError::PageSize);
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }

        Ok(Self {
            server_url,
            page_size: cli.page_size,
            sort_by: cli.sort,
            timeout: Duration::from_secs(cli.timeout_secs),
            log_file: cli.log_file.clone(),
            log_format: cli.log_format,
        })
    }
}
