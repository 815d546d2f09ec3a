mod file_config;

pub use file_config::{FetcherConfig, FileConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub max_body_size: usize,
    pub fetch_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            max_body_size: crate::server::config::DEFAULT_MAX_BODY_SIZE,
            fetch_timeout_sec: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub max_body_size: usize,

    pub fetcher: FetcherSettings,
}

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!(
                "API port and metrics port must differ (both are {})",
                port
            );
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {:?}", s),
            },
            None => cli.logging_level.clone(),
        };

        let max_body_size = file.max_body_size.unwrap_or(cli.max_body_size);
        if max_body_size == 0 {
            bail!("max_body_size must be greater than zero");
        }

        let fetcher_file = file.fetcher.unwrap_or_default();
        let fetcher = FetcherSettings {
            timeout_sec: fetcher_file.timeout_sec.unwrap_or(cli.fetch_timeout_sec),
        };
        if fetcher.timeout_sec == 0 {
            bail!("Fetch timeout must be greater than zero");
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            max_body_size,
            fetcher,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            max_body_size: self.max_body_size,
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
