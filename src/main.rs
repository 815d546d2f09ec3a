use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fetcher_server::config;
use fetcher_server::fetcher::{HttpFetcher, JobRegistry};
use fetcher_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Maximum size in bytes of a request body.
    #[clap(long, default_value_t = fetcher_server::server::config::DEFAULT_MAX_BODY_SIZE)]
    pub max_body_size: usize,

    /// Timeout in seconds for each fetch request.
    #[clap(long, default_value_t = 5)]
    pub fetch_timeout_sec: u64,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            max_body_size: args.max_body_size,
            fetch_timeout_sec: args.fetch_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;
    info!("Configuration:");
    info!("  port: {}", app_config.port);
    info!("  metrics_port: {}", app_config.metrics_port);
    info!("  logging_level: {}", app_config.logging_level);
    info!("  max_body_size: {}", app_config.max_body_size);
    info!("  fetch_timeout_sec: {}", app_config.fetcher.timeout_sec);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let fetcher = Arc::new(HttpFetcher::new(app_config.fetcher.timeout_sec)?);
    let shutdown_token = CancellationToken::new();
    let registry = Arc::new(JobRegistry::with_shutdown_token(
        fetcher,
        shutdown_token.child_token(),
    ));

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, initiating graceful shutdown");
            signal_token.cancel();
        }
    });

    let server_config: ServerConfig = app_config.server_config();
    let result = run_server(server_config, registry.clone(), shutdown_token.clone()).await;
    info!("HTTP server stopped: {:?}", result);

    shutdown_token.cancel();
    registry.shutdown().await;

    result
}
