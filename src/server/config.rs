use super::RequestsLoggingLevel;

/// Default maximum accepted request body, in bytes.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// Requests with a larger body are rejected with 413.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8080,
            metrics_port: 9091,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}
