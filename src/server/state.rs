use axum::extract::FromRef;

use crate::fetcher::JobRegistry;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedJobRegistry = Arc<JobRegistry>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub registry: GuardedJobRegistry,
}

impl ServerState {
    pub fn new(config: ServerConfig, registry: GuardedJobRegistry) -> Self {
        Self { config, registry }
    }
}

impl FromRef<ServerState> for GuardedJobRegistry {
    fn from_ref(input: &ServerState) -> Self {
        input.registry.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
