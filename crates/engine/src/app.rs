//! Application state and composition.

use std::sync::Arc;

use provinggrounds_domain::WorldCatalog;

use crate::config::EngineConfig;
use crate::infrastructure::{
    clock::SystemClock,
    ports::{ClockPort, ScoringPort},
    resilient_scoring::{ResilientScoringClient, RetryConfig},
    scoring_client::HttpScoringClient,
};
use crate::runtime::{GameRuntime, RuntimeHandle};
use crate::session::Session;

/// Main application state.
///
/// Holds the shared catalog and the ports every session is wired with.
pub struct App {
    pub config: EngineConfig,
    pub catalog: Arc<WorldCatalog>,
    pub scoring: Arc<dyn ScoringPort>,
    pub clock: Arc<dyn ClockPort>,
}

impl App {
    /// Create a new App with the HTTP scoring client behind the retry wrapper.
    pub fn new(config: EngineConfig) -> Self {
        let http: Arc<dyn ScoringPort> = Arc::new(HttpScoringClient::from_config(&config.scoring));
        let retry = RetryConfig::default().with_max_retries(config.scoring.max_retries);
        let scoring: Arc<dyn ScoringPort> = Arc::new(ResilientScoringClient::new(http, retry));

        Self::with_ports(config, scoring, Arc::new(SystemClock::new()))
    }

    /// Create an App with explicit ports.
    pub fn with_ports(
        config: EngineConfig,
        scoring: Arc<dyn ScoringPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            config,
            catalog: WorldCatalog::shared(),
            scoring,
            clock,
        }
    }

    /// A fresh session at the start position.
    pub fn new_session(&self) -> Session {
        Session::new(Arc::clone(&self.catalog), self.config.timing, Arc::clone(&self.clock))
            .with_scoring_task(self.config.scoring.task.clone())
    }

    /// A runtime driving a fresh session. Spawn [`GameRuntime::run`] to start it.
    pub fn start_session(&self) -> (GameRuntime, RuntimeHandle) {
        GameRuntime::new(self.new_session(), Arc::clone(&self.scoring))
    }
}
