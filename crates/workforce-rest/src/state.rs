//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use workforce_core::messaging::{CommandDispatcher, QueryDispatcher};
use workforce_core::HealthCheck;
use workforce_security::{PolicyTable, TokenProvider};
use workforce_service::AuthService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<QueryDispatcher>,
    pub commands: Arc<CommandDispatcher>,
    pub policies: Arc<PolicyTable>,
    pub token_provider: Arc<TokenProvider>,
    pub auth_service: Arc<dyn AuthService>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    /// Renders `/metrics`; `None` when metrics are disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state without health checks or metrics.
    pub fn new(
        queries: QueryDispatcher,
        commands: CommandDispatcher,
        policies: PolicyTable,
        token_provider: Arc<TokenProvider>,
        auth_service: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            queries: Arc::new(queries),
            commands: Arc::new(commands),
            policies: Arc::new(policies),
            token_provider,
            auth_service,
            health_checks: Vec::new(),
            metrics: None,
        }
    }

    /// Adds a dependency probed by `/health/ready`.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
