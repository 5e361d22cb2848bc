//! Log subscriber and metrics recorder setup.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workforce_config::{LogFormat, ObservabilityConfig};
use workforce_core::{WorkforceError, WorkforceResult};

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("{level},tower_http=info,sqlx=warn")
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
///
/// # Errors
/// `Configuration` if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> WorkforceResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init(),
    }
    .map_err(|e| WorkforceError::Configuration(format!("Failed to install log subscriber: {e}")))
}

/// Installs the Prometheus recorder when metrics are enabled.
///
/// # Errors
/// `Configuration` if a recorder is already installed.
pub fn install_metrics(config: &ObservabilityConfig) -> WorkforceResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }
    PrometheusBuilder::new()
        .install_recorder()
        .map(Some)
        .map_err(|e| WorkforceError::Configuration(format!("Failed to install metrics recorder: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_configured_level() {
        assert_eq!(default_filter("debug"), "debug,tower_http=info,sqlx=warn");
    }

    #[test]
    fn test_disabled_metrics_install_nothing() {
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..Default::default()
        };
        assert!(install_metrics(&config).unwrap().is_none());
    }
}
