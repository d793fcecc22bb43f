//! Subscriber setup.
//!
//! Installs one global `tracing` subscriber: an `EnvFilter` built from the
//! configured level and either a pretty or a JSON fmt layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level {:?}: {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if !config.console_output {
        registry.try_init()
    } else if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        registry.with(json_layer).try_init()
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = TelemetryConfig {
            log_level: "cb_01_frame_dedup=loud".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(matches!(
            init_tracing(&config),
            Err(TelemetryError::Config(_))
        ));
    }
}
