use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Build the default filter directive for this crate, e.g. `gomarketplace_cart=info`.
///
/// The target is the crate's module path, independent of the configured service name.
pub fn default_filter_directive(log_level: &str) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), log_level)
}

/// Initialize structured logging for the process.
///
/// `RUST_LOG` takes precedence over `log_level`. Returns an error instead of
/// panicking if a global subscriber is already installed.
pub fn init_observability(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let directive = default_filter_directive(log_level);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&directive)
            .map_err(|e| ObservabilityError::Config(format!("{}: {}", directive, e)))?,
    };

    if enable_json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    info!(
        "Logging initialized for {} (json={})",
        service_name, enable_json_logging
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_directive() {
        assert_eq!(default_filter_directive("debug"), "gomarketplace_cart=debug");
    }

    #[test]
    fn test_directive_targets_crate_regardless_of_service_name() {
        let directive = default_filter_directive("info");

        assert_eq!(directive, "gomarketplace_cart=info");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_second_init_is_an_error() {
        // Only this test installs a global subscriber in the unit test binary
        let first = init_observability("gomarketplace-cart", "info", false);
        let second = init_observability("gomarketplace-cart", "info", true);

        assert!(first.is_ok());
        assert!(matches!(second, Err(ObservabilityError::TracingInit(_))));
    }
}
