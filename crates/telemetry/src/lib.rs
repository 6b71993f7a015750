//! Tracing subscriber bootstrap driven by [`TelemetrySettings`].

use biblio_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Resolve the log filter: `RUST_LOG` wins, then the configured level.
///
/// An unparsable configured level falls back to `info` with a warning on
/// stderr, since no subscriber exists yet to carry it.
pub fn env_filter(settings: &TelemetrySettings) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    match settings.log_level.parse::<EnvFilter>() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!(
                "WARN: log_level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                settings.log_level, e
            );
            EnvFilter::new("info")
        }
    }
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(settings: &TelemetrySettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_target(true);

    let installed = match settings.log_format {
        LogFormat::Json => subscriber.json().try_init().is_ok(),
        LogFormat::Pretty => subscriber.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(
            target: "biblio-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back_to_info() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            log_level: "biblio=loud".to_string(),
        };
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(env_filter(&settings).to_string(), "info");
        }
    }

    #[test]
    fn init_twice_does_not_panic() {
        let settings = TelemetrySettings::default();
        init(&settings);
        init(&settings);
    }
}
