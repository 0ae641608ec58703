//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::{LogSettings, SettingsError};

/// Installs the global subscriber. `RUST_LOG` wins over `log.level`.
pub fn init_tracing(log: &LogSettings) -> Result<(), SettingsError> {
    let filter = filter(log)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SettingsError::Telemetry(e.to_string()))
}

/// Subscriber whose output is captured by the test harness. Safe to call
/// from every test; only the first call installs anything.
pub fn init_test_tracing(log: &LogSettings) {
    if let Ok(filter) = filter(log) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

fn filter(log: &LogSettings) -> Result<EnvFilter, SettingsError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .map_err(|e| SettingsError::Telemetry(e.to_string()))
}
