//! Tracing subscriber setup for embedders of the verification core

use sv_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber configured from `config`
///
/// `RUST_LOG` overrides the configured level. Returns `false` when a global
/// subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.is_ok()
}
