//! Logger module
//!
//! A logging system based on `tracing-subscriber` with:
//! - Console output with color control
//! - File output in full, compact or JSON format

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let use_ansi = config.console.colored && std::io::stdout().is_terminal();

    let console_layer = config.console.enabled.then(|| {
        fmt::layer()
            .with_ansi(use_ansi)
            .with_target(true)
            .with_level(true)
    });

    let writer = if config.file.enabled {
        Some(LogFileWriter::new(&config.file)?)
    } else {
        None
    };

    // File layers go before the console layer so ANSI codes never leak into
    // the file output (tokio-rs/tracing#1817).
    let full_layer = writer
        .clone()
        .filter(|_| config.file.format == LogFormat::Full)
        .map(|w| fmt::layer().with_ansi(false).with_target(true).with_writer(w));
    let compact_layer = writer
        .clone()
        .filter(|_| config.file.format == LogFormat::Compact)
        .map(|w| {
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(w)
        });
    let json_layer = writer
        .filter(|_| config.file.format == LogFormat::Json)
        .map(|w| fmt::layer().with_ansi(false).json().with_writer(w));

    tracing_subscriber::registry()
        .with(filter)
        .with(full_layer)
        .with(compact_layer)
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    Ok(())
}
