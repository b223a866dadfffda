//! Console logging

use sc_login_core::{CoreError, CoreResult};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_web::MakeWebConsoleWriter;

/// Send `tracing` output to the browser console
pub fn init_logging(level: Level) -> CoreResult<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(LevelFilter::from_level(level))
        .try_init()
        .map_err(|e| CoreError::invalid_config(format!("failed to initialize logging: {e}")))
}
