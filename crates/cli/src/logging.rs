use relcache_core::DOT_RELCACHE_LOGS_DIR;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::writer::MakeWriterExt, prelude::*, EnvFilter};

/// Logs to stderr (filtered by `RUST_LOG`, `info` by default) and to an hourly rolling file.
///
/// Keep the returned guard alive until exit, dropping it flushes the file writer.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let appender = tracing_appender::rolling::hourly(DOT_RELCACHE_LOGS_DIR, "relcache.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking.with_max_level(Level::DEBUG))
        .with_ansi(false)
        .compact()
        .with_filter(EnvFilter::new("info,relcache_core=debug,relcache=debug"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
