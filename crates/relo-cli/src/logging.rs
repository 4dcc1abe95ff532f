use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relo_core::config::AppConfig;

const DEFAULT_DIRECTIVES: &str =
    "relo_cli=info,relo_app=info,relo_runtime=info,relo_api=info,relo_core=info";

/// Install the global subscriber: a daily log file in the platform log
/// directory, plus stderr (warnings only unless `verbose`).
///
/// `RUST_LOG` overrides the default directives. Keep the returned guard
/// alive until exit or buffered file output is lost.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let stderr_filter = if verbose {
        env_filter()
    } else {
        EnvFilter::new("warn")
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let log_dir = AppConfig::log_dir();
    let (file_layer, guard) = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&log_dir, "relo.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter());
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!(
                "warning: cannot create log directory {}: {e}",
                log_dir.display()
            );
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), "Logging initialized");
    guard
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
