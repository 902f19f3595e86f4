//! File-backed tracing setup.
//!
//! The terminal is the UI, so logs never go to stdout; they land in a daily
//! rolling file under the state directory. `RUST_LOG` overrides the default
//! filter.

use std::path::Path;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_dir: PathBuf,
}

pub fn init(state_dir: &Path) -> Option<LoggingGuard> {
    let log_dir = state_dir.join("logs");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(&log_dir, "mdscope.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mdscope=info"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );
    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
