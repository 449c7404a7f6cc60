use std::path::PathBuf;
use std::sync::{LazyLock, Mutex};
use tracing_subscriber::{
    fmt::{self},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

static LOGGER_INITIALIZED: std::sync::Once = std::sync::Once::new();

// Keep the guard alive for the lifetime of the program
static FILE_APPENDER_GUARD: LazyLock<Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> =
    LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Filter directive used when RUST_LOG is unset, "info" when None
    pub level: Option<String>,
    /// Also write plain-text logs to this file
    pub file: Option<PathBuf>,
}

fn env_filter(options: &LoggingOptions) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(options.level.as_deref()))
}

/// Filter for a configured level, "info" when unset or unparsable
fn configured_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(level.unwrap_or("info")).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(options: &LoggingOptions) -> std::io::Result<()> {
    let file_target = match &options.file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let name = path.file_name().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("log file {} has no file name", path.display()),
                )
            })?;
            std::fs::create_dir_all(&dir)?;
            Some((dir, name.to_os_string()))
        }
        None => None,
    };

    LOGGER_INITIALIZED.call_once(|| {
        // stdout carries command output, logs go to stderr
        let console_layer = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_filter(env_filter(options));

        let file_layer = file_target.map(|(dir, name)| {
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Store the guard to keep the writer alive
            if let Ok(mut guard_mutex) = FILE_APPENDER_GUARD.lock() {
                *guard_mutex = Some(guard);
            }

            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter(options))
        });

        // a subscriber installed by an embedding application takes precedence
        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            eprintln!("Global tracing subscriber already set, keeping it");
        }
    });

    Ok(())
}
