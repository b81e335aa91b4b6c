// Tracing subscriber setup shared by the server and client binaries

use tracing_subscriber::{fmt, EnvFilter};

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<tracing::Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(format!("Invalid log level: {}", level)),
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `log_level`. Must be called at most once
/// per process.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    // Validate before handing the string to EnvFilter
    parse_log_level(log_level)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let result = if log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| format!("Failed to initialize tracing: {}", e))
}
