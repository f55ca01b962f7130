use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output for terminals.
    Compact,
    /// One JSON object per event, for log collectors in front of the proxy.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Directives used when `RUST_LOG` is unset. Request spans from tower-http
/// only show up in verbose mode or in JSON output.
fn default_directives(format: LogFormat, verbose: bool) -> &'static str {
    match (format, verbose) {
        (_, true) => "courier_ratio=debug,tower_http=debug,info",
        (LogFormat::Json, false) => "courier_ratio=info,tower_http=info",
        (LogFormat::Compact, false) => "courier_ratio=info",
    }
}

/// Installs the global subscriber. Call once, before the first log line.
pub fn init(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(format, verbose)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
