use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Subscriber settings shared by the binaries.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { level: "warn".to_string(), json: false }
    }
}

/// Installs the global subscriber. Everything goes to stderr; stdout is
/// reserved for program output.
pub fn init_logging(options: &LogOptions) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));
    let registry = tracing_subscriber::registry().with(filter);

    if options.json {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .with_ansi(false);
        registry.with(layer).init();
    } else {
        let layer = fmt::layer().with_target(false).with_writer(io::stderr);
        registry.with(layer).init();
    }
}
