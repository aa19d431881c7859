//! Stderr logging for the binary. Verbosity follows the `-l` scale:
//! 0 none, 1 error, 2 warning, 3 info, 4 trace. `RUST_LOG` wins when set.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const MAX_LOG_LEVEL: u8 = 4;

pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(level: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("").add_directive(level_filter(level).into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
