#![forbid(unsafe_code)]

//! Production log setup.
//!
//! Library code logs through `tracing` behind each crate's `tracing` feature.
//! Binaries that want JSON lines on stderr enable `tracing-json` and call
//! [`init_json_logging`] once at startup.
//!
//! The filter is read from `TAPEDECK_LOG`, then `RUST_LOG`, and defaults to
//! `info`. Both use the usual `EnvFilter` directive syntax, e.g.
//! `TAPEDECK_LOG=tapedeck_overlay=debug`.

/// Environment variable consulted first for the log filter.
pub const LOG_ENV: &str = "TAPEDECK_LOG";

/// Filter directive used when neither variable is set.
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive from the two candidate variables.
#[must_use]
pub fn filter_directive(tapedeck_log: Option<&str>, rust_log: Option<&str>) -> String {
    tapedeck_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| rust_log.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install a global JSON subscriber writing to stderr.
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let tapedeck_log = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(tapedeck_log.as_deref(), rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tapedeck_log_takes_precedence() {
        assert_eq!(
            filter_directive(Some("tapedeck_overlay=debug"), Some("warn")),
            "tapedeck_overlay=debug"
        );
    }

    #[test]
    fn falls_back_to_rust_log_then_default() {
        assert_eq!(filter_directive(None, Some("warn")), "warn");
        assert_eq!(filter_directive(Some("  "), Some("trace")), "trace");
        assert_eq!(filter_directive(None, None), DEFAULT_FILTER);
    }
}
