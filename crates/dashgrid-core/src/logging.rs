#![forbid(unsafe_code)]

//! Tracing subscriber bootstrap for hosts and the CLI.
//!
//! Library code only emits `tracing` events; nothing is printed unless the
//! host installs a subscriber. This module offers the one the `dashgrid`
//! binary uses: a `fmt` layer on stderr filtered by `DASHGRID_LOG` (falling
//! back to `RUST_LOG`, then to `warn`).
//!
//! Log targets used across the workspace:
//!
//! | target | emitted by |
//! |---|---|
//! | `dashgrid::solver` | slot search, reflow |
//! | `dashgrid::policy` | collision preview/commit |
//! | `dashgrid::responsive` | breakpoint transitions |
//! | `dashgrid::engine` | session lifecycle, ticks, import/export |
//! | `dashgrid::interaction` | border handle recomputation |
//! | `dashgrid::harness` | CLI trace replay |

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "DASHGRID_LOG";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines, ANSI colored when stderr is a terminal.
    #[default]
    Human,
    /// One JSON object per line. Requires the `subscriber-json` feature;
    /// falls back to [`LogFormat::Human`] without it.
    Json,
}

/// Build the filter from `DASHGRID_LOG`, then `RUST_LOG`, then `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    let dashgrid = std::env::var(LOG_ENV).ok();
    let rust = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(&[dashgrid.as_deref(), rust.as_deref()], default)
}

/// First candidate that is set, non-empty and parses wins; otherwise
/// `default`.
pub fn resolve_filter(candidates: &[Option<&str>], default: &str) -> EnvFilter {
    candidates
        .iter()
        .flatten()
        .filter(|directive| !directive.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Install the global subscriber.
///
/// Returns an error if a global subscriber is already set; callers that may
/// run twice (tests) can ignore it.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    init_with_default(format, "warn")
}

/// Install the global subscriber with an explicit fallback directive.
pub fn init_with_default(format: LogFormat, default: &str) -> Result<(), TryInitError> {
    let filter = env_filter(default);
    match format {
        #[cfg(feature = "subscriber-json")]
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => {
            let use_ansi = std::io::stderr().is_terminal();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_ansi),
                )
                .try_init()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_default() {
        let filter = resolve_filter(&[None, None], "dashgrid=debug");
        assert_eq!(filter.to_string(), "dashgrid=debug");
    }

    #[test]
    fn dashgrid_log_takes_precedence_over_rust_log() {
        let filter = resolve_filter(&[Some("dashgrid::engine=trace"), Some("info")], "warn");
        assert_eq!(filter.to_string(), "dashgrid::engine=trace");
    }

    #[test]
    fn invalid_or_empty_directive_is_skipped() {
        let filter = resolve_filter(&[Some("dashgrid=bogus"), Some("error")], "warn");
        assert_eq!(filter.to_string(), "error");

        let filter = resolve_filter(&[Some("  "), None], "warn");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _ = init(LogFormat::Human);
        assert!(init(LogFormat::Human).is_err());
    }
}
