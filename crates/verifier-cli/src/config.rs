//! CLI configuration via environment variables
//!
//! Optional defaults that command-line flags override.

use std::env;
use std::time::Duration;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Default to JSON report output (VERIFY_JSON=1)
    pub default_json: bool,
    /// Disable colored output (VERIFY_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Default per-test timeout in seconds (VERIFY_TIMEOUT=2.5)
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("VERIFY_JSON")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            no_color: env::var("VERIFY_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            timeout: env::var("VERIFY_TIMEOUT").ok().and_then(|v| match parse_seconds(&v) {
                Ok(timeout) => Some(timeout),
                Err(e) => {
                    tracing::warn!(value = %v, "ignoring VERIFY_TIMEOUT: {}", e);
                    None
                }
            }),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Parse a positive number of seconds, e.g. `1`, `0.5`, `2.25`
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got {}", value));
    }

    Ok(Duration::from_secs_f64(seconds))
}
