use std::time::Duration;

use crate::poll::PollConfig;

/// Default timeout for upload, job creation and status queries.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default delay between two job status queries.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// HTTP tuning for the art service client, loaded from environment variables.
///
/// All fields have defaults matching the service's expected cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout for the JSON and upload endpoints. Output
    /// downloads are not bounded by it.
    pub request_timeout: Duration,
    pub poll: PollConfig,
}

/// A variable was set but could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be a valid {expected}, got '{value}'")]
pub struct ClientConfigError {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `POLL_INTERVAL_MS`     | `3000`    |
    /// | `POLL_TIMEOUT_SECS`    | unset (wait until the job finishes) |
    pub fn from_env() -> Result<Self, ClientConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let request_timeout_secs = parse_u64(&lookup, "REQUEST_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let poll_interval_ms =
            parse_u64(&lookup, "POLL_INTERVAL_MS")?.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        let poll_timeout_secs = parse_u64(&lookup, "POLL_TIMEOUT_SECS")?;

        Ok(Self {
            request_timeout: Duration::from_secs(request_timeout_secs),
            poll: PollConfig {
                interval: Duration::from_millis(poll_interval_ms),
                timeout: poll_timeout_secs.map(Duration::from_secs),
            },
        })
    }
}

fn parse_u64<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ClientConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| ClientConfigError {
        name,
        expected: "u64",
        value: raw.clone(),
    })
}
