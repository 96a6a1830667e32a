//! Client configuration loaded from environment variables.

use crate::error::ClientError;
use crate::poller::PollPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Polling cadence for Run and Submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub run_interval_ms: u64,
    pub run_max_attempts: u32,
    pub submit_interval_ms: u64,
    /// 0 means poll until the submission settles
    pub submit_max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            run_interval_ms: 1000,
            run_max_attempts: 20,
            submit_interval_ms: 1500,
            submit_max_attempts: 240,
        }
    }
}

impl PollConfig {
    /// Run polls right away, then once per interval, up to the cap.
    pub fn run_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.run_interval_ms),
            max_attempts: Some(self.run_max_attempts),
            delay_first: false,
        }
    }

    /// Submit waits one interval before the first query.
    pub fn submit_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.submit_interval_ms),
            max_attempts: (self.submit_max_attempts > 0).then_some(self.submit_max_attempts),
            delay_first: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root; REST endpoints live under `/api`
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub poll: PollConfig,
    /// Where UI flags persist between invocations
    pub state_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(10),
            poll: PollConfig::default(),
            state_dir: PathBuf::from(".neetcode"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("NEETCODE_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "NEETCODE_API_BASE_URL must be an http(s) URL, got '{}'",
                api_base_url
            )));
        }

        let timeout_secs = parse_or(&get, "NEETCODE_REQUEST_TIMEOUT_SECS", 10u64)?;
        let poll = PollConfig {
            run_interval_ms: parse_or(&get, "NEETCODE_RUN_POLL_INTERVAL_MS", defaults.poll.run_interval_ms)?,
            run_max_attempts: parse_or(&get, "NEETCODE_RUN_MAX_POLLS", defaults.poll.run_max_attempts)?,
            submit_interval_ms: parse_or(
                &get,
                "NEETCODE_SUBMIT_POLL_INTERVAL_MS",
                defaults.poll.submit_interval_ms,
            )?,
            submit_max_attempts: parse_or(&get, "NEETCODE_SUBMIT_MAX_POLLS", defaults.poll.submit_max_attempts)?,
        };
        if poll.run_max_attempts == 0 {
            return Err(ClientError::Config("NEETCODE_RUN_MAX_POLLS must be at least 1".into()));
        }

        Ok(Self {
            api_base_url,
            auth_token: get("NEETCODE_TOKEN").map(|t| t.trim().to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            poll,
            state_dir: get("NEETCODE_STATE_DIR").map(PathBuf::from).unwrap_or(defaults.state_dir),
        })
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, ClientError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
