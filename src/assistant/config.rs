//! Assistant tuning knobs parsed from environment variables.
//!
//! Unparseable values fall back to the default rather than failing startup.

use std::time::Duration;

pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1000;
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 40;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Artificial latency of simulation-mode replies.
    pub simulated_delay: Duration,
    /// Deadline for a single backend attempt.
    pub reply_timeout: Duration,
    /// Most recent prior turns sent to the backend as context.
    pub history_limit: usize,
    /// Extra attempts for retryable backend errors.
    pub max_retries: u32,
    pub max_tokens: u32,
    /// Base delay between attempts; grows linearly per attempt.
    pub retry_backoff: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            simulated_delay: Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS),
            reply_timeout: Duration::from_secs(DEFAULT_REPLY_TIMEOUT_SECS),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: DEFAULT_MAX_TOKENS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl AssistantConfig {
    /// Build assistant config from environment variables.
    ///
    /// - `ASSISTANT_SIMULATED_DELAY_MS`: default 1000
    /// - `ASSISTANT_REPLY_TIMEOUT_SECS`: default 30
    /// - `ASSISTANT_HISTORY_LIMIT`: default 40
    /// - `ASSISTANT_MAX_RETRIES`: default 1
    /// - `ASSISTANT_MAX_TOKENS`: default 1024
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            simulated_delay: Duration::from_millis(env_parse("ASSISTANT_SIMULATED_DELAY_MS", DEFAULT_SIMULATED_DELAY_MS)),
            reply_timeout: Duration::from_secs(env_parse("ASSISTANT_REPLY_TIMEOUT_SECS", DEFAULT_REPLY_TIMEOUT_SECS)),
            history_limit: env_parse("ASSISTANT_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT),
            max_retries: env_parse("ASSISTANT_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            max_tokens: env_parse("ASSISTANT_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
