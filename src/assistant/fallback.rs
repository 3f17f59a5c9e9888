//! Fallback policy — every assistant reply flows through here.
//!
//! DESIGN
//! ======
//! `resolve` is infallible. Three outcomes:
//! - no credential: wait the simulated delay, answer [`SIMULATION_NOTICE`],
//!   never touch the backend;
//! - backend answers: its text (or [`super::EMPTY_REPLY`]);
//! - backend fails or times out: log it, answer [`BACKEND_APOLOGY`].
//!
//! TRADE-OFFS
//! ==========
//! Each attempt gets its own deadline. Only transport errors and 429/5xx are
//! retried; a timeout is not, so the worst-case wait stays close to
//! `reply_timeout * (1 + max_retries)` only when the backend is erroring fast.

use std::time::Duration;

use tracing::{debug, error, warn};

use super::log::ChatTurn;
use super::session::SessionClient;
use super::{AssistantConfig, BACKEND_APOLOGY, SIMULATION_NOTICE};
use crate::error::ErrorCode;
use crate::llm::types::LlmError;

pub struct FallbackPolicy {
    /// `None` when no usable credential was configured at startup.
    session: Option<SessionClient>,
    simulated_delay: Duration,
    reply_timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl FallbackPolicy {
    #[must_use]
    pub fn new(session: Option<SessionClient>, config: &AssistantConfig) -> Self {
        Self {
            session,
            simulated_delay: config.simulated_delay,
            reply_timeout: config.reply_timeout,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
        }
    }

    /// `true` when replies are simulated because no credential is configured.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.session.is_none()
    }

    /// Produce the assistant's reply to `new_message`. Never fails and never
    /// returns an empty string.
    pub async fn resolve(&self, history: &[ChatTurn], new_message: &str) -> String {
        let Some(session) = &self.session else {
            debug!(delay_ms = self.simulated_delay.as_millis(), "assistant: simulation mode reply");
            tokio::time::sleep(self.simulated_delay).await;
            return SIMULATION_NOTICE.to_string();
        };

        match self.call_with_retry(session, history, new_message).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, code = e.error_code(), "assistant: backend failed, replying with apology");
                BACKEND_APOLOGY.to_string()
            }
        }
    }

    async fn call_with_retry(
        &self,
        session: &SessionClient,
        history: &[ChatTurn],
        new_message: &str,
    ) -> Result<String, LlmError> {
        let mut attempt: u32 = 0;
        loop {
            let result = match tokio::time::timeout(self.reply_timeout, session.next_reply(history, new_message)).await
            {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout { secs: self.reply_timeout.as_secs() }),
            };

            match result {
                Err(e) if e.retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(error = %e, code = e.error_code(), attempt, "assistant: retrying backend call");
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
