//! Widget controller — visibility, submission and single-flight guarding.
//!
//! DESIGN
//! ======
//! `Closed → OpenIdle` on open, back to `Closed` on close. Submitting
//! non-empty input while `OpenIdle` appends the user turn immediately,
//! flips to `OpenPending` and spawns the reply task; the task appends the
//! assistant turn and returns to `OpenIdle`. Submits while pending are
//! rejected, so at most one backend call is ever in flight.
//!
//! Closing does not cancel the in-flight reply; it still lands in the log
//! and is visible on reopen. A reset aborts the in-flight reply task and
//! bumps `generation`; a reply that settles under an older generation is
//! dropped. Every reply task holds the single `flight` permit around its
//! backend call, so a submit right after a reset waits for the aborted call
//! to be torn down before its own call starts.
//!
//! A panic inside the reply task is caught and settles the turn with
//! [`BACKEND_APOLOGY`], so the widget never stays pending.
//!
//! Every mutation publishes a fresh [`WidgetView`] on a `watch` channel.
//! `scroll_seq` increases on every log change and tells the view to scroll
//! to the latest turn.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

use super::{BACKEND_APOLOGY, GREETING};
use super::fallback::FallbackPolicy;
use super::log::{ChatTurn, MessageLog};
use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPhase {
    Closed,
    OpenIdle,
    OpenPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
}

/// Identity of the signed-in user, supplied by the host for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("message is empty")]
    EmptySubmission,
    #[error("a reply is already pending")]
    ConcurrentSubmission,
    #[error("assistant widget is closed")]
    WidgetClosed,
}

impl ErrorCode for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySubmission => "E_EMPTY_SUBMISSION",
            Self::ConcurrentSubmission => "E_CONCURRENT_SUBMISSION",
            Self::WidgetClosed => "E_WIDGET_CLOSED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ConcurrentSubmission)
    }
}

/// Render-ready projection of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetView {
    pub phase: WidgetPhase,
    pub is_open: bool,
    pub is_pending: bool,
    pub turns: Vec<ChatTurn>,
    pub scroll_seq: u64,
    pub simulated: bool,
    pub user: Option<HostUser>,
}

// =============================================================================
// CONVERSATION STATE
// =============================================================================

/// Everything the widget owns: the log plus transient UI flags.
#[derive(Debug)]
pub struct ConversationState {
    pub log: MessageLog,
    pub is_open: bool,
    pub is_pending: bool,
    pub user: Option<HostUser>,
    scroll_seq: u64,
    generation: u64,
    reply_task: Option<AbortHandle>,
}

impl ConversationState {
    /// Closed widget with the seeded greeting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: MessageLog::seeded(ChatTurn::assistant(GREETING)),
            is_open: false,
            is_pending: false,
            user: None,
            scroll_seq: 0,
            generation: 0,
            reply_task: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> WidgetPhase {
        match (self.is_open, self.is_pending) {
            (false, _) => WidgetPhase::Closed,
            (true, false) => WidgetPhase::OpenIdle,
            (true, true) => WidgetPhase::OpenPending,
        }
    }

    fn append(&mut self, turn: ChatTurn) {
        self.log.append(turn);
        self.scroll_seq += 1;
    }

    /// Back to a closed widget holding only the greeting. Any in-flight
    /// reply task is aborted.
    pub fn reset(&mut self) {
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
        self.log.reset_to(ChatTurn::assistant(GREETING));
        self.is_open = false;
        self.is_pending = false;
        self.user = None;
        self.scroll_seq += 1;
        self.generation += 1;
    }

    #[must_use]
    pub fn view(&self, simulated: bool) -> WidgetView {
        WidgetView {
            phase: self.phase(),
            is_open: self.is_open,
            is_pending: self.is_pending,
            turns: self.log.all(),
            scroll_seq: self.scroll_seq,
            simulated,
            user: self.user.clone(),
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Handle to the reply task spawned by an accepted submit.
///
/// Dropping it does not cancel the reply.
pub struct PendingReply {
    view: WidgetView,
    handle: JoinHandle<()>,
}

impl PendingReply {
    /// View published right after the user turn was appended.
    #[must_use]
    pub fn view(&self) -> &WidgetView {
        &self.view
    }

    /// Wait until the assistant turn has been committed, discarded, or the
    /// task was aborted by a reset.
    pub async fn settled(self) {
        match self.handle.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => debug!("assistant: reply task aborted by reset"),
            Err(e) => warn!(error = %e, "assistant: reply task did not complete"),
        }
    }
}

/// Owns the process-wide conversation. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WidgetController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<ConversationState>,
    policy: FallbackPolicy,
    views: watch::Sender<WidgetView>,
    /// One permit: held by a reply task for the whole backend call.
    flight: Arc<Semaphore>,
}

impl WidgetController {
    #[must_use]
    pub fn new(policy: FallbackPolicy, state: ConversationState) -> Self {
        let (views, _) = watch::channel(state.view(policy.is_simulated()));
        Self {
            inner: Arc::new(Inner { state: Mutex::new(state), policy, views, flight: Arc::new(Semaphore::new(1)) }),
        }
    }

    #[must_use]
    pub fn view(&self) -> WidgetView {
        self.inner.views.borrow().clone()
    }

    /// Receive a new view after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WidgetView> {
        self.inner.views.subscribe()
    }

    pub fn open(&self) -> WidgetView {
        self.mutate(|s| s.is_open = true)
    }

    pub fn close(&self) -> WidgetView {
        self.mutate(|s| s.is_open = false)
    }

    pub fn toggle(&self) -> WidgetView {
        self.mutate(|s| s.is_open = !s.is_open)
    }

    pub fn identify(&self, user: HostUser) -> WidgetView {
        self.mutate(|s| s.user = Some(user))
    }

    /// Logout-equivalent: greeting only, closed, any in-flight reply dropped.
    pub fn reset(&self) -> WidgetView {
        info!("assistant: session reset");
        self.mutate(ConversationState::reset)
    }

    /// Submit user input. On success the user turn is already in the log and
    /// the reply is being resolved in the background.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::EmptySubmission`] for blank input;
    /// - [`SubmitError::WidgetClosed`] when the widget is not open;
    /// - [`SubmitError::ConcurrentSubmission`] while a reply is pending.
    ///
    /// A rejected submit changes nothing.
    pub fn submit(&self, input: &str) -> Result<PendingReply, SubmitError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptySubmission);
        }

        let mut state = self.lock();
        if !state.is_open {
            return Err(SubmitError::WidgetClosed);
        }
        if state.is_pending {
            return Err(SubmitError::ConcurrentSubmission);
        }
        let history = state.log.all();
        state.append(ChatTurn::user(text));
        state.is_pending = true;
        let view = self.publish(&state);
        let generation = state.generation;

        info!(len = text.len(), context_turns = history.len(), "assistant: message submitted");

        // Spawned under the lock so a concurrent reset always sees the handle.
        let controller = self.clone();
        let message = text.to_string();
        let handle = tokio::spawn(async move {
            let reply = controller.reply_to(&history, &message).await;
            controller.settle(generation, reply);
        });
        state.reply_task = Some(handle.abort_handle());
        drop(state);

        Ok(PendingReply { view, handle })
    }

    async fn reply_to(&self, history: &[ChatTurn], message: &str) -> String {
        let _permit = match self.inner.flight.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!(error = %e, "assistant: reply slot unavailable");
                return BACKEND_APOLOGY.to_string();
            }
        };

        match AssertUnwindSafe(self.inner.policy.resolve(history, message))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(_) => {
                error!("assistant: reply task panicked, replying with apology");
                BACKEND_APOLOGY.to_string()
            }
        }
    }

    fn settle(&self, generation: u64, reply: String) {
        let mut state = self.lock();
        if state.generation != generation {
            info!("assistant: discarding reply from a reset session");
            return;
        }
        state.append(ChatTurn::assistant(reply));
        state.is_pending = false;
        state.reply_task = None;
        self.publish(&state);
        info!(turns = state.log.len(), open = state.is_open, "assistant: reply committed");
    }

    fn mutate(&self, f: impl FnOnce(&mut ConversationState)) -> WidgetView {
        let mut state = self.lock();
        f(&mut *state);
        self.publish(&state)
    }

    // Called with the state lock held so published views stay in mutation order.
    fn publish(&self, state: &ConversationState) -> WidgetView {
        let view = state.view(self.inner.policy.is_simulated());
        self.inner.views.send_replace(view.clone());
        view
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
