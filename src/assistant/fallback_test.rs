use super::*;
use std::sync::Arc;

use crate::assistant::EMPTY_REPLY;
use crate::state::test_helpers::{ScriptedLlm, fast_config, text_response};

fn policy_with(llm: Arc<ScriptedLlm>, config: &AssistantConfig) -> FallbackPolicy {
    FallbackPolicy::new(Some(SessionClient::new(llm, config)), config)
}

// =========================================================================
// Simulation mode
// =========================================================================

#[tokio::test(start_paused = true)]
async fn missing_credential_returns_notice_after_delay() {
    let config = AssistantConfig { simulated_delay: Duration::from_millis(1000), ..fast_config() };
    let policy = FallbackPolicy::new(None, &config);
    assert!(policy.is_simulated());

    let started = tokio::time::Instant::now();
    let reply = policy.resolve(&[], "Bonjour").await;

    assert_eq!(reply, SIMULATION_NOTICE);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert!(started.elapsed() < Duration::from_millis(1100));
}

#[tokio::test]
async fn configured_policy_is_not_simulated_and_uses_backend() {
    let llm = Arc::new(ScriptedLlm::replying(&["Voici deux cardiologues à Dakar..."]));
    let policy = policy_with(llm.clone(), &fast_config());

    assert!(!policy.is_simulated());
    assert_eq!(policy.resolve(&[], "Je cherche un cardiologue").await, "Voici deux cardiologues à Dakar...");
    assert_eq!(llm.call_count(), 1);
}

// =========================================================================
// Backend failures
// =========================================================================

#[tokio::test]
async fn non_retryable_error_yields_apology_without_retry() {
    let llm = Arc::new(ScriptedLlm::new(vec![Err(LlmError::ApiResponse { status: 400, body: "bad".into() })]));
    let policy = policy_with(llm.clone(), &fast_config());

    let reply = policy.resolve(&[], "Bonjour").await;

    assert_eq!(reply, BACKEND_APOLOGY);
    assert!(!reply.contains("400"));
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn retryable_error_is_retried_then_succeeds() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Err(LlmError::ApiResponse { status: 503, body: "overloaded".into() }),
        Ok(text_response("Réponse après reprise")),
    ]));
    let policy = policy_with(llm.clone(), &fast_config());

    assert_eq!(policy.resolve(&[], "Bonjour").await, "Réponse après reprise");
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn retries_are_bounded() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Err(LlmError::ApiRequest("connection reset".into())),
        Err(LlmError::ApiRequest("connection reset".into())),
        Err(LlmError::ApiRequest("connection reset".into())),
    ]));
    let config = AssistantConfig { max_retries: 1, ..fast_config() };
    let policy = policy_with(llm.clone(), &config);

    assert_eq!(policy.resolve(&[], "Bonjour").await, BACKEND_APOLOGY);
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out_into_apology() {
    let llm = Arc::new(ScriptedLlm::replying(&["trop tard"]).with_delay(Duration::from_secs(120)));
    let config = AssistantConfig { reply_timeout: Duration::from_secs(30), ..fast_config() };
    let policy = policy_with(llm.clone(), &config);

    let started = tokio::time::Instant::now();
    let reply = policy.resolve(&[], "Bonjour").await;

    assert_eq!(reply, BACKEND_APOLOGY);
    assert_eq!(llm.call_count(), 1);
    assert!(started.elapsed() < Duration::from_secs(31));
}

#[tokio::test]
async fn empty_backend_text_passes_through_as_empty_reply() {
    let llm = Arc::new(ScriptedLlm::replying(&[""]));
    let policy = policy_with(llm, &fast_config());

    assert_eq!(policy.resolve(&[], "Bonjour").await, EMPTY_REPLY);
}
