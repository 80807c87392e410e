use std::sync::Arc;

use serde_json::json;

use super::test_helpers::StubLlm;
use super::*;
use crate::catalog::{TaskEntry, task_catalog};

fn pitch_only() -> Vec<TaskEntry> {
    vec![TaskEntry::new("pitch", "Elevator Pitch", "Write a 30-word elevator pitch.")]
}

fn router_with(kind: ProviderKind, stub: Arc<StubLlm>) -> ProviderRouter {
    ProviderRouter::new(4096).with_backend(kind, stub)
}

// =============================================================================
// dispatch
// =============================================================================

#[tokio::test]
async fn unknown_provider_key_yields_unsupported_envelope() {
    let stub = Arc::new(StubLlm::text("{}"));
    let router = router_with(ProviderKind::Gemini, stub.clone());
    let prompt = ComposedPrompt { system: "S".into(), user: "U".into() };

    assert_eq!(
        router.dispatch("mistral", &prompt).await,
        r#"{"error":"Unsupported LLM provider: mistral"}"#
    );
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn provider_keys_are_case_sensitive() {
    let router = ProviderRouter::new(4096);
    let prompt = ComposedPrompt { system: "S".into(), user: "U".into() };
    assert_eq!(
        router.dispatch("Gemini", &prompt).await,
        r#"{"error":"Unsupported LLM provider: Gemini"}"#
    );
}

#[tokio::test]
async fn dispatch_routes_to_named_provider_only() {
    let gemini = Arc::new(StubLlm::text(r#"{"who":"gemini"}"#));
    let claude = Arc::new(StubLlm::text(r#"{"who":"claude"}"#));
    let router = ProviderRouter::new(4096)
        .with_backend(ProviderKind::Gemini, gemini.clone())
        .with_backend(ProviderKind::Claude, claude.clone());
    let prompt = ComposedPrompt { system: "S".into(), user: "U".into() };

    assert_eq!(router.dispatch("claude", &prompt).await, r#"{"who":"claude"}"#);
    assert_eq!(claude.calls(), 1);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn every_backend_shares_the_router_token_ceiling() {
    let gemini = Arc::new(StubLlm::text("{}"));
    let openai = Arc::new(StubLlm::text("{}"));
    let router = ProviderRouter::new(1500)
        .with_backend(ProviderKind::Gemini, gemini.clone())
        .with_backend(ProviderKind::OpenAi, openai.clone());
    let prompt = ComposedPrompt { system: "S".into(), user: "U".into() };

    router.dispatch("gemini", &prompt).await;
    router.dispatch("openai", &prompt).await;

    assert_eq!(router.max_tokens(), 1500);
    assert_eq!(gemini.last_max_tokens(), 1500);
    assert_eq!(openai.last_max_tokens(), 1500);
}

#[tokio::test]
async fn dispatch_to_unconfigured_provider_never_calls_out() {
    let router = ProviderRouter::new(4096);
    let prompt = ComposedPrompt { system: "S".into(), user: "U".into() };
    assert_eq!(
        router.dispatch("openai", &prompt).await,
        r#"{"error":"OpenAI API key is not configured"}"#
    );
}

// =============================================================================
// refine: prompt in, caller-visible result out
// =============================================================================

#[tokio::test]
async fn refine_success_reaches_caller_as_object() {
    let stub = Arc::new(StubLlm::text(r#"{"pitch":"Never forget to water again."}"#));
    let router = router_with(ProviderKind::Gemini, stub.clone());

    let raw = router.refine("gemini", &["Build a plant-watering app"], &["pitch"], &pitch_only()).await;
    let result = Refinement::parse(&raw);

    assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "pitch": "Never forget to water again." }));
    let sent = stub.last_prompt().unwrap();
    assert!(sent.user.contains("- Build a plant-watering app"));
    assert!(sent.user.ends_with(r#"["pitch"]"#));
}

#[tokio::test]
async fn refine_backend_failure_reaches_caller_as_error_message() {
    for kind in ProviderKind::ALL {
        let router = router_with(kind, Arc::new(StubLlm::network_error()));

        let raw = router.refine(kind.key(), &["Build a plant-watering app"], &["pitch"], &pitch_only()).await;
        let result = Refinement::parse(&raw);

        let Refinement::Failed(envelope) = result else {
            panic!("expected failure envelope for {kind:?}");
        };
        assert_eq!(
            envelope.error,
            format!(
                "Could not get a response from the {} API. Please check the server console.",
                kind.display_name()
            )
        );
        assert_eq!(envelope.raw_response, None);
    }
}

#[tokio::test]
async fn refine_non_json_reply_is_substituted_by_caller() {
    let router = router_with(ProviderKind::OpenAi, Arc::new(StubLlm::text("Sorry, I can't help with that.")));

    let raw = router.refine("openai", &["x"], &["pitch"], &pitch_only()).await;
    assert_eq!(raw, "Sorry, I can't help with that.");

    assert_eq!(
        serde_json::to_value(Refinement::parse(&raw)).unwrap(),
        json!({
            "error": "Failed to parse the response from the AI.",
            "rawResponse": "Sorry, I can't help with that."
        })
    );
}

#[tokio::test]
async fn refine_against_full_catalog_uses_default_selection() {
    let stub = Arc::new(StubLlm::text("{}"));
    let router = router_with(ProviderKind::Claude, stub.clone());

    router
        .refine("claude", &["a", "b"], &crate::catalog::DEFAULT_SELECTION, task_catalog())
        .await;

    let sent = stub.last_prompt().unwrap();
    assert!(sent.user.ends_with(r#"["pitch", "category", "mvp", "next_steps"]"#));
}

// =============================================================================
// providers / from_config
// =============================================================================

#[test]
fn providers_lists_all_in_picker_order() {
    let router = router_with(ProviderKind::OpenAi, Arc::new(StubLlm::text("{}")));
    let providers = router.providers();
    let ids: Vec<_> = providers.iter().map(|p| p.id).collect();
    assert_eq!(ids, ["gemini", "openai", "claude"]);
    assert_eq!(providers.iter().map(|p| p.configured).collect::<Vec<_>>(), [false, true, false]);
    assert_eq!(providers[2].label, "Anthropic Claude");
}

#[test]
fn from_config_configures_only_keyed_providers() {
    let mut config = LlmConfig::default();
    config.claude.api_key = Some("sk-ant-test".into());

    let router = ProviderRouter::from_config(&config).unwrap();

    assert!(router.adapter(ProviderKind::Claude).is_configured());
    assert!(!router.adapter(ProviderKind::Gemini).is_configured());
    assert!(!router.adapter(ProviderKind::OpenAi).is_configured());
    assert_eq!(router.adapter(ProviderKind::Claude).kind(), ProviderKind::Claude);
}

#[test]
fn unsupported_provider_json_escapes_key() {
    assert_eq!(unsupported_provider_json("a\"b"), r#"{"error":"Unsupported LLM provider: a\"b"}"#);
}
