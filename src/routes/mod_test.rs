use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::llm::test_helpers::StubLlm;
use crate::llm::{ProviderKind, ProviderRouter};
use crate::services::idea::IdeaError;
use crate::services::refine::RefineError;
use crate::state::test_helpers;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let (status, _) = send(app(test_helpers::test_app_state()), get_req("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_lists_all_tasks_in_order() {
    let (status, body) = send(app(test_helpers::test_app_state()), get_req("/api/catalog")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 20);
    assert_eq!(entries[0]["id"], "structure");
    assert_eq!(entries[14], json!({ "id": "pitch", "label": "Elevator Pitch", "prompt": "Write a 30-word elevator pitch." }));
}

#[tokio::test]
async fn providers_report_configured_flags() {
    let router = ProviderRouter::new(4096).with_backend(ProviderKind::Claude, Arc::new(StubLlm::text("{}")));
    let state = test_helpers::test_app_state_with_router(router);

    let (status, body) = send(app(state), get_req("/api/providers")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "gemini", "label": "Google Gemini", "configured": false },
            { "id": "openai", "label": "OpenAI GPT", "configured": false },
            { "id": "claude", "label": "Anthropic Claude", "configured": true }
        ])
    );
}

#[tokio::test]
async fn idea_routes_require_session_cookie() {
    let id = uuid::Uuid::new_v4();
    let requests = [
        get_req("/api/ideas"),
        get_req("/api/auth/me"),
        get_req(&format!("/api/ideas/{id}")),
        post_json("/api/ideas", &json!({ "title": "t" })),
        post_json(&format!("/api/ideas/{id}/phrases"), &json!({ "phrase": "p" })),
        post_json(&format!("/api/ideas/{id}/refine"), &json!({ "provider": "gemini", "task_ids": ["pitch"] })),
    ];
    for request in requests {
        let uri = request.uri().clone();
        let (status, _) = send(app(test_helpers::test_app_state()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn empty_session_cookie_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/ideas")
        .header(header::COOKIE, "session_token=")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(test_helpers::test_app_state()), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dev_session_hidden_without_bypass() {
    // DEV_AUTH_BYPASS is never set by the test suite.
    let (status, _) = send(app(test_helpers::test_app_state()), post_json("/api/dev/session", &json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// error → status mapping
// =============================================================================

#[test]
fn refine_errors_map_to_statuses() {
    use super::refine::refine_error_to_status;

    assert_eq!(refine_error_to_status(RefineError::NoPhrases), StatusCode::BAD_REQUEST);
    assert_eq!(refine_error_to_status(RefineError::NoTasks), StatusCode::BAD_REQUEST);
    assert_eq!(
        refine_error_to_status(RefineError::Idea(IdeaError::NotFound(uuid::Uuid::nil()))),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        refine_error_to_status(RefineError::Idea(IdeaError::Database(sqlx::Error::PoolTimedOut))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn idea_errors_map_to_statuses() {
    use super::ideas::idea_error_to_status;

    assert_eq!(idea_error_to_status(IdeaError::Invalid("blank")), StatusCode::BAD_REQUEST);
    assert_eq!(idea_error_to_status(IdeaError::NotFound(uuid::Uuid::nil())), StatusCode::NOT_FOUND);
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn refine_route_returns_envelope_with_200() {
    let pool = crate::db::test_helpers::integration_pool().await;
    let (user, token) = crate::services::session::create_dev_session(&pool).await.unwrap();
    let idea = crate::services::idea::create_idea(&pool, user.id, "Plants").await.unwrap();
    crate::services::idea::append_phrase(&pool, user.id, idea.id, "Build a plant-watering app")
        .await
        .unwrap();

    let router = ProviderRouter::new(4096).with_backend(ProviderKind::Gemini, Arc::new(StubLlm::network_error()));
    let state = crate::state::AppState::new(pool, router);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/ideas/{}/refine", idea.id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("session_token={token}"))
        .body(Body::from(json!({ "provider": "gemini", "task_ids": ["pitch"] }).to_string()))
        .unwrap();
    let (status, body) = send(app(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "Could not get a response from the Gemini API. Please check the server console." })
    );
}
