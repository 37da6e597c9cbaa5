use super::*;
use crate::server::state::test_helpers::{BrokenStore, test_app_state};
use axum::extract::FromRequestParts;
use axum::http::Request;
use std::sync::Arc;

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn session(token: &str) -> Session {
    Session(token.to_owned())
}

async fn extract_session(cookie: Option<&str>) -> Result<Session, Response> {
    let mut builder = Request::builder().uri("/favorites/toggle/1");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let (mut parts, ()) = builder.body(()).unwrap().into_parts();
    Session::from_request_parts(&mut parts, &()).await
}

// =============================================================================
// Session extractor
// =============================================================================

#[tokio::test]
async fn session_read_from_cookie() {
    let extracted = extract_session(Some("theme=dark; session_token=abc123")).await.unwrap();
    assert_eq!(extracted, session("abc123"));
}

#[tokio::test]
async fn missing_session_cookie_is_unauthorized() {
    let rejection = extract_session(None).await.unwrap_err();
    assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(rejection).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["msg"], "login required");
}

#[tokio::test]
async fn blank_session_cookie_is_unauthorized() {
    let rejection = extract_session(Some("session_token=")).await.unwrap_err();
    assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// toggle
// =============================================================================

#[tokio::test]
async fn toggle_returns_new_state_envelope() {
    let state = test_app_state();

    let first = toggle(State(state.clone()), session("s"), Path("42".into())).await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["favorited"], true);
    assert_eq!(body["msg"], "favorited");

    let second = toggle(State(state), session("s"), Path("42".into())).await;
    let body = body_json(second).await;
    assert_eq!(body["favorited"], false);
    assert_eq!(body["msg"], "unfavorited");
}

#[tokio::test]
async fn toggle_unknown_document_is_not_found() {
    let state = AppState::in_memory(&["1".to_owned()]);

    let response = toggle(State(state), session("s"), Path("2".into())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert!(body.get("favorited").is_none());
}

#[tokio::test]
async fn toggle_store_failure_is_server_error() {
    let state = AppState::new(Arc::new(BrokenStore));

    let response = toggle(State(state), session("s"), Path("1".into())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "store unavailable: connection reset");
}

// =============================================================================
// favorite_state
// =============================================================================

#[tokio::test]
async fn favorite_state_reflects_toggles_per_session() {
    let state = test_app_state();
    let _ = toggle(State(state.clone()), session("alice"), Path("7".into())).await;

    let alice = favorite_state(State(state.clone()), session("alice"), Path("7".into())).await;
    assert_eq!(body_json(alice).await["favorited"], true);

    let bob = favorite_state(State(state), session("bob"), Path("7".into())).await;
    assert_eq!(body_json(bob).await["favorited"], false);
}

#[tokio::test]
async fn favorite_state_store_failure_is_server_error() {
    let state = AppState::new(Arc::new(BrokenStore));
    let response = favorite_state(State(state), session("s"), Path("1".into())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn store_error_to_status_maps_variants() {
    assert_eq!(store_error_to_status(&StoreError::UnknownDocument("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(store_error_to_status(&StoreError::Backend("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
}
