//! Favorite routes: toggle and state lookup.
//!
//! Both endpoints are scoped to the caller's `session_token` cookie. The
//! session is only identified here, not authenticated; a request without
//! the cookie is rejected with 401.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use super::state::AppState;
use super::store::StoreError;

pub const SESSION_COOKIE: &str = "session_token";

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Session token taken from the `session_token` cookie.
/// Use as a handler parameter to require a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(pub String);

impl<S> axum::extract::FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(Cookie::value).unwrap_or_default();
        if token.trim().is_empty() {
            return Err(failure(StatusCode::UNAUTHORIZED, "login required"));
        }
        Ok(Self(token.to_owned()))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /favorites/toggle/{document_id}`: flip and return the new state.
pub async fn toggle(State(state): State<AppState>, session: Session, Path(document_id): Path<String>) -> Response {
    match state.store.toggle(&session.0, &document_id).await {
        Ok(favorited) => {
            tracing::info!(%document_id, favorited, "favorite toggled");
            let msg = if favorited { "favorited" } else { "unfavorited" };
            Json(json!({ "ok": true, "favorited": favorited, "msg": msg })).into_response()
        }
        Err(e) => {
            tracing::error!(%document_id, error = %e, "favorite toggle failed");
            failure(store_error_to_status(&e), &e.to_string())
        }
    }
}

/// `GET /favorites/{document_id}`: current state, for initial rendering.
pub async fn favorite_state(State(state): State<AppState>, session: Session, Path(document_id): Path<String>) -> Response {
    match state.store.is_favorited(&session.0, &document_id).await {
        Ok(favorited) => Json(json!({ "favorited": favorited })).into_response(),
        Err(e) => {
            tracing::error!(%document_id, error = %e, "favorite lookup failed");
            failure(store_error_to_status(&e), &e.to_string())
        }
    }
}

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::UnknownDocument(_) => StatusCode::NOT_FOUND,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "ok": false, "msg": msg }))).into_response()
}

#[cfg(test)]
#[path = "favorites_test.rs"]
mod tests;
