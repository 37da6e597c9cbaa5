//! Toggle server: reference implementation of the favorites endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller talks to exactly one mutation endpoint and, at render
//! time, one state lookup. This module binds both on an Axum router over a
//! pluggable [`store::FavoriteStore`], plus a health check.

pub mod favorites;
pub mod state;
pub mod store;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the router. `trace_http` adds a per-request tracing layer.
pub fn app(state: AppState, trace_http: bool) -> Router {
    let router = Router::new()
        .route("/favorites/toggle/{document_id}", post(favorites::toggle))
        .route("/favorites/{document_id}", get(favorites::favorite_state))
        .route("/healthz", get(healthz))
        .with_state(state);

    if trace_http { router.layer(TraceLayer::new_for_http()) } else { router }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
