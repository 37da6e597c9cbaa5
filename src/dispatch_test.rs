use super::*;
use crate::api::ToggleResponse;
use crate::control::{ATTR_DOCUMENT_ID, ATTR_FAVORITED, lock};
use crate::notify::{Level, ToastQueue};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Accepts every toggle with an empty body, so the optimistic value stands.
struct ConfirmingApi {
    calls: AtomicUsize,
    state: Option<bool>,
    fail_state: bool,
}

impl ConfirmingApi {
    fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), state: Some(true), fail_state: false })
    }
}

#[async_trait::async_trait]
impl FavoriteApi for ConfirmingApi {
    async fn toggle(&self, _document_id: &str) -> Result<ToggleResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToggleResponse { status: 200, body: String::new() })
    }

    async fn favorite_state(&self, _document_id: &str) -> Result<Option<bool>, ApiError> {
        if self.fail_state {
            return Err(ApiError::Status(500));
        }
        Ok(self.state)
    }
}

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn make_listener(registry: ControlRegistry, api: Arc<ConfirmingApi>) -> (DelegatedListener<ControlRegistry>, Arc<ToastQueue>) {
    let toasts = Arc::new(ToastQueue::new());
    let controller = FavoriteToggleController::new(api, toasts.clone(), Duration::from_secs(60));
    (DelegatedListener::new(registry, controller), toasts)
}

// =============================================================================
// ControlRegistry
// =============================================================================

#[test]
fn matches_control_on_direct_target() {
    let mut registry = ControlRegistry::new();
    registry.register("fav-1", ToggleControl::new("1", false));

    let hit = registry.matches_control(&ClickEvent::new(["fav-1", "row-1", "body"]));
    assert!(hit.is_some());
}

#[test]
fn matches_control_walks_to_ancestor() {
    let mut registry = ControlRegistry::new();
    let control = registry.register("fav-1", ToggleControl::new("1", false));

    // Click landed on the glyph span inside the button.
    let hit = registry
        .matches_control(&ClickEvent::new(["glyph", "fav-1", "row-1"]))
        .unwrap();
    assert!(Arc::ptr_eq(&hit, &control));
}

#[test]
fn matches_control_first_match_wins() {
    let mut registry = ControlRegistry::new();
    let inner = registry.register("inner", ToggleControl::new("1", false));
    registry.register("outer", ToggleControl::new("2", false));

    let hit = registry
        .matches_control(&ClickEvent::new(["inner", "outer"]))
        .unwrap();
    assert!(Arc::ptr_eq(&hit, &inner));
}

#[test]
fn matches_control_none_for_unrelated_click() {
    let mut registry = ControlRegistry::new();
    registry.register("fav-1", ToggleControl::new("1", false));
    assert!(registry.matches_control(&ClickEvent::new(["title", "row-1"])).is_none());
    assert!(registry.matches_control(&ClickEvent::new(Vec::<String>::new())).is_none());
}

#[test]
fn hydrate_reads_attributes() {
    let mut registry = ControlRegistry::new();
    let control = registry.hydrate("fav-7", &attrs(&[(ATTR_DOCUMENT_ID, "7"), (ATTR_FAVORITED, "1")]), "★");

    assert_eq!(registry.len(), 1);
    assert_eq!(lock(&control).document_id(), Some("7"));
    assert!(lock(&control).is_favorited());
}

#[tokio::test]
async fn hydrate_from_server_uses_server_state() {
    let api = ConfirmingApi::new();
    let mut registry = ControlRegistry::new();

    let control = registry
        .hydrate_from_server(api.as_ref(), "fav-3", "3")
        .await
        .unwrap();

    assert!(lock(&control).is_favorited());
    assert_eq!(lock(&control).stored_flag(), Some(true));
    assert!(registry.get("fav-3").is_some());
}

#[tokio::test]
async fn hydrate_from_server_defaults_to_not_favorited() {
    let api = Arc::new(ConfirmingApi { calls: AtomicUsize::new(0), state: None, fail_state: false });
    let mut registry = ControlRegistry::new();

    let control = registry
        .hydrate_from_server(api.as_ref(), "fav-3", "3")
        .await
        .unwrap();
    assert!(!lock(&control).is_favorited());
}

#[tokio::test]
async fn hydrate_from_server_failure_registers_nothing() {
    let api = Arc::new(ConfirmingApi { calls: AtomicUsize::new(0), state: None, fail_state: true });
    let mut registry = ControlRegistry::new();

    let result = registry.hydrate_from_server(api.as_ref(), "fav-3", "3").await;
    assert!(matches!(result, Err(ApiError::Status(500))));
    assert!(registry.is_empty());
}

// =============================================================================
// DelegatedListener
// =============================================================================

#[tokio::test]
async fn on_click_toggles_matched_control() {
    let api = ConfirmingApi::new();
    let mut registry = ControlRegistry::new();
    let control = registry.register("fav-1", ToggleControl::new("1", false));
    let (listener, toasts) = make_listener(registry, api.clone());

    let handle = listener.on_click(&ClickEvent::new(["fav-1"])).unwrap();
    let outcome = handle.await.unwrap();

    assert_eq!(outcome, ToggleOutcome::Confirmed { favorited: true, authoritative: false });
    assert!(lock(&control).is_favorited());
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    assert_eq!(toasts.active()[0].level, Level::Success);
}

#[tokio::test]
async fn on_click_ignores_unmatched_event() {
    let api = ConfirmingApi::new();
    let (listener, toasts) = make_listener(ControlRegistry::new(), api.clone());

    assert!(listener.on_click(&ClickEvent::new(["nav"])).is_none());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert!(toasts.is_empty());
}

#[tokio::test]
async fn on_click_missing_identifier_notifies() {
    let api = ConfirmingApi::new();
    let mut registry = ControlRegistry::new();
    registry.hydrate("fav-x", &attrs(&[]), "☆");
    let (listener, toasts) = make_listener(registry, api.clone());

    let outcome = listener
        .on_click(&ClickEvent::new(["fav-x"]))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(outcome, ToggleOutcome::MissingIdentifier);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert_eq!(toasts.active()[0].level, Level::Error);
}
