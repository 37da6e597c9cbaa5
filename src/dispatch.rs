//! Event delegation: one listener for every toggle control on a page.
//!
//! DESIGN
//! ======
//! A single [`DelegatedListener`] sits at a stable ancestor and receives
//! every click. It asks its [`ControlMatcher`] whether the event targets a
//! toggle control (walking from the target outwards) and, if so, runs the
//! toggle as its own task. Clicks elsewhere are ignored.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::api::{ApiError, FavoriteApi};
use crate::control::{ControlRef, ToggleControl};
use crate::controller::{FavoriteToggleController, ToggleOutcome};

/// A click, described by the element ids from the target up to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub path: Vec<String>,
}

impl ClickEvent {
    #[must_use]
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { path: path.into_iter().map(Into::into).collect() }
    }
}

/// Resolves the control an event is aimed at, if any.
pub trait ControlMatcher: Send + Sync {
    fn matches_control(&self, event: &ClickEvent) -> Option<ControlRef>;
}

// =============================================================================
// CONTROL REGISTRY
// =============================================================================

/// Element id → control, populated when the page is rendered.
#[derive(Default)]
pub struct ControlRegistry {
    controls: HashMap<String, ControlRef>,
}

impl ControlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control under its element id, replacing any previous one.
    pub fn register(&mut self, element_id: impl Into<String>, control: ToggleControl) -> ControlRef {
        let control = control.into_ref();
        self.controls.insert(element_id.into(), control.clone());
        control
    }

    /// Register a control from its rendered attributes and text content.
    pub fn hydrate(
        &mut self,
        element_id: impl Into<String>,
        attributes: &HashMap<String, String>,
        text: &str,
    ) -> ControlRef {
        self.register(element_id, ToggleControl::from_attributes(attributes, text))
    }

    /// Register a control whose initial state is fetched from the server.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the state lookup fails; nothing is
    /// registered in that case.
    pub async fn hydrate_from_server(
        &mut self,
        api: &dyn FavoriteApi,
        element_id: impl Into<String>,
        document_id: &str,
    ) -> Result<ControlRef, ApiError> {
        let favorited = api.favorite_state(document_id).await?.unwrap_or(false);
        Ok(self.register(element_id, ToggleControl::new(document_id, favorited)))
    }

    #[must_use]
    pub fn get(&self, element_id: &str) -> Option<ControlRef> {
        self.controls.get(element_id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

impl ControlMatcher for ControlRegistry {
    fn matches_control(&self, event: &ClickEvent) -> Option<ControlRef> {
        event.path.iter().find_map(|id| self.get(id))
    }
}

// =============================================================================
// DELEGATED LISTENER
// =============================================================================

pub struct DelegatedListener<M> {
    matcher: M,
    controller: FavoriteToggleController,
}

impl<M: ControlMatcher> DelegatedListener<M> {
    #[must_use]
    pub fn new(matcher: M, controller: FavoriteToggleController) -> Self {
        Self { matcher, controller }
    }

    #[must_use]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Handle a click. Returns the spawned toggle task when the event hit a
    /// control, `None` otherwise. Must be called inside a tokio runtime.
    pub fn on_click(&self, event: &ClickEvent) -> Option<JoinHandle<ToggleOutcome>> {
        let control = self.matcher.matches_control(event)?;
        let controller = self.controller.clone();
        Some(tokio::spawn(async move { controller.toggle(&control).await }))
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
