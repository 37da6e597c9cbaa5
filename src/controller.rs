//! Favorite toggle controller: optimistic flip, server call, reconcile.
//!
//! DESIGN
//! ======
//! Every toggle is a three-phase transaction on one control:
//!
//! 1. snapshot the current flag and apply its negation immediately,
//!    marking the control busy ([`OptimisticToggle::begin`]);
//! 2. send one toggle request through [`FavoriteApi`];
//! 3. commit the authoritative (or optimistic) value, or revert.
//!
//! The guard reverts and clears busy in `Drop` when it was never
//! committed, so a dropped future cannot leave a control disabled or
//! half-flipped. A panicking transport is caught and handled like a
//! transport error.
//!
//! ERROR HANDLING
//! ==============
//! Nothing escapes the controller. Failures roll the control back and turn
//! into an error toast; a success status with an unusable body keeps the
//! optimistic value and is only logged.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, FavoriteApi, HttpFavoriteApi, is_addressable};
use crate::config::ClientConfig;
use crate::control::{ControlRef, lock};
use crate::notify::{Level, Notification, Notifier};

pub const MSG_ADDED: &str = "Added to favorites";
pub const MSG_REMOVED: &str = "Removed from favorites";
pub const MSG_MISSING_ID: &str = "Missing document identifier";
pub const MSG_INVALID_ID: &str = "Invalid document identifier";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    #[error("missing document identifier")]
    MissingIdentifier,
    #[error("network error: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    ServerRejection { status: u16, body: String },
    #[error("response carried no favorite state")]
    MalformedResponse,
}

/// How one toggle attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server accepted the toggle. `authoritative` is false when the body
    /// carried no usable state and the optimistic value was kept.
    Confirmed { favorited: bool, authoritative: bool },
    /// Request failed; the control shows its pre-click value again.
    Reverted { favorited: bool, error: ToggleError },
    /// No document identifier; nothing was sent.
    MissingIdentifier,
    /// Identifier cannot be named in a request path (`.` or `..`);
    /// nothing was sent.
    InvalidIdentifier,
    /// A request for this control is already in flight; trigger ignored.
    Busy,
}

// =============================================================================
// OPTIMISTIC TRANSACTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginError {
    MissingIdentifier,
    InvalidIdentifier,
    Busy,
}

/// Pending optimistic flip of one control.
pub struct OptimisticToggle {
    control: ControlRef,
    document_id: String,
    prev: bool,
    settled: bool,
}

impl OptimisticToggle {
    /// Snapshot the control, show the flipped value and mark it busy.
    ///
    /// # Errors
    ///
    /// Leaves the control untouched and returns [`BeginError::Busy`] while
    /// another toggle is pending, [`BeginError::MissingIdentifier`] if
    /// the control has no document id, or [`BeginError::InvalidIdentifier`]
    /// if the id cannot appear in the request path.
    pub fn begin(control: &ControlRef) -> Result<Self, BeginError> {
        let mut guard = lock(control);
        if guard.is_busy() {
            return Err(BeginError::Busy);
        }
        let Some(document_id) = guard.document_id().map(str::to_owned) else {
            return Err(BeginError::MissingIdentifier);
        };
        if !is_addressable(&document_id) {
            return Err(BeginError::InvalidIdentifier);
        }

        let prev = guard.is_favorited();
        guard.set_favorited(!prev);
        guard.set_busy(true);
        drop(guard);

        Ok(Self { control: Arc::clone(control), document_id, prev, settled: false })
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn prev(&self) -> bool {
        self.prev
    }

    /// The optimistic value currently shown.
    #[must_use]
    pub fn next(&self) -> bool {
        !self.prev
    }

    /// Settle on `favorited` and release the control.
    pub fn commit(mut self, favorited: bool) {
        self.settle(favorited);
    }

    /// Restore the snapshot and release the control.
    pub fn revert(mut self) {
        let prev = self.prev;
        self.settle(prev);
    }

    fn settle(&mut self, favorited: bool) {
        let mut guard = lock(&self.control);
        guard.set_favorited(favorited);
        guard.set_busy(false);
        self.settled = true;
    }
}

impl Drop for OptimisticToggle {
    fn drop(&mut self) {
        if !self.settled {
            let prev = self.prev;
            self.settle(prev);
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Runs the toggle protocol for any number of controls.
#[derive(Clone)]
pub struct FavoriteToggleController {
    api: Arc<dyn FavoriteApi>,
    notifier: Arc<dyn Notifier>,
    toast_ttl: Duration,
}

impl FavoriteToggleController {
    #[must_use]
    pub fn new(api: Arc<dyn FavoriteApi>, notifier: Arc<dyn Notifier>, toast_ttl: Duration) -> Self {
        Self { api, notifier, toast_ttl }
    }

    /// Controller talking HTTP to the server named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let api = HttpFavoriteApi::new(config)?;
        Ok(Self::new(Arc::new(api), notifier, config.toast_ttl))
    }

    /// Toggle the favorite state of the document behind `control`.
    ///
    /// On return the control is idle and shows a definite value.
    pub async fn toggle(&self, control: &ControlRef) -> ToggleOutcome {
        let txn = match OptimisticToggle::begin(control) {
            Ok(txn) => txn,
            Err(BeginError::Busy) => {
                debug!("toggle ignored, control busy");
                return ToggleOutcome::Busy;
            }
            Err(BeginError::MissingIdentifier) => {
                warn!("toggle aborted, control has no document id");
                self.notify(Level::Error, MSG_MISSING_ID);
                return ToggleOutcome::MissingIdentifier;
            }
            Err(BeginError::InvalidIdentifier) => {
                warn!("toggle aborted, document id is a dot segment");
                self.notify(Level::Error, MSG_INVALID_ID);
                return ToggleOutcome::InvalidIdentifier;
            }
        };

        let document_id = txn.document_id().to_owned();
        debug!(%document_id, prev = txn.prev(), next = txn.next(), "toggle started");

        let request = AssertUnwindSafe(self.api.toggle(&document_id)).catch_unwind();
        let response = match request.await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return self.revert(txn, ToggleError::Transport(e.to_string())),
            Err(_) => {
                error!(%document_id, "favorite transport panicked");
                return self.revert(txn, ToggleError::Transport("request aborted".to_owned()));
            }
        };

        if !response.is_success() {
            let error = ToggleError::ServerRejection { status: response.status, body: response.body };
            return self.revert(txn, error);
        }

        let (favorited, authoritative) = match response.favorited() {
            Some(value) => (value, true),
            None => {
                warn!(%document_id, error = %ToggleError::MalformedResponse, "keeping optimistic value");
                (txn.next(), false)
            }
        };
        txn.commit(favorited);

        info!(%document_id, favorited, authoritative, "favorite toggled");
        self.notify(Level::Success, if favorited { MSG_ADDED } else { MSG_REMOVED });
        ToggleOutcome::Confirmed { favorited, authoritative }
    }

    fn revert(&self, txn: OptimisticToggle, error: ToggleError) -> ToggleOutcome {
        let favorited = txn.prev();
        warn!(document_id = %txn.document_id(), error = %error, "favorite toggle reverted");
        txn.revert();
        self.notify(Level::Error, format!("Could not update favorite: {error}"));
        ToggleOutcome::Reverted { favorited, error }
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        self.notifier
            .notify(Notification::new(level, message, self.toast_ttl));
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
