//! Toggle control: per-document favorite button state.
//!
//! DESIGN
//! ======
//! Each control owns its own small state object: the document identifier,
//! an explicit stored favorite flag, the displayed label and classes, and
//! the busy flag that gates re-entry. The stored flag is authoritative; the
//! label text is only consulted when no flag was ever stored.
//!
//! Controls are shared as [`ControlRef`] between the delegated listener and
//! the toggle task. The mutex is held only for synchronous reads/writes.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::parse_bool;

pub const GLYPH_FAVORITED: char = '★';
pub const GLYPH_NOT_FAVORITED: char = '☆';
pub const FAVORITED_CLASS: &str = "favorited";

pub const ATTR_DOCUMENT_ID: &str = "data-document-id";
pub const ATTR_FAVORITED: &str = "data-favorited";

/// Label words that read as "already favorited" when no flag is stored.
const FAVORITED_LABELS: &[&str] = &["unfavorite", "remove from favorites", "favorited", "取消收藏", "已收藏"];

/// Shared handle to a control.
pub type ControlRef = Arc<Mutex<ToggleControl>>;

/// Lock a control, recovering the state if a previous holder panicked.
pub fn lock(control: &ControlRef) -> MutexGuard<'_, ToggleControl> {
    control.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// =============================================================================
// TOGGLE CONTROL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    document_id: Option<String>,
    favorited: Option<bool>,
    label: String,
    classes: BTreeSet<String>,
    busy: bool,
}

impl ToggleControl {
    /// Build a control with server-supplied initial state and render it.
    #[must_use]
    pub fn new(document_id: impl Into<String>, favorited: bool) -> Self {
        let mut control = Self {
            document_id: Some(document_id.into()),
            favorited: None,
            label: String::new(),
            classes: BTreeSet::new(),
            busy: false,
        };
        control.set_favorited(favorited);
        control
    }

    /// Build a control from rendered element attributes and text content.
    ///
    /// `data-favorited` becomes the stored flag when it parses; otherwise
    /// the flag stays unset and [`Self::is_favorited`] falls back to the
    /// label. Classes are taken from the `class` attribute.
    #[must_use]
    pub fn from_attributes(attributes: &HashMap<String, String>, text: &str) -> Self {
        let document_id = attributes.get(ATTR_DOCUMENT_ID).cloned();
        let favorited = attributes.get(ATTR_FAVORITED).and_then(|raw| parse_bool(raw));
        let classes = attributes
            .get("class")
            .map(|raw| raw.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        Self { document_id, favorited, label: text.to_owned(), classes, busy: false }
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_ref(self) -> ControlRef {
        Arc::new(Mutex::new(self))
    }

    /// The document identifier exactly as stored, unless absent or blank.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.document_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// Current favorite state: the stored flag, or the label as fallback.
    #[must_use]
    pub fn is_favorited(&self) -> bool {
        self.favorited.unwrap_or_else(|| label_reads_favorited(&self.label))
    }

    #[must_use]
    pub fn stored_flag(&self) -> Option<bool> {
        self.favorited
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// A busy control is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Value of the `aria-pressed` attribute.
    #[must_use]
    pub fn aria_pressed(&self) -> &'static str {
        if self.is_favorited() { "true" } else { "false" }
    }

    /// Store the flag and update glyph and class to match.
    pub fn set_favorited(&mut self, favorited: bool) {
        self.favorited = Some(favorited);
        if favorited {
            self.label = GLYPH_FAVORITED.to_string();
            self.classes.insert(FAVORITED_CLASS.to_owned());
        } else {
            self.label = GLYPH_NOT_FAVORITED.to_string();
            self.classes.remove(FAVORITED_CLASS);
        }
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

fn label_reads_favorited(label: &str) -> bool {
    let text = label.trim();
    if text.starts_with(GLYPH_FAVORITED) {
        return true;
    }
    if text.starts_with(GLYPH_NOT_FAVORITED) {
        return false;
    }
    let lower = text.to_lowercase();
    FAVORITED_LABELS.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
#[path = "control_test.rs"]
mod tests;
