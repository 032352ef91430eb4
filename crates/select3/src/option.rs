//! Selectable options.
//!
//! A [`SelectOption`] is a shared handle: cloning it yields another handle to
//! the *same* option, and toggling `selected` through any handle is visible
//! through all of them. Option identity is therefore by handle, never by
//! value, and two distinct options may carry the same value.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

struct OptionData {
    value: String,
    label: String,
    selected: AtomicBool,
}

/// A single selectable entry with a value, a label, and a selection flag.
///
/// # Example
///
/// ```
/// use select3::SelectOption;
///
/// let option = SelectOption::new("7", "alice");
/// let same = option.clone();
///
/// same.set_selected(true);
/// assert!(option.is_selected());
/// assert!(option.ptr_eq(&same));
///
/// let twin = SelectOption::new("7", "alice");
/// assert!(!option.ptr_eq(&twin));
/// ```
#[derive(Clone)]
pub struct SelectOption {
    inner: Arc<OptionData>,
}

impl SelectOption {
    /// Create an unselected option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(OptionData {
                value: value.into(),
                label: label.into(),
                selected: AtomicBool::new(false),
            }),
        }
    }

    /// Set the initial selection state using builder pattern.
    pub fn with_selected(self, selected: bool) -> Self {
        self.set_selected(selected);
        self
    }

    /// The option's value.
    pub fn value(&self) -> &str {
        &self.inner.value
    }

    /// The option's display label.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Whether the option is selected.
    pub fn is_selected(&self) -> bool {
        self.inner.selected.load(Ordering::Acquire)
    }

    /// Toggle the selection flag in place.
    pub fn set_selected(&self, selected: bool) {
        self.inner.selected.store(selected, Ordering::Release);
    }

    /// Whether both handles refer to the same option.
    pub fn ptr_eq(&self, other: &SelectOption) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A plain copy of the option's current state, for rendering.
    pub fn snapshot(&self) -> OptionSnapshot {
        OptionSnapshot {
            value: self.value().to_string(),
            label: self.label().to_string(),
            selected: self.is_selected(),
        }
    }
}

impl fmt::Debug for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectOption")
            .field("value", &self.value())
            .field("label", &self.label())
            .field("selected", &self.is_selected())
            .finish()
    }
}

/// The state of an option at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSnapshot {
    /// The option's value.
    pub value: String,
    /// The option's display label.
    pub label: String,
    /// Whether the option was selected.
    pub selected: bool,
}

impl OptionSnapshot {
    /// Create a snapshot literal, mostly useful in assertions.
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults_to_unselected() {
        let option = SelectOption::new("x", "X");
        assert_eq!(option.value(), "x");
        assert_eq!(option.label(), "X");
        assert!(!option.is_selected());
    }

    #[test]
    fn test_clones_share_selection() {
        let option = SelectOption::new("x", "X");
        let handle = option.clone();

        handle.set_selected(true);
        assert!(option.is_selected());

        option.set_selected(false);
        assert!(!handle.is_selected());
    }

    #[test]
    fn test_identity_is_by_handle() {
        let a = SelectOption::new("dup", "Duplicate");
        let b = SelectOption::new("dup", "Duplicate");

        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_snapshot_serializes() {
        let option = SelectOption::new("7", "alice").with_selected(true);
        let json = serde_json::to_value(option.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"value": "7", "label": "alice", "selected": true})
        );
    }
}
