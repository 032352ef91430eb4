//! Property system for select3.
//!
//! Properties hold a control's configuration (name, flags, source URL) and
//! report whether a write actually changed anything, so the owner only emits
//! change notifications for real changes.
//!
//! # Example
//!
//! ```
//! use select3_core::{Property, Signal};
//!
//! struct Toggle {
//!     disabled: Property<bool>,
//!     disabled_changed: Signal<bool>,
//! }
//!
//! impl Toggle {
//!     fn set_disabled(&self, disabled: bool) {
//!         if self.disabled.set(disabled) {
//!             self.disabled_changed.emit(disabled);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Example
///
/// ```
/// use select3_core::Property;
///
/// let prop = Property::new(42);
/// assert_eq!(prop.get(), 42);
///
/// assert!(!prop.set(42));
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set_detects_change() {
        let prop = Property::new(false);

        assert!(!prop.set(false));
        assert!(prop.set(true));
        assert!(prop.get());
    }

    #[test]
    fn test_property_optional_string() {
        let prop = Property::new(Some("/api/users?q=".to_string()));

        assert!(!prop.set(Some("/api/users?q=".to_string())));
        assert!(prop.set(None));
        assert_eq!(prop.get(), None);
    }

    #[test]
    fn test_property_default() {
        let prop: Property<String> = Property::default();
        assert_eq!(prop.get(), "");
    }
}
