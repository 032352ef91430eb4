//! Form integration.
//!
//! The control does not validate anything itself. Validity and form
//! association belong to the host; the control exposes them through a
//! [`FormInternals`] implementation and forwards every query unchanged.

use std::sync::Arc;

/// The value used to identify the control's kind to forms.
pub const TYPE_NAME: &str = "select-3";

/// An opaque reference to the form a control belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormRef {
    id: String,
}

impl FormRef {
    /// Create a reference to the form identified by `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The host's identifier for the form.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The validity flags reported by the host.
///
/// All flags false means the value is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityState {
    /// A value is required and none is selected.
    pub value_missing: bool,
    /// The value does not have the expected type.
    pub type_mismatch: bool,
    /// The value does not match the required pattern.
    pub pattern_mismatch: bool,
    /// The value is longer than allowed.
    pub too_long: bool,
    /// The value is shorter than allowed.
    pub too_short: bool,
    /// The value is below the allowed minimum.
    pub range_underflow: bool,
    /// The value is above the allowed maximum.
    pub range_overflow: bool,
    /// The value does not fit the allowed step.
    pub step_mismatch: bool,
    /// The host could not convert the input.
    pub bad_input: bool,
    /// The host set a custom validity message.
    pub custom_error: bool,
}

impl ValidityState {
    /// Whether no flag is set.
    pub fn valid(&self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch
            || self.bad_input
            || self.custom_error)
    }
}

/// Host-provided form participation.
///
/// Implementations answer for a single control instance.
pub trait FormInternals: Send + Sync {
    /// The form the control is associated with, if any.
    fn form(&self) -> Option<FormRef>;

    /// The current validity flags.
    fn validity(&self) -> ValidityState;

    /// The message shown for the current validity state.
    fn validation_message(&self) -> String;

    /// Whether the control takes part in constraint validation.
    fn will_validate(&self) -> bool;

    /// Check validity without user-visible reporting.
    fn check_validity(&self) -> bool {
        self.validity().valid()
    }

    /// Check validity and report problems to the user.
    fn report_validity(&self) -> bool {
        self.check_validity()
    }
}

impl<T: FormInternals + ?Sized> FormInternals for Arc<T> {
    fn form(&self) -> Option<FormRef> {
        (**self).form()
    }

    fn validity(&self) -> ValidityState {
        (**self).validity()
    }

    fn validation_message(&self) -> String {
        (**self).validation_message()
    }

    fn will_validate(&self) -> bool {
        (**self).will_validate()
    }

    fn check_validity(&self) -> bool {
        (**self).check_validity()
    }

    fn report_validity(&self) -> bool {
        (**self).report_validity()
    }
}

/// Internals for a control that is not attached to any form.
///
/// Always valid, never validated, no form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedInternals;

impl FormInternals for DetachedInternals {
    fn form(&self) -> Option<FormRef> {
        None
    }

    fn validity(&self) -> ValidityState {
        ValidityState::default()
    }

    fn validation_message(&self) -> String {
        String::new()
    }

    fn will_validate(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validity_is_valid() {
        assert!(ValidityState::default().valid());

        let missing = ValidityState {
            value_missing: true,
            ..Default::default()
        };
        assert!(!missing.valid());
    }

    #[test]
    fn test_detached_internals() {
        let internals = DetachedInternals;
        assert_eq!(internals.form(), None);
        assert!(!internals.will_validate());
        assert!(internals.check_validity());
        assert!(internals.report_validity());
        assert_eq!(internals.validation_message(), "");
    }

    #[test]
    fn test_arc_forwards() {
        struct Custom;
        impl FormInternals for Custom {
            fn form(&self) -> Option<FormRef> {
                Some(FormRef::new("signup"))
            }
            fn validity(&self) -> ValidityState {
                ValidityState {
                    custom_error: true,
                    ..Default::default()
                }
            }
            fn validation_message(&self) -> String {
                "pick a user".into()
            }
            fn will_validate(&self) -> bool {
                true
            }
        }

        let internals = Arc::new(Custom);
        assert_eq!(internals.form().unwrap().id(), "signup");
        assert!(!internals.check_validity());
        assert_eq!(internals.validation_message(), "pick a user");
    }
}
