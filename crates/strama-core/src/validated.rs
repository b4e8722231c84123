//! Validated form fields for the create dialogs
//!
//! Pairs a field value with a validation verdict. Fields are created
//! empty when a dialog opens, mutated on every edit, and read-only at
//! submit time: submission is blocked while any required field carries
//! an `Error` verdict or still holds its empty sentinel.

use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

/// Validation verdict attached to a form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldVerdict {
    /// Untouched or not yet validated
    #[default]
    Default,
    /// Validated successfully
    Success,
    /// Accepted, with a caveat worth showing
    Warning,
    /// Rejected; blocks submission
    Error,
}

/// Types that know their empty sentinel.
///
/// A required field whose value is still the sentinel blocks submission
/// even when no validation has run yet.
pub trait EmptyValue {
    /// Whether this value is the type's empty sentinel.
    fn is_empty_value(&self) -> bool;
}

impl EmptyValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> EmptyValue for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

/// A form field value paired with its validation verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedField<T> {
    value: T,
    verdict: FieldVerdict,
    message: Option<String>,
}

impl<T: Default> ValidatedField<T> {
    /// Create an empty field with the default verdict.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> ValidatedField<T> {
    /// Create a field holding `value` with the default verdict.
    pub fn with_value(value: T) -> Self {
        Self {
            value,
            verdict: FieldVerdict::Default,
            message: None,
        }
    }

    /// Current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Current verdict.
    pub fn verdict(&self) -> FieldVerdict {
        self.verdict
    }

    /// Message accompanying the verdict, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Replace the value, keeping the verdict untouched.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Replace the verdict and its message.
    pub fn set_verdict(&mut self, verdict: FieldVerdict, message: Option<String>) {
        self.verdict = verdict;
        self.message = message;
    }

    /// Whether the field currently carries an error verdict.
    pub fn is_error(&self) -> bool {
        self.verdict == FieldVerdict::Error
    }
}

impl<T: EmptyValue> ValidatedField<T> {
    /// Whether this field, treated as required, blocks submission.
    pub fn blocks_submit(&self) -> bool {
        self.is_error() || self.value.is_empty_value()
    }
}

/// Form state for the create-instance dialog.
///
/// All four fields are required. The name is validated on every edit;
/// the remaining fields are selections and only need to be non-empty.
#[derive(Debug, Clone, Default)]
pub struct CreateInstanceForm {
    /// Instance name, validated against cluster naming rules
    pub name: ValidatedField<String>,
    /// Cloud provider selection
    pub provider: ValidatedField<Option<String>>,
    /// Region selection
    pub region: ValidatedField<Option<String>>,
    /// Plan selection
    pub plan: ValidatedField<Option<String>>,
}

impl CreateInstanceForm {
    /// Empty form, as presented when the dialog opens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name edit, validating the candidate inline.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match validation::validate_instance_name(&name) {
            Ok(()) => self.name.set_verdict(FieldVerdict::Success, None),
            Err(e) => self
                .name
                .set_verdict(FieldVerdict::Error, Some(e.to_string())),
        }
        self.name.set_value(name);
    }

    /// Record a provider selection.
    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.provider.set_value(Some(provider.into()));
        self.provider.set_verdict(FieldVerdict::Success, None);
    }

    /// Record a region selection.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.region.set_value(Some(region.into()));
        self.region.set_verdict(FieldVerdict::Success, None);
    }

    /// Record a plan selection.
    pub fn set_plan(&mut self, plan: impl Into<String>) {
        self.plan.set_value(Some(plan.into()));
        self.plan.set_verdict(FieldVerdict::Success, None);
    }

    /// Whether every required field is filled and none is in error.
    pub fn ready_to_submit(&self) -> bool {
        !self.name.blocks_submit()
            && !self.provider.blocks_submit()
            && !self.region.blocks_submit()
            && !self.plan.blocks_submit()
    }

    /// Validation error for the current name, if any.
    pub fn name_error(&self) -> Option<ValidationError> {
        validation::validate_instance_name(self.name.value()).err()
    }
}
