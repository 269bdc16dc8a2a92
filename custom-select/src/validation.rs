//! Required-field validation for select values.
//!
//! The validator is the typical consumer of [`ChangeEvent`]s: it checks that
//! required selects carry a value before a form is submitted, marks the
//! offending triggers, and tracks which fields the user has since changed.
//!
//! # Example
//!
//! ```ignore
//! let mut validator = Validator::new()
//!     .required("service", "Please choose a service");
//!
//! let result = validator.validate(&page);
//! validator.apply(&mut page, &result);
//! if let Some(trigger) = result.first_invalid_widget() {
//!     page.document_mut().focus(trigger);
//! }
//! ```

use std::collections::HashSet;

use crate::page::{ChangeEvent, Page};

/// Information about a single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Hidden field name.
    pub field_name: String,
    /// Trigger element id (for focusing and error styling).
    pub widget_id: String,
    /// Error message.
    pub message: String,
}

/// Result of validating one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Get the widget ID of the first invalid field (for focusing).
    pub fn first_invalid_widget(&self) -> Option<&str> {
        self.first_error().map(|e| e.widget_id.as_str())
    }
}

#[derive(Debug, Clone)]
struct RequiredRule {
    field_name: String,
    message: String,
}

/// Validator over the selects of a page, keyed by hidden field name.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<RequiredRule>,
    /// Fields changed since the last `validate`.
    touched: HashSet<String>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the select whose hidden field is named `field_name` to have a value.
    pub fn required(mut self, field_name: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(RequiredRule {
            field_name: field_name.into(),
            message: message.into(),
        });
        self
    }

    /// Check every rule against the current hidden field values.
    ///
    /// A rule whose select is missing from the page is a markup error; it is
    /// logged and skipped rather than reported to the user.
    pub fn validate(&mut self, page: &Page) -> ValidationResult {
        self.touched.clear();

        let mut errors = Vec::new();
        for rule in &self.rules {
            let Some(select) = page.select_by_name(&rule.field_name) else {
                log::warn!("[validation] no select named '{}'", rule.field_name);
                continue;
            };
            let value = page
                .document()
                .get(&select.parts().input)
                .map(|el| el.value.trim().to_string())
                .unwrap_or_default();
            if value.is_empty() {
                errors.push(FieldError {
                    field_name: rule.field_name.clone(),
                    widget_id: select.parts().trigger.clone(),
                    message: rule.message.clone(),
                });
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Put the error class on every invalid trigger.
    ///
    /// Clearing happens in the widget itself: choosing a value removes the class.
    pub fn apply(&self, page: &mut Page, result: &ValidationResult) {
        let class = page.config().error_class.clone();
        for error in result.errors() {
            page.document_mut()
                .update(&error.widget_id, |trigger| {
                    trigger.add_class(&class);
                });
        }
    }

    /// Record a change notification. Returns true if it concerns a field
    /// this validator checks.
    pub fn observe(&mut self, change: &ChangeEvent) -> bool {
        let Some(name) = change.name.as_deref() else {
            return false;
        };
        if !self.rules.iter().any(|r| r.field_name == name) {
            return false;
        }
        self.touched.insert(name.to_string());
        true
    }

    /// Whether the field changed since the last validation.
    pub fn is_touched(&self, field_name: &str) -> bool {
        self.touched.contains(field_name)
    }
}
