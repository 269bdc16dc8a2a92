//! Accessible custom select (single-select combobox) for `pagedom` pages.
//!
//! A [`Page`] owns the document, the timer queue and a [`SelectRegistry`] of
//! live [`SelectInstance`]s. Hosts feed it [`pagedom::Event`]s and read the
//! resulting document state and [`ChangeEvent`]s back out.

pub mod config;
pub mod error;
pub mod page;
pub mod registry;
pub mod select;
pub mod validation;

pub use config::{SelectConfig, TypeAhead};
pub use error::{ConfigError, MarkupError};
pub use page::{ChangeEvent, Page};
pub use registry::SelectRegistry;
pub use select::{EventResult, SelectAction, SelectId, SelectInstance, SelectOption};
pub use validation::{FieldError, ValidationResult, Validator};
