//! Error types.

use thiserror::Error;

/// Markup that cannot host a select widget.
///
/// These are configuration mistakes in the page. The page skips the wrapper
/// and logs a warning instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("wrapper element '{0}' not found")]
    MissingWrapper(String),

    #[error("wrapper '{0}' has no trigger button")]
    MissingTrigger(String),

    #[error("wrapper '{wrapper}' has no options panel (.{class})")]
    MissingPanel { wrapper: String, class: String },

    #[error("options panel in wrapper '{0}' has no option rows")]
    NoOptions(String),

    #[error("wrapper '{0}' has no hidden value field")]
    MissingHiddenInput(String),
}

/// Invalid [`SelectConfig`](crate::SelectConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid type-ahead pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("search reset delay must be greater than zero")]
    ZeroSearchDelay,

    #[error("class name for '{0}' is empty")]
    EmptyClass(&'static str),
}
