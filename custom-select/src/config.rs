//! Select configuration.

use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// Class names and timing used by every select on a page.
///
/// The defaults match the site's markup. Hosts can also deserialize it,
/// with missing fields falling back to the defaults:
///
/// ```ignore
/// let config: SelectConfig = serde_json::from_str(r#"{"search_reset_ms": 800}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Marks a widget root.
    pub wrapper_class: String,
    /// Marks the `<ul>` holding the option rows.
    pub panel_class: String,
    /// Marks the span showing the chosen value inside the trigger.
    pub label_class: String,
    /// Put on the panel while open.
    pub visible_class: String,
    /// Put on the arrow icon while open.
    pub rotate_class: String,
    /// Put on the highlighted option row.
    pub highlight_class: String,
    /// Greyed-out placeholder look of the label, removed once a value is chosen.
    pub placeholder_class: String,
    /// Validation error look of the trigger, removed once a value is chosen.
    pub error_class: String,
    /// Attribute on an option row holding its value.
    pub value_attr: String,

    /// Idle time after which the type-ahead buffer is cleared.
    pub search_reset_ms: u64,

    /// Regex a single typed character must match to feed type-ahead.
    /// `None` accepts ASCII letters, digits and whitespace.
    pub type_ahead_pattern: Option<String>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            wrapper_class: "custom-select-wrapper".to_string(),
            panel_class: "options-panel".to_string(),
            label_class: "selected-option-text".to_string(),
            visible_class: "visible".to_string(),
            rotate_class: "rotate-180".to_string(),
            highlight_class: "bg-gray-100".to_string(),
            placeholder_class: "text-gray-500".to_string(),
            error_class: "border-red-500".to_string(),
            value_attr: "data-value".to_string(),
            search_reset_ms: 600,
            type_ahead_pattern: None,
        }
    }
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_reset(mut self, delay: Duration) -> Self {
        self.search_reset_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn type_ahead_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.type_ahead_pattern = Some(pattern.into());
        self
    }

    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = class.into();
        self
    }

    pub fn panel_class(mut self, class: impl Into<String>) -> Self {
        self.panel_class = class.into();
        self
    }

    pub fn highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_reset_ms)
    }

    /// Check the config and compile the type-ahead filter.
    pub fn validate(&self) -> Result<TypeAhead, ConfigError> {
        let classes = [
            ("wrapper_class", &self.wrapper_class),
            ("panel_class", &self.panel_class),
            ("visible_class", &self.visible_class),
            ("highlight_class", &self.highlight_class),
            ("value_attr", &self.value_attr),
        ];
        if let Some((name, _)) = classes.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::EmptyClass(*name));
        }
        if self.search_reset_ms == 0 {
            return Err(ConfigError::ZeroSearchDelay);
        }
        match &self.type_ahead_pattern {
            Some(pattern) => Ok(TypeAhead::Pattern(Regex::new(pattern)?)),
            None => Ok(TypeAhead::Default),
        }
    }
}

/// Decides which typed characters feed the type-ahead buffer.
#[derive(Debug, Clone, Default)]
pub enum TypeAhead {
    /// ASCII letters, digits and whitespace.
    #[default]
    Default,
    Pattern(Regex),
}

impl TypeAhead {
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Self::Default => c.is_ascii_alphanumeric() || c.is_whitespace(),
            Self::Pattern(re) => {
                let mut buf = [0u8; 4];
                re.is_match(c.encode_utf8(&mut buf))
            }
        }
    }
}
