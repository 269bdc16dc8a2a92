//! One option row of a select.

/// An option owned by exactly one [`SelectInstance`](super::SelectInstance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Element id of the row, `custom-option-{select}-{n}`.
    id: String,
    /// Value written to the hidden field and shown in the trigger.
    value: String,
    selected: bool,
}

impl SelectOption {
    pub(crate) fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            selected: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Case-insensitive prefix match. `prefix` must already be lowercase.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.value.to_lowercase().starts_with(prefix)
    }
}
