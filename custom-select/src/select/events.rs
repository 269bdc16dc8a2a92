//! Event handling for the select widget.
//!
//! Input is first translated into a [`SelectAction`] by the instance alone
//! (a pure function of its state and the input). The page then applies the
//! action, which is where cross-instance effects such as closing the other
//! selects happen.

use pagedom::{Document, Key, Modifiers};

use super::SelectInstance;
use crate::config::TypeAhead;

// =============================================================================
// Event Result
// =============================================================================

/// Whether an input was handled. `Ignored` lets the page run the default
/// action (Tab moves focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Highlight direction for arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// Why an open select is being closed without a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Escape key. Focus goes back to the trigger.
    Escape,
    /// Tab key. Focus is left to the page's tab navigation.
    Tab,
    /// Click somewhere outside the widget.
    OutsideClick,
}

/// State transition requested by an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    /// Trigger clicked: open if closed, close if open.
    Toggle,
    /// Open (closing every other select first).
    Open,
    /// Open if needed, then move the highlight.
    Step(Step),
    /// Select the option at this index and close.
    Commit(usize),
    /// Close without selecting.
    Dismiss(DismissReason),
    /// Open if needed, then feed type-ahead.
    Search(char),
    /// Recognized key with nothing to do; still consumed.
    Noop,
    /// Not a key the select handles.
    Pass,
}

impl SelectAction {
    pub fn result(&self) -> EventResult {
        match self {
            Self::Pass | Self::Dismiss(DismissReason::Tab) => EventResult::Ignored,
            _ => EventResult::Consumed,
        }
    }
}

/// Where inside a select a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Trigger,
    Option(usize),
    /// Inside the wrapper but on neither trigger nor an option.
    Inside,
}

impl SelectInstance {
    /// Classify a click target relative to this widget. None means outside.
    pub fn hit(&self, doc: &Document, target: &str) -> Option<Hit> {
        if doc.contains(&self.parts().trigger, target) {
            return Some(Hit::Trigger);
        }
        if let Some(index) = self.option_for(doc, target) {
            return Some(Hit::Option(index));
        }
        if doc.contains(&self.parts().wrapper, target) {
            return Some(Hit::Inside);
        }
        None
    }

    /// Whether key events on `target` belong to this widget. Keys are
    /// handled on the trigger and anywhere inside the options panel.
    pub fn handles_keys_on(&self, doc: &Document, target: &str) -> bool {
        doc.contains(&self.parts().trigger, target) || doc.contains(&self.parts().panel, target)
    }

    /// Action for a click that hit this widget.
    pub fn action_for_click(&self, hit: Hit) -> SelectAction {
        match hit {
            Hit::Trigger => SelectAction::Toggle,
            Hit::Option(index) => SelectAction::Commit(index),
            Hit::Inside => SelectAction::Pass,
        }
    }

    /// Action for a click outside this widget.
    pub fn action_for_outside_click(&self) -> SelectAction {
        if self.is_open() {
            SelectAction::Dismiss(DismissReason::OutsideClick)
        } else {
            SelectAction::Pass
        }
    }

    /// Action for a key press on the trigger or panel.
    pub fn action_for_key(&self, key: Key, modifiers: Modifiers, type_ahead: &TypeAhead) -> SelectAction {
        // Leave shortcuts to the browser/host
        if modifiers.ctrl || modifiers.alt {
            return SelectAction::Pass;
        }

        match key {
            Key::Char(' ') if self.continues_search(' ', type_ahead) => SelectAction::Search(' '),
            Key::Enter | Key::Char(' ') => {
                if !self.is_open() {
                    SelectAction::Open
                } else if let Some(index) = self.highlighted() {
                    SelectAction::Commit(index)
                } else {
                    SelectAction::Noop
                }
            }
            Key::Down => SelectAction::Step(Step::Down),
            Key::Up => SelectAction::Step(Step::Up),
            Key::Escape => {
                if self.is_open() {
                    SelectAction::Dismiss(DismissReason::Escape)
                } else {
                    SelectAction::Noop
                }
            }
            Key::Tab | Key::BackTab => {
                if self.is_open() {
                    SelectAction::Dismiss(DismissReason::Tab)
                } else {
                    SelectAction::Pass
                }
            }
            Key::Char(c) if type_ahead.accepts(c) => SelectAction::Search(c),
            _ => SelectAction::Pass,
        }
    }

    /// Whether `c` extends a running search toward some option, as the space
    /// in "New York" does. Otherwise a space activates like Enter.
    fn continues_search(&self, c: char, type_ahead: &TypeAhead) -> bool {
        if self.search_buffer().is_empty() || !type_ahead.accepts(c) {
            return false;
        }
        let mut prefix = self.search_buffer().to_string();
        prefix.extend(c.to_lowercase());
        self.options().iter().any(|o| o.starts_with(&prefix))
    }
}
