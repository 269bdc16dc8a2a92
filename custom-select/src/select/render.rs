//! Reflect select state into the document: classes, ARIA attributes, focus.
//!
//! Every function here is idempotent. Callers re-run them after each state
//! change instead of tracking which attribute changed.

use pagedom::Document;

use super::{SelectOption, SelectParts};
use crate::config::SelectConfig;

/// Static roles and ids required by the combobox pattern.
pub fn apply_roles(doc: &mut Document, parts: &SelectParts, options: &[SelectOption]) {
    doc.update(&parts.trigger, |trigger| {
        trigger.set_attr("role", "combobox");
        trigger.set_attr("aria-haspopup", "listbox");
        trigger.set_attr("aria-controls", parts.panel.clone());
    });
    doc.update(&parts.panel, |panel| panel.set_attr("role", "listbox"));
    for option in options {
        doc.update(option.id(), |row| {
            row.set_attr("role", "option");
            // Reachable by script (arrow keys), not by Tab.
            row.set_attr("tabindex", "-1");
        });
    }
}

/// Panel visibility, `aria-expanded` and the arrow affordance.
pub fn render_expanded(doc: &mut Document, parts: &SelectParts, open: bool, config: &SelectConfig) {
    doc.update(&parts.panel, |panel| panel.set_class(&config.visible_class, open));
    doc.update(&parts.trigger, |trigger| {
        trigger.set_attr("aria-expanded", open.to_string());
    });
    if let Some(arrow) = &parts.arrow {
        doc.update(arrow, |arrow| arrow.set_class(&config.rotate_class, open));
    }
}

/// Highlight styling, `aria-activedescendant` and focus on the highlighted row.
pub fn render_highlight(
    doc: &mut Document,
    parts: &SelectParts,
    options: &[SelectOption],
    highlighted: Option<usize>,
    config: &SelectConfig,
) {
    for (i, option) in options.iter().enumerate() {
        doc.update(option.id(), |row| {
            row.set_class(&config.highlight_class, highlighted == Some(i));
        });
    }

    match highlighted.and_then(|i| options.get(i)) {
        Some(option) => {
            let option_id = option.id().to_string();
            doc.update(&parts.trigger, |trigger| {
                trigger.set_attr("aria-activedescendant", option_id.clone());
            });
            doc.focus(&option_id);
        }
        None => {
            doc.update(&parts.trigger, |trigger| {
                trigger.remove_attr("aria-activedescendant");
            });
        }
    }
}

/// `aria-selected` on every row.
pub fn render_selection(doc: &mut Document, options: &[SelectOption]) {
    for option in options {
        let selected = option.is_selected();
        doc.update(option.id(), |row| {
            row.set_attr("aria-selected", selected.to_string());
        });
    }
}

/// Hidden field value and the visible label for a chosen value.
pub fn render_value(doc: &mut Document, parts: &SelectParts, value: &str, config: &SelectConfig) {
    doc.update(&parts.input, |input| input.value = value.to_string());
    if let Some(label) = &parts.label {
        doc.update(label, |label| {
            label.set_text(value);
            label.remove_class(&config.placeholder_class);
        });
    }
    doc.update(&parts.trigger, |trigger| {
        trigger.remove_class(&config.error_class);
    });
}
