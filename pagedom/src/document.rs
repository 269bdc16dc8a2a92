//! The page: an element tree plus the focus tracker.

use crate::element::{self, Element, Selector};
use crate::focus::FocusState;

#[derive(Debug)]
pub struct Document {
    root: Element,
    focus: FocusState,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            focus: FocusState::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        element::find_element(&self.root, id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        element::find_element_mut(&mut self.root, id)
    }

    /// Whether `target` is `ancestor` or lies inside it.
    /// False if `ancestor` is not in the document.
    pub fn contains(&self, ancestor: &str, target: &str) -> bool {
        self.get(ancestor)
            .is_some_and(|el| element::contains(el, target))
    }

    /// IDs of all descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: &str, selector: &Selector<'_>) -> Vec<String> {
        self.get(scope)
            .map(|el| {
                element::query_all(el, selector)
                    .into_iter()
                    .map(|e| e.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// ID of the first descendant of `scope` matching `selector`.
    pub fn query_first(&self, scope: &str, selector: &Selector<'_>) -> Option<String> {
        let el = self.get(scope)?;
        element::query_first(el, selector).map(|e| e.id.clone())
    }

    /// Run `f` on the element if it exists. Returns whether it did.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Element)) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                f(el);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focused(&self) -> Option<&str> {
        self.focus.focused()
    }

    /// Focus an element. Like `HTMLElement.focus()`, this does nothing for
    /// missing or non-focusable elements. Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        let focusable = self.get(id).is_some_and(Element::is_focusable);
        if !focusable {
            log::debug!("[focus] ignoring focus() on non-focusable {id}");
            return false;
        }
        self.focus.focus(id)
    }

    pub fn blur(&mut self) -> bool {
        self.focus.blur()
    }

    /// Default action of Tab.
    pub fn focus_next(&mut self) -> Option<String> {
        self.focus.focus_next(&self.root)
    }

    /// Default action of Shift+Tab.
    pub fn focus_prev(&mut self) -> Option<String> {
        self.focus.focus_prev(&self.root)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Replace the children of `id` wholesale (the `innerHTML = ...` case).
    ///
    /// Focus inside the replaced subtree is dropped. Returns false if the
    /// element does not exist.
    pub fn replace_children(&mut self, id: &str, children: Vec<Element>) -> bool {
        let focus_inside = self
            .focus
            .focused()
            .is_some_and(|focused| focused != id && self.contains(id, focused));

        let Some(el) = self.get_mut(id) else {
            return false;
        };
        el.set_children(children);

        if focus_inside {
            self.focus.blur();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(
            Element::div()
                .id("root")
                .child(Element::button("First").id("first"))
                .child(
                    Element::form()
                        .id("form")
                        .child(Element::button("Inner").id("inner"))
                        .child(Element::li("Row").id("row").attr("tabindex", "-1")),
                )
                .child(Element::span("plain").id("plain")),
        )
    }

    #[test]
    fn test_focus_ignores_non_focusable() {
        let mut d = doc();
        assert!(!d.focus("plain"));
        assert!(!d.focus("missing"));
        assert!(d.focus("row"));
        assert_eq!(d.focused(), Some("row"));
    }

    #[test]
    fn test_tab_from_untabbable_row_continues_in_tree_order() {
        let mut d = doc();
        d.focus("row");
        // Nothing tabbable after the row, so it wraps to the first.
        assert_eq!(d.focus_next(), Some("first".to_string()));
        d.focus("row");
        assert_eq!(d.focus_prev(), Some("inner".to_string()));
    }

    #[test]
    fn test_replace_children_drops_inner_focus() {
        let mut d = doc();
        d.focus("inner");
        assert!(d.replace_children("form", vec![Element::span("done").id("done")]));
        assert_eq!(d.focused(), None);
        assert!(d.get("inner").is_none());
        assert!(d.contains("form", "done"));
    }

    #[test]
    fn test_replace_children_keeps_outer_focus() {
        let mut d = doc();
        d.focus("first");
        d.replace_children("form", Vec::new());
        assert_eq!(d.focused(), Some("first"));
    }
}
