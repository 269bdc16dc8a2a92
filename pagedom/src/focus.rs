use crate::element::Element;

/// Tracks which element is currently focused.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<String>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element ID.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Programmatically focus an element by ID.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        if self.focused.as_deref() == Some(id) {
            return false;
        }
        self.focused = Some(id.to_string());
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Focus the next element in tab order (Tab navigation).
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_next(&mut self, root: &Element) -> Option<String> {
        let focusable = collect_focusable(root);
        if focusable.is_empty() {
            return None;
        }

        let new_focus = match &self.focused {
            None => focusable[0].clone(),
            Some(current) => match focusable.iter().position(|id| id == current) {
                Some(i) => focusable[(i + 1) % focusable.len()].clone(),
                // Focus sits on something outside the tab order (an option
                // row, say): continue from the nearest tabbable element after it.
                None => next_after(root, current, &focusable).unwrap_or_else(|| focusable[0].clone()),
            },
        };

        self.move_to(new_focus)
    }

    /// Focus the previous element in tab order (Shift+Tab navigation).
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_prev(&mut self, root: &Element) -> Option<String> {
        let focusable = collect_focusable(root);
        if focusable.is_empty() {
            return None;
        }

        let last = focusable.len() - 1;
        let new_focus = match &self.focused {
            None => focusable[last].clone(),
            Some(current) => match focusable.iter().position(|id| id == current) {
                Some(0) => focusable[last].clone(),
                Some(i) => focusable[i - 1].clone(),
                None => prev_before(root, current, &focusable).unwrap_or_else(|| focusable[last].clone()),
            },
        };

        self.move_to(new_focus)
    }

    fn move_to(&mut self, new_focus: String) -> Option<String> {
        if self.focused.as_ref() != Some(&new_focus) {
            log::debug!("[focus] {:?} -> {}", self.focused, new_focus);
            self.focused = Some(new_focus.clone());
            Some(new_focus)
        } else {
            None
        }
    }
}

/// Collect all tabbable element IDs in sequential navigation order.
///
/// Positive tab indices come first (ascending, ties in tree order), then
/// every `tabindex=0` element in tree order. Negative tab indices are skipped.
pub fn collect_focusable(element: &Element) -> Vec<String> {
    let mut entries = Vec::new();
    collect_focusable_recursive(element, &mut entries);
    // Stable sort keeps tree order within each tab index.
    entries.sort_by_key(|(index, _)| if *index > 0 { *index } else { i32::MAX });
    entries.into_iter().map(|(_, id)| id).collect()
}

fn collect_focusable_recursive(element: &Element, result: &mut Vec<(i32, String)>) {
    if element.is_tabbable() {
        if let Some(index) = element.tab_index() {
            result.push((index, element.id.clone()));
        }
    }
    for child in element.content.children() {
        collect_focusable_recursive(child, result);
    }
}

/// Every element ID in tree (pre-)order.
fn tree_order(element: &Element, out: &mut Vec<String>) {
    out.push(element.id.clone());
    for child in element.content.children() {
        tree_order(child, out);
    }
}

fn next_after(root: &Element, current: &str, focusable: &[String]) -> Option<String> {
    let mut order = Vec::new();
    tree_order(root, &mut order);
    let start = order.iter().position(|id| id == current)?;
    order[start + 1..]
        .iter()
        .find(|id| focusable.contains(id))
        .cloned()
}

fn prev_before(root: &Element, current: &str, focusable: &[String]) -> Option<String> {
    let mut order = Vec::new();
    tree_order(root, &mut order);
    let end = order.iter().position(|id| id == current)?;
    order[..end]
        .iter()
        .rev()
        .find(|id| focusable.contains(id))
        .cloned()
}
