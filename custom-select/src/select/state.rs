//! Select widget state.

use pagedom::{Document, Selector, TimerId, TimerQueue};

use super::events::Step;
use super::{render, SelectOption};
use crate::config::SelectConfig;
use crate::error::MarkupError;

/// Unique identifier for a select instance on a page.
///
/// The index is baked into the element ids of the panel and option rows, so
/// a page never hands out the same index twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectId(usize);

impl SelectId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// Element id given to the options panel.
    pub fn panel_id(&self) -> String {
        format!("custom-options-{}", self.0)
    }

    /// Element id given to the `n`th option row.
    pub fn option_id(&self, n: usize) -> String {
        format!("custom-option-{}-{n}", self.0)
    }
}

impl std::fmt::Display for SelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "select-{}", self.0)
    }
}

/// Deferred work a select schedules on the page timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTask {
    ClearSearch(SelectId),
}

/// Element ids of the markup a select is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectParts {
    pub wrapper: String,
    pub trigger: String,
    pub panel: String,
    pub input: String,
    /// `name` of the hidden field, used by form consumers.
    pub input_name: Option<String>,
    pub label: Option<String>,
    pub arrow: Option<String>,
}

/// One custom select bound to a wrapper element.
///
/// All mutation goes through methods that update the state and then re-render
/// the affected part of the document, so the markup always mirrors the state.
#[derive(Debug)]
pub struct SelectInstance {
    id: SelectId,
    parts: SelectParts,
    options: Vec<SelectOption>,
    open: bool,
    /// Highlighted row. None is the "-1" of the markup contract.
    highlighted: Option<usize>,
    search: String,
    search_timer: Option<TimerId>,
}

impl SelectInstance {
    /// Bind to the wrapper element `wrapper_id`.
    ///
    /// The markup is checked completely before anything is written, so a
    /// failed bind leaves the document untouched.
    pub fn bind(
        doc: &mut Document,
        wrapper_id: &str,
        id: SelectId,
        config: &SelectConfig,
    ) -> Result<Self, MarkupError> {
        let wrapper = doc
            .get(wrapper_id)
            .ok_or_else(|| MarkupError::MissingWrapper(wrapper_id.to_string()))?;
        let wrapper_id = wrapper.id.clone();

        let trigger = doc
            .query_first(&wrapper_id, &Selector::Tag("button"))
            .ok_or_else(|| MarkupError::MissingTrigger(wrapper_id.clone()))?;
        let panel = doc
            .query_first(&wrapper_id, &Selector::Class(&config.panel_class))
            .ok_or_else(|| MarkupError::MissingPanel {
                wrapper: wrapper_id.clone(),
                class: config.panel_class.clone(),
            })?;
        let rows = doc.query_all(&panel, &Selector::Tag("li"));
        if rows.is_empty() {
            return Err(MarkupError::NoOptions(wrapper_id));
        }
        let input = doc
            .query_first(&wrapper_id, &Selector::Input("hidden"))
            .ok_or_else(|| MarkupError::MissingHiddenInput(wrapper_id.clone()))?;
        let input_name = doc
            .get(&input)
            .and_then(|el| el.get_attr("name"))
            .map(str::to_string);
        let label = doc.query_first(&wrapper_id, &Selector::Class(&config.label_class));
        let arrow = doc.query_first(&wrapper_id, &Selector::Tag("svg"));

        // Read option values and any pre-selection before renaming rows.
        let mut preselected = None;
        let mut options = Vec::with_capacity(rows.len());
        for (n, row_id) in rows.iter().enumerate() {
            let Some(row) = doc.get(row_id) else { continue };
            let value = row
                .get_attr(&config.value_attr)
                .map(str::to_string)
                .unwrap_or_else(|| row.text_content().trim().to_string());
            if preselected.is_none() && row.get_attr("aria-selected") == Some("true") {
                preselected = Some(n);
            }
            options.push(SelectOption::new(id.option_id(n), value));
        }
        if preselected.is_none() {
            // A restored form may carry the value in the hidden field only.
            let current = doc.get(&input).map(|el| el.value.clone()).unwrap_or_default();
            if !current.is_empty() {
                preselected = options.iter().position(|o| o.value() == current);
            }
        }

        // Assign instance-scoped ids.
        let panel_id = id.panel_id();
        doc.update(&panel, |el| el.id = panel_id.clone());
        for (row_id, option) in rows.iter().zip(&options) {
            let new_id = option.id().to_string();
            doc.update(row_id, |el| el.id = new_id);
        }

        let parts = SelectParts {
            wrapper: wrapper_id,
            trigger,
            panel: panel_id,
            input,
            input_name,
            label,
            arrow,
        };

        let mut instance = Self {
            id,
            parts,
            options,
            open: false,
            highlighted: None,
            search: String::new(),
            search_timer: None,
        };

        render::apply_roles(doc, &instance.parts, &instance.options);
        render::render_expanded(doc, &instance.parts, false, config);
        render::render_highlight(doc, &instance.parts, &instance.options, None, config);
        if let Some(index) = preselected {
            instance.mark_selected(index);
            if let Some(option) = instance.options.get(index) {
                let value = option.value().to_string();
                render::render_value(doc, &instance.parts, &value, config);
            }
        }
        render::render_selection(doc, &instance.options);

        log::debug!(
            "[select] bound {} to #{} ({} options, preselected={:?})",
            instance.id,
            instance.parts.wrapper,
            instance.options.len(),
            preselected
        );
        Ok(instance)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> SelectId {
        self.id
    }

    pub fn parts(&self) -> &SelectParts {
        &self.parts
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(SelectOption::is_selected)
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.is_selected())
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected().map(SelectOption::value)
    }

    pub fn search_buffer(&self) -> &str {
        &self.search
    }

    pub fn search_timer(&self) -> Option<TimerId> {
        self.search_timer
    }

    /// Index of the option whose row is `element_id` or contains it.
    pub fn option_for(&self, doc: &Document, element_id: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| doc.contains(o.id(), element_id))
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Open the panel. Does not touch other instances; the page closes them
    /// first. Returns false if already open.
    pub fn open(&mut self, doc: &mut Document, config: &SelectConfig) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        render::render_expanded(doc, &self.parts, true, config);
        log::debug!("[select] {} opened", self.id);
        true
    }

    /// Close the panel and drop the highlight.
    ///
    /// The closed markup is written even when already closed, so a forced
    /// close always leaves consistent attributes. Returns whether it was open.
    pub fn close(&mut self, doc: &mut Document, config: &SelectConfig) -> bool {
        let was_open = self.open;
        self.open = false;
        self.highlighted = None;
        render::render_expanded(doc, &self.parts, false, config);
        render::render_highlight(doc, &self.parts, &self.options, None, config);
        if was_open {
            log::debug!("[select] {} closed", self.id);
        }
        was_open
    }

    // -------------------------------------------------------------------------
    // Highlight (keyboard cursor)
    // -------------------------------------------------------------------------

    /// Move the highlight to `index`. Out-of-range indices are ignored.
    pub fn highlight(&mut self, doc: &mut Document, config: &SelectConfig, index: usize) {
        if index >= self.options.len() {
            return;
        }
        self.highlighted = Some(index);
        render::render_highlight(doc, &self.parts, &self.options, self.highlighted, config);
    }

    /// Move the highlight one row, wrapping at both ends.
    ///
    /// With no highlight, Down lands on the first row and Up on the last.
    pub fn step(&mut self, doc: &mut Document, config: &SelectConfig, step: Step) {
        let n = self.options.len();
        if n == 0 {
            return;
        }
        let next = match (step, self.highlighted) {
            (Step::Down, None) => 0,
            (Step::Down, Some(i)) => (i + 1) % n,
            (Step::Up, None) => n - 1,
            (Step::Up, Some(i)) => (i + n - 1) % n,
        };
        self.highlight(doc, config, next);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Make `index` the selected option and write its value into the page.
    /// Returns the selected value, or None for an out-of-range index.
    pub fn select(&mut self, doc: &mut Document, config: &SelectConfig, index: usize) -> Option<String> {
        let value = self.options.get(index)?.value().to_string();
        self.mark_selected(index);
        render::render_selection(doc, &self.options);
        render::render_value(doc, &self.parts, &value, config);
        log::debug!("[select] {} selected {:?}", self.id, value);
        Some(value)
    }

    fn mark_selected(&mut self, index: usize) {
        for (i, option) in self.options.iter_mut().enumerate() {
            option.set_selected(i == index);
        }
    }

    // -------------------------------------------------------------------------
    // Type-ahead
    // -------------------------------------------------------------------------

    /// Append a typed character to the search buffer and jump the highlight
    /// to the first option starting with the buffer, if any.
    ///
    /// The pending clear timer is replaced, so the buffer empties `delay`
    /// after the last keystroke.
    pub fn push_search(
        &mut self,
        doc: &mut Document,
        config: &SelectConfig,
        timers: &mut TimerQueue<SelectTask>,
        c: char,
    ) {
        if let Some(timer) = self.search_timer.take() {
            timers.cancel(timer);
        }
        self.search.extend(c.to_lowercase());
        self.search_timer = Some(timers.schedule(config.search_delay(), SelectTask::ClearSearch(self.id)));

        let found = self.options.iter().position(|o| o.starts_with(&self.search));
        log::debug!("[select] {} search {:?} -> {:?}", self.id, self.search, found);
        if let Some(index) = found {
            self.highlight(doc, config, index);
        }
    }

    /// Timer callback. Ignores timers that were already replaced.
    pub(crate) fn clear_search(&mut self, timer: TimerId) -> bool {
        if self.search_timer != Some(timer) {
            return false;
        }
        self.search_timer = None;
        self.search.clear();
        true
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Cancel pending timers before the instance is dropped.
    pub fn teardown(&mut self, timers: &mut TimerQueue<SelectTask>) {
        if let Some(timer) = self.search_timer.take() {
            timers.cancel(timer);
        }
        self.search.clear();
        log::debug!("[select] {} torn down", self.id);
    }
}
