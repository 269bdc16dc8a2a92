//! Page glue: routes events to selects and coordinates them.
//!
//! The page plays the role of the browser event loop for the widget. All
//! transitions run to completion inside [`Page::dispatch`]; the only deferred
//! work is the type-ahead reset, which fires from [`Page::advance`].

use std::time::Duration;

use pagedom::{Document, Element, Event, Key, Modifiers, Selector, TimerQueue};

use crate::config::{SelectConfig, TypeAhead};
use crate::error::ConfigError;
use crate::registry::SelectRegistry;
use crate::select::{DismissReason, EventResult, SelectAction, SelectId, SelectInstance, SelectTask};

/// Value-change notification emitted once per selection, like the DOM
/// `change` event fired on the hidden field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub select: SelectId,
    /// Element id of the hidden field.
    pub input_id: String,
    /// `name` of the hidden field.
    pub name: Option<String>,
    pub value: String,
}

type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;

pub struct Page {
    document: Document,
    timers: TimerQueue<SelectTask>,
    registry: SelectRegistry,
    config: SelectConfig,
    type_ahead: TypeAhead,
    /// Change notifications not yet drained by the host.
    changes: Vec<ChangeEvent>,
    listeners: Vec<ChangeListener>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("document", &self.document)
            .field("registry", &self.registry)
            .field("pending_timers", &self.timers.len())
            .field("changes", &self.changes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Page {
    /// Create a page with the default configuration. No selects are bound
    /// until [`Page::init_all`] runs.
    pub fn new(root: Element) -> Self {
        Self {
            document: Document::new(root),
            timers: TimerQueue::new(),
            registry: SelectRegistry::new(),
            config: SelectConfig::default(),
            type_ahead: TypeAhead::Default,
            changes: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn with_config(root: Element, config: SelectConfig) -> Result<Self, ConfigError> {
        let type_ahead = config.validate()?;
        Ok(Self {
            config,
            type_ahead,
            ..Self::new(root)
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn registry(&self) -> &SelectRegistry {
        &self.registry
    }

    pub fn select(&self, id: SelectId) -> Option<&SelectInstance> {
        self.registry.get(id)
    }

    /// The select whose hidden field has the given `name`.
    pub fn select_by_name(&self, name: &str) -> Option<&SelectInstance> {
        self.registry.by_input_name(name).and_then(|id| self.registry.get(id))
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Bind one wrapper element.
    ///
    /// Already-bound wrappers return their existing id. Malformed markup is
    /// logged and skipped (None); it never fails the page.
    pub fn initialize(&mut self, wrapper_id: &str) -> Option<SelectId> {
        if let Some(existing) = self.registry.by_wrapper(wrapper_id) {
            log::debug!("[page] #{wrapper_id} already bound to {existing}");
            return Some(existing);
        }

        let id = self.registry.allocate_id();
        match SelectInstance::bind(&mut self.document, wrapper_id, id, &self.config) {
            Ok(instance) => {
                self.registry.insert(instance);
                Some(id)
            }
            Err(err) => {
                log::warn!("[page] skipping custom select: {err}");
                None
            }
        }
    }

    /// Scan `scope` (inclusive) for wrapper markup and bind every wrapper
    /// not bound yet. Safe to call repeatedly. Returns the new ids.
    pub fn init_within(&mut self, scope: &str) -> Vec<SelectId> {
        let selector = Selector::Class(&self.config.wrapper_class);
        let mut wrappers = Vec::new();
        if self.document.get(scope).is_some_and(|el| selector.matches(el)) {
            wrappers.push(scope.to_string());
        }
        wrappers.extend(self.document.query_all(scope, &selector));

        let mut bound = Vec::new();
        for wrapper in wrappers {
            if self.registry.by_wrapper(&wrapper).is_some() {
                continue;
            }
            if let Some(id) = self.initialize(&wrapper) {
                bound.push(id);
            }
        }
        log::debug!("[page] init #{scope}: {} new select(s)", bound.len());
        bound
    }

    /// Scan the whole document.
    pub fn init_all(&mut self) -> Vec<SelectId> {
        let root = self.document.root().id.clone();
        self.init_within(&root)
    }

    /// Copy of a fragment's children, for restoring it later with
    /// [`Page::replace_fragment`].
    pub fn snapshot(&self, fragment_id: &str) -> Option<Vec<Element>> {
        self.document
            .get(fragment_id)
            .map(|el| el.content.children().to_vec())
    }

    /// Replace a fragment's markup wholesale (a form reset).
    ///
    /// Every select inside the fragment is torn down first, then the new
    /// markup is scanned and bound with fresh ids. Returns the new ids.
    pub fn replace_fragment(&mut self, fragment_id: &str, children: Vec<Element>) -> Vec<SelectId> {
        let removed = self
            .registry
            .remove_within(&self.document, fragment_id, &mut self.timers);
        if !removed.is_empty() {
            log::debug!("[page] tore down {removed:?} in #{fragment_id}");
        }

        if !self.document.replace_children(fragment_id, children) {
            log::warn!("[page] fragment #{fragment_id} not found");
            return Vec::new();
        }
        self.init_within(fragment_id)
    }

    /// Tear down a single select. Its markup stays in the document.
    pub fn teardown(&mut self, id: SelectId) -> bool {
        self.registry.remove(id, &mut self.timers).is_some()
    }

    // -------------------------------------------------------------------------
    // Change notifications
    // -------------------------------------------------------------------------

    /// Register a listener called synchronously for every change.
    pub fn on_change(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Take the change notifications emitted since the last drain.
    pub fn drain_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.changes)
    }

    fn emit(&mut self, change: ChangeEvent) {
        for listener in &mut self.listeners {
            listener(&change);
        }
        self.changes.push(change);
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some((timer, task)) = self.timers.pop_due(until) {
            match task {
                SelectTask::ClearSearch(id) => {
                    if let Some(instance) = self.registry.get_mut(id) {
                        if instance.clear_search(timer) {
                            log::trace!("[page] {id} search buffer cleared");
                        }
                    }
                }
            }
        }
        self.timers.advance_to(until);
    }

    // -------------------------------------------------------------------------
    // Event dispatch
    // -------------------------------------------------------------------------

    pub fn dispatch(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key {
                target,
                key,
                modifiers,
            } => self.dispatch_key(target, key, modifiers),
            Event::Click { target, .. } => self.dispatch_click(target),
            Event::Focus { target } => {
                self.document.focus(&target);
                EventResult::Ignored
            }
            Event::Blur { .. } => {
                self.document.blur();
                EventResult::Ignored
            }
        }
    }

    fn dispatch_key(&mut self, target: Option<String>, key: Key, modifiers: Modifiers) -> EventResult {
        let target = target.or_else(|| self.document.focused().map(str::to_string));

        let owner = target.as_deref().and_then(|t| {
            self.registry
                .iter()
                .find(|i| i.handles_keys_on(&self.document, t))
                .map(|i| (i.id(), i.action_for_key(key, modifiers, &self.type_ahead)))
        });

        let result = match owner {
            Some((id, action)) => self.apply(id, action),
            None => EventResult::Ignored,
        };

        if !result.is_consumed() {
            self.default_key_action(key, modifiers);
        }
        result
    }

    /// What the browser does with an unhandled key.
    fn default_key_action(&mut self, key: Key, modifiers: Modifiers) {
        let moved = match key {
            Key::Tab if modifiers.shift => self.document.focus_prev(),
            Key::Tab => self.document.focus_next(),
            Key::BackTab => self.document.focus_prev(),
            _ => None,
        };
        if let Some(new) = moved {
            log::debug!("[page] tab navigation to {new}");
        }
    }

    fn dispatch_click(&mut self, target: Option<String>) -> EventResult {
        if let Some(target) = target.as_deref() {
            if self.document.get(target).is_some_and(Element::is_focusable) {
                self.document.focus(target);
            }

            let hit = self.registry.iter().find_map(|i| {
                i.hit(&self.document, target)
                    .map(|hit| (i.id(), i.action_for_click(hit)))
            });
            if let Some((id, action)) = hit {
                if action != SelectAction::Pass {
                    // Handled by the widget; does not reach the page-level
                    // outside-click check.
                    return self.apply(id, action);
                }
            }
        }

        // Page-level handler: close every open select the click was outside of.
        let outside: Vec<(SelectId, SelectAction)> = self
            .registry
            .iter()
            .filter(|i| {
                target
                    .as_deref()
                    .is_none_or(|t| i.hit(&self.document, t).is_none())
            })
            .map(|i| (i.id(), i.action_for_outside_click()))
            .filter(|(_, action)| *action != SelectAction::Pass)
            .collect();
        for (id, action) in outside {
            self.apply(id, action);
        }
        EventResult::Ignored
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Apply an action to one select. Unknown ids are ignored.
    pub fn apply(&mut self, id: SelectId, action: SelectAction) -> EventResult {
        let Some(open) = self.registry.get(id).map(SelectInstance::is_open) else {
            return EventResult::Ignored;
        };
        log::trace!("[page] {id} {action:?} (open={open})");

        match action {
            SelectAction::Toggle => {
                if open {
                    self.close(id, false);
                } else {
                    self.open_exclusive(id);
                }
            }
            SelectAction::Open => self.open_exclusive(id),
            SelectAction::Step(step) => {
                self.open_exclusive(id);
                if let Some(instance) = self.registry.get_mut(id) {
                    instance.step(&mut self.document, &self.config, step);
                }
            }
            SelectAction::Commit(index) => self.commit(id, index),
            SelectAction::Dismiss(reason) => self.close(id, reason == DismissReason::Escape),
            SelectAction::Search(c) => {
                self.open_exclusive(id);
                if let Some(instance) = self.registry.get_mut(id) {
                    instance.push_search(&mut self.document, &self.config, &mut self.timers, c);
                }
            }
            SelectAction::Noop | SelectAction::Pass => {}
        }

        action.result()
    }

    /// Close every other select, then open this one.
    fn open_exclusive(&mut self, id: SelectId) {
        if self.registry.get(id).is_none_or(|i| i.is_open()) {
            return;
        }
        let closed = self
            .registry
            .close_all_except(&mut self.document, &self.config, Some(id));
        if !closed.is_empty() {
            log::debug!("[page] opening {id} closed {closed:?}");
        }
        if let Some(instance) = self.registry.get_mut(id) {
            instance.open(&mut self.document, &self.config);
        }
    }

    fn close(&mut self, id: SelectId, restore_focus: bool) {
        let Some(instance) = self.registry.get_mut(id) else {
            return;
        };
        instance.close(&mut self.document, &self.config);
        if restore_focus {
            let trigger = instance.parts().trigger.clone();
            self.document.focus(&trigger);
        }
    }

    fn commit(&mut self, id: SelectId, index: usize) {
        let Some(instance) = self.registry.get_mut(id) else {
            return;
        };
        let Some(value) = instance.select(&mut self.document, &self.config, index) else {
            return;
        };
        let parts = instance.parts();
        let change = ChangeEvent {
            select: id,
            input_id: parts.input.clone(),
            name: parts.input_name.clone(),
            value,
        };
        let trigger = parts.trigger.clone();

        self.registry.close_all_except(&mut self.document, &self.config, None);
        self.document.focus(&trigger);
        self.emit(change);
    }
}
