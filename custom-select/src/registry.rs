//! Registry of the live select instances on a page.

use pagedom::{Document, TimerQueue};

use crate::config::SelectConfig;
use crate::select::{SelectId, SelectInstance, SelectTask};

/// Ordered collection of live selects.
///
/// The registry is the only place that sees every instance, so it owns the
/// page-wide rule that at most one select is open at a time.
#[derive(Debug, Default)]
pub struct SelectRegistry {
    /// Live instances in binding order.
    instances: Vec<SelectInstance>,
    /// Next index to hand out. Only ever grows.
    next_index: usize,
}

impl SelectRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh id. Ids are never reused, even after teardown.
    pub fn allocate_id(&mut self) -> SelectId {
        let id = SelectId::new(self.next_index);
        self.next_index += 1;
        id
    }

    pub fn insert(&mut self, instance: SelectInstance) {
        self.instances.push(instance);
    }

    pub fn get(&self, id: SelectId) -> Option<&SelectInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: SelectId) -> Option<&mut SelectInstance> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    /// Instance bound to the given wrapper element.
    pub fn by_wrapper(&self, wrapper_id: &str) -> Option<SelectId> {
        self.instances
            .iter()
            .find(|i| i.parts().wrapper == wrapper_id)
            .map(SelectInstance::id)
    }

    /// Instance whose hidden field has the given `name`.
    pub fn by_input_name(&self, name: &str) -> Option<SelectId> {
        self.instances
            .iter()
            .find(|i| i.parts().input_name.as_deref() == Some(name))
            .map(SelectInstance::id)
    }

    pub fn ids(&self) -> Vec<SelectId> {
        self.instances.iter().map(SelectInstance::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Ids of the instances currently open. Holds at most one entry.
    pub fn open_ids(&self) -> Vec<SelectId> {
        self.instances
            .iter()
            .filter(|i| i.is_open())
            .map(SelectInstance::id)
            .collect()
    }

    /// Force every instance except `except` closed.
    ///
    /// Must complete before the excepted instance opens. Returns the ids
    /// that were actually open.
    pub fn close_all_except(
        &mut self,
        doc: &mut Document,
        config: &SelectConfig,
        except: Option<SelectId>,
    ) -> Vec<SelectId> {
        let mut closed = Vec::new();
        for instance in &mut self.instances {
            if Some(instance.id()) == except {
                continue;
            }
            if instance.close(doc, config) {
                closed.push(instance.id());
            }
        }
        closed
    }

    /// Tear down and drop one instance.
    pub fn remove(&mut self, id: SelectId, timers: &mut TimerQueue<SelectTask>) -> Option<SelectInstance> {
        let pos = self.instances.iter().position(|i| i.id() == id)?;
        let mut instance = self.instances.remove(pos);
        instance.teardown(timers);
        Some(instance)
    }

    /// Tear down every instance whose wrapper lies inside `scope` (inclusive).
    /// Call before the scope's markup is replaced.
    pub fn remove_within(
        &mut self,
        doc: &Document,
        scope: &str,
        timers: &mut TimerQueue<SelectTask>,
    ) -> Vec<SelectId> {
        let doomed: Vec<SelectId> = self
            .instances
            .iter()
            .filter(|i| doc.contains(scope, &i.parts().wrapper))
            .map(SelectInstance::id)
            .collect();
        for id in &doomed {
            self.remove(*id, timers);
        }
        doomed
    }
}
