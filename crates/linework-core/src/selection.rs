//! The set of selected entities.

use crate::entity::EntityId;
use std::collections::HashSet;

/// Selected entity ids. Order is irrelevant and ids never repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Duplicates collapse.
    /// Returns true if the selection changed.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = EntityId>) -> bool {
        let ids: HashSet<EntityId> = ids.into_iter().collect();
        if ids == self.ids {
            return false;
        }
        self.ids = ids;
        true
    }

    /// Add ids to the selection.
    /// Returns true if the selection changed.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = EntityId>) -> bool {
        let before = self.ids.len();
        self.ids.extend(ids);
        self.ids.len() != before
    }

    pub fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        self.ids.remove(&id)
    }

    /// Flip membership of an id.
    pub fn toggle(&mut self, id: EntityId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Keep only ids matching the predicate.
    /// Returns true if anything was dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId) -> bool) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| keep(id));
        self.ids.len() != before
    }

    /// Returns true if the selection was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<EntityId> {
        self.ids.iter().copied().collect()
    }
}

impl FromIterator<EntityId> for Selection {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
