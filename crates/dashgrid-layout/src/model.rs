#![forbid(unsafe_code)]

//! The authoritative, ordered component collection.
//!
//! # Invariants
//!
//! 1. `index[id]` is the position of `id` in `components` for every id.
//! 2. Ids are unique.
//! 3. `generation` strictly increases on every mutation, including no-op
//!    rect writes; derived projections compare generations to invalidate.
//! 4. Only [`GridModel::replace_all`] changes collection order (besides
//!    append and compaction on remove).
//!
//! # Failure Modes
//!
//! None. Unknown ids are ignored and reported through the return value.

use dashgrid_core::geometry::GridRect;
use rustc_hash::FxHashMap;

use crate::component::{Component, ComponentId};

/// Ordered component storage with id lookup.
#[derive(Debug, Clone, Default)]
pub struct GridModel {
    components: Vec<Component>,
    index: FxHashMap<ComponentId, usize>,
    generation: u64,
}

impl GridModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from an arrangement. Later duplicates of an id are dropped.
    #[must_use]
    pub fn from_components(components: Vec<Component>) -> Self {
        let mut model = Self::new();
        model.replace_all(components);
        model
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Mutation counter.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Components in collection order.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.index.get(id).map(|&i| &self.components[i])
    }

    pub fn rect(&self, id: &ComponentId) -> Option<GridRect> {
        self.get(id).map(|c| c.rect)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.index.contains_key(id)
    }

    /// Append a component. Returns `false` (and changes nothing) if the id
    /// is already present.
    pub fn push(&mut self, component: Component) -> bool {
        if self.index.contains_key(&component.id) {
            return false;
        }
        self.index.insert(component.id.clone(), self.components.len());
        self.components.push(component);
        self.bump();
        true
    }

    /// Remove a component, compacting the collection.
    pub fn remove(&mut self, id: &ComponentId) -> Option<Component> {
        let pos = self.index.remove(id)?;
        let removed = self.components.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        self.bump();
        Some(removed)
    }

    /// Overwrite one component's rect. Returns `false` for unknown ids.
    pub fn set_rect(&mut self, id: &ComponentId, rect: GridRect) -> bool {
        let Some(&pos) = self.index.get(id) else {
            return false;
        };
        self.components[pos].rect = rect;
        self.bump();
        true
    }

    /// Copy rects by id from `arrangement` without changing order. Ids
    /// missing from the model are skipped. Returns the number applied.
    pub fn apply_rects(&mut self, arrangement: &[Component]) -> usize {
        let mut applied = 0;
        for comp in arrangement {
            if let Some(&pos) = self.index.get(&comp.id) {
                self.components[pos].rect = comp.rect;
                applied += 1;
            }
        }
        self.bump();
        applied
    }

    /// Replace the whole collection, adopting the new order.
    pub fn replace_all(&mut self, arrangement: Vec<Component>) {
        self.components.clear();
        self.index.clear();
        for comp in arrangement {
            if self.index.contains_key(&comp.id) {
                continue;
            }
            self.index.insert(comp.id.clone(), self.components.len());
            self.components.push(comp);
        }
        self.bump();
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.index.clear();
        self.bump();
    }

    /// Clone of the current arrangement.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Component> {
        self.components.clone()
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
