// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The entity parent side-table built during a walk.

use std::collections::HashMap;

use castwalk_core::{Entity, EntityId};

/// Maps each nested entity visited during a walk to the entity that declared it.
///
/// The table is owned by one walk. The root entity of a walk has no parent.
#[derive(Debug, Default, Clone)]
pub struct ParentMap<'a> {
    parents: HashMap<EntityId, &'a Entity>,
}

impl<'a> ParentMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parent recorded for `entity`, if any.
    pub fn get(&self, entity: &Entity) -> Option<&'a Entity> {
        self.parents.get(&entity.id()).copied()
    }

    /// Record `parent` as the parent of `child`.
    ///
    /// An entity reachable from two parents keeps the most recent one.
    pub fn set(&mut self, child: &'a Entity, parent: &'a Entity) {
        if let Some(previous) = self.parents.insert(child.id(), parent) {
            if previous.id() != parent.id() {
                tracing::warn!(
                    entity = child.name(),
                    previous = previous.name(),
                    parent = parent.name(),
                    "entity re-parented"
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Iterate over (child id, parent) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &'a Entity)> + '_ {
        self.parents.iter().map(|(id, parent)| (*id, *parent))
    }

    /// The chain of enclosing entities of `entity`, innermost first.
    pub fn ancestors(&self, entity: &Entity) -> Vec<&'a Entity> {
        let mut chain = Vec::new();
        let mut current = self.parents.get(&entity.id()).copied();
        while let Some(parent) = current {
            // A cycle can only come from a malformed scope table.
            if chain.iter().any(|seen: &&Entity| seen.id() == parent.id()) {
                break;
            }
            chain.push(parent);
            current = self.parents.get(&parent.id()).copied();
        }
        chain
    }
}
