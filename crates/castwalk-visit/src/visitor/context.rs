// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The context protocol threaded through a walk.
//!
//! A context is whatever scope or lexical bookkeeping a visitor needs. The
//! walker only ever asks one thing of it: which entity currently encloses the
//! code being walked. That entity's scope table is where node-scoped
//! declarations are looked up.

use std::sync::atomic::{AtomicU64, Ordering};

use castwalk_core::Entity;

/// The capability every walk context provides.
pub trait Context<'a> {
    /// The entity whose scope table holds the declarations of the code
    /// currently being walked.
    fn top(&self) -> &'a Entity;
}

impl<'a> Context<'a> for &'a Entity {
    fn top(&self) -> &'a Entity {
        self
    }
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// A context holding the enclosing entity and a process-unique serial.
///
/// Every call to [`EntityContext::new`] or [`EntityContext::derive`] produces a
/// distinct serial, so two contexts compare equal only if one is a clone of
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityContext<'a> {
    top: &'a Entity,
    serial: u64,
}

impl<'a> EntityContext<'a> {
    /// A fresh context whose enclosing entity is `top`.
    pub fn new(top: &'a Entity) -> Self {
        EntityContext {
            top,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// A fresh context with the same enclosing entity.
    pub fn derive(&self) -> Self {
        EntityContext::new(self.top)
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl<'a> Context<'a> for EntityContext<'a> {
    fn top(&self) -> &'a Entity {
        self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_reference_is_a_context() {
        let entity = Entity::file("a.js");
        let context = &entity;
        assert_eq!(context.top().name(), "a.js");
    }

    #[test]
    fn test_derived_context_keeps_top_with_new_serial() {
        let entity = Entity::function("f");
        let outer = EntityContext::new(&entity);
        let inner = outer.derive();
        assert_eq!(inner.top(), outer.top());
        assert_ne!(inner.serial(), outer.serial());
        assert_ne!(inner, outer);
        assert_eq!(outer.clone(), outer);
    }
}
