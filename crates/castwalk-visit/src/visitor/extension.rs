// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Extension tables for front-end specific entity, node and assignment-target
//! kinds.
//!
//! The walker's dispatch is closed over the built-in catalogue. Kinds outside
//! it ([`EntityKind::Custom`](castwalk_core::EntityKind::Custom) and
//! [`NodeKind::Custom`](castwalk_core::NodeKind::Custom)) are routed to a
//! handler registered here under the kind's name. A handler receives the
//! walker itself, so it can recurse with the public walker operations.
//!
//! A handler returns [`VisitResult::Handled`] when it processed the construct.
//! [`VisitResult::Continue`] means the handler declined it, which the walker
//! treats the same as a missing handler: the walk fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use castwalk_core::{Entity, Node, WalkError};

use super::traits::{VisitResult, Visitor};
use super::walker::Walker;

/// Handler for a custom entity kind.
pub type EntityHandler<'a, V> = Arc<
    dyn Fn(&mut Walker<'a, V>, &'a Entity, &<V as Visitor<'a>>::Context) -> Result<VisitResult, WalkError>
        + Send
        + Sync
        + 'a,
>;

/// Handler for a custom node kind.
pub type NodeHandler<'a, V> = Arc<
    dyn Fn(&mut Walker<'a, V>, &'a Node, &<V as Visitor<'a>>::Context) -> Result<VisitResult, WalkError>
        + Send
        + Sync
        + 'a,
>;

/// Handler for assignments to a custom target kind.
pub type AssignHandler<'a, V> = Arc<
    dyn Fn(&mut Walker<'a, V>, AssignTarget<'a>, &<V as Visitor<'a>>::Context) -> Result<VisitResult, WalkError>
        + Send
        + Sync
        + 'a,
>;

/// The nodes involved in one assignment-target dispatch.
#[derive(Debug, Clone, Copy)]
pub struct AssignTarget<'a> {
    /// The lvalue being dispatched on.
    pub target: &'a Node,
    /// The right-hand side, already visited.
    pub rhs: &'a Node,
    /// The enclosing `Assign`, `AssignPreOp` or `AssignPostOp` node.
    pub assign: &'a Node,
}

/// Handlers for custom kinds, keyed by kind name.
pub struct Extensions<'a, V: Visitor<'a>> {
    pub(crate) entities: HashMap<&'static str, EntityHandler<'a, V>>,
    pub(crate) nodes: HashMap<&'static str, NodeHandler<'a, V>>,
    pub(crate) assign_targets: HashMap<&'static str, AssignHandler<'a, V>>,
}

impl<'a, V: Visitor<'a>> Extensions<'a, V> {
    pub fn new() -> Self {
        Extensions {
            entities: HashMap::new(),
            nodes: HashMap::new(),
            assign_targets: HashMap::new(),
        }
    }

    /// Register the handler for entities of custom kind `kind`.
    pub fn with_entity<F>(mut self, kind: &'static str, handler: F) -> Self
    where
        F: Fn(&mut Walker<'a, V>, &'a Entity, &V::Context) -> Result<VisitResult, WalkError>
            + Send
            + Sync
            + 'a,
    {
        self.entities.insert(kind, Arc::new(handler));
        self
    }

    /// Register the handler for nodes of custom kind `kind`.
    pub fn with_node<F>(mut self, kind: &'static str, handler: F) -> Self
    where
        F: Fn(&mut Walker<'a, V>, &'a Node, &V::Context) -> Result<VisitResult, WalkError>
            + Send
            + Sync
            + 'a,
    {
        self.nodes.insert(kind, Arc::new(handler));
        self
    }

    /// Register the handler for assignments whose target has custom kind `kind`.
    pub fn with_assign_target<F>(mut self, kind: &'static str, handler: F) -> Self
    where
        F: Fn(&mut Walker<'a, V>, AssignTarget<'a>, &V::Context) -> Result<VisitResult, WalkError>
            + Send
            + Sync
            + 'a,
    {
        self.assign_targets.insert(kind, Arc::new(handler));
        self
    }

    pub fn entity_handler(&self, kind: &str) -> Option<EntityHandler<'a, V>> {
        self.entities.get(kind).cloned()
    }

    pub fn node_handler(&self, kind: &str) -> Option<NodeHandler<'a, V>> {
        self.nodes.get(kind).cloned()
    }

    pub fn assign_handler(&self, kind: &str) -> Option<AssignHandler<'a, V>> {
        self.assign_targets.get(kind).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.nodes.is_empty() && self.assign_targets.is_empty()
    }
}

impl<'a, V: Visitor<'a>> Default for Extensions<'a, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V: Visitor<'a>> Clone for Extensions<'a, V> {
    fn clone(&self) -> Self {
        Extensions {
            entities: self.entities.clone(),
            nodes: self.nodes.clone(),
            assign_targets: self.assign_targets.clone(),
        }
    }
}

impl<'a, V: Visitor<'a>> fmt::Debug for Extensions<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entities: Vec<_> = self.entities.keys().collect();
        let mut nodes: Vec<_> = self.nodes.keys().collect();
        let mut assign_targets: Vec<_> = self.assign_targets.keys().collect();
        entities.sort();
        nodes.sort();
        assign_targets.sort();
        f.debug_struct("Extensions")
            .field("entities", &entities)
            .field("nodes", &nodes)
            .field("assign_targets", &assign_targets)
            .finish()
    }
}
