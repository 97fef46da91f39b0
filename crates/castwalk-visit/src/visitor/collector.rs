// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! EntityCollector visitor and the pre-order entity flattening.
//!
//! [`EntityCollector`] records entities in the order a walk reaches them,
//! together with the parent the walk recorded. [`preorder_entities`]
//! computes the same order directly from the tree without a walker, which
//! makes it the independent reference for the walker's entity order:
//!
//! - file and type entities: all nested entities, scope by scope
//! - function and script entities: the body, with the entities scoped to a
//!   node placed right after that node, then the globally scoped entities
//!
//! ```
//! use castwalk_core::{Entity, Node, NodeKind};
//! use castwalk_visit::{preorder_entities, EntityCollector};
//!
//! let decl = Node::leaf(NodeKind::FunctionStmt);
//! let decl_id = decl.id();
//! let script = Entity::script("main.js")
//!     .with_ast(Node::new(NodeKind::BlockStmt, vec![decl]))
//!     .with_node_scoped(decl_id, Entity::function("helper"))
//!     .with_global_scoped(Entity::function("later"));
//!
//! let collector = EntityCollector::collect(&script).unwrap();
//! assert_eq!(collector.names(), vec!["main.js", "helper", "later"]);
//!
//! let expected: Vec<_> = preorder_entities(&script).iter().map(|e| e.name()).collect();
//! assert_eq!(collector.names(), expected);
//! ```

use castwalk_core::{Entity, EntityKind, Node, NodeKind, ScopeKey, WalkError};

use super::context::EntityContext;
use super::parents::ParentMap;
use super::traits::{VisitResult, Visitor};
use super::walker::Walker;

/// One entity reached by a walk.
#[derive(Debug, Clone, Copy)]
pub struct CollectedEntity<'a> {
    pub entity: &'a Entity,
    /// The parent recorded when the entity was entered; `None` for the root.
    pub parent: Option<&'a Entity>,
}

/// A visitor that records entities in visitation order.
///
/// Code entities get a context whose top is the entity itself, so the
/// entities scoped to nodes of a nested function's body are found.
#[derive(Debug, Default, Clone)]
pub struct EntityCollector<'a> {
    entities: Vec<CollectedEntity<'a>>,
}

impl<'a> EntityCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` with a fresh collector.
    pub fn collect(root: &'a Entity) -> Result<Self, WalkError> {
        let mut walker = Walker::new(EntityCollector::new());
        walker.walk(root, &EntityContext::new(root))?;
        Ok(walker.into_visitor())
    }

    pub fn collected(&self) -> &[CollectedEntity<'a>] {
        &self.entities
    }

    pub fn entities(&self) -> Vec<&'a Entity> {
        self.entities.iter().map(|c| c.entity).collect()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.entities.iter().map(|c| c.entity.name()).collect()
    }

    /// (entity, parent) name pairs in visitation order.
    pub fn parent_names(&self) -> Vec<(&'a str, Option<&'a str>)> {
        self.entities
            .iter()
            .map(|c| (c.entity.name(), c.parent.map(|p| p.name())))
            .collect()
    }
}

impl<'a> Visitor<'a> for EntityCollector<'a> {
    type Context = EntityContext<'a>;

    fn make_file_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        EntityContext::new(entity)
    }

    fn make_type_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        EntityContext::new(entity)
    }

    fn make_code_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        EntityContext::new(entity)
    }

    fn enter_entity(&mut self, entity: &'a Entity, _context: &Self::Context, parents: &ParentMap<'a>) -> VisitResult {
        self.entities.push(CollectedEntity {
            entity,
            parent: parents.get(entity),
        });
        VisitResult::Continue
    }
}

// ============================================================================
// Pre-order flattening
// ============================================================================

/// Flatten the entity tree under `root` in walk order, without walking.
///
/// Custom entity and node kinds contribute nothing below themselves.
pub fn preorder_entities(root: &Entity) -> Vec<&Entity> {
    let mut out = Vec::new();
    flatten_entity(root, &mut out);
    out
}

fn flatten_entity<'a>(entity: &'a Entity, out: &mut Vec<&'a Entity>) {
    out.push(entity);
    match entity.kind() {
        EntityKind::File | EntityKind::Type => {
            for child in entity.all_scoped_entities() {
                flatten_entity(child, out);
            }
        }
        EntityKind::Function | EntityKind::Script => {
            if let Some(ast) = entity.ast() {
                flatten_node(entity, ast, out);
            }
            for child in entity.scoped_entities(ScopeKey::Global) {
                flatten_entity(child, out);
            }
        }
        EntityKind::Field | EntityKind::Custom(_) => {}
    }
}

fn flatten_node<'a>(top: &'a Entity, node: &'a Node, out: &mut Vec<&'a Entity>) {
    for index in node.kind().traversed_children(node.child_count()) {
        if let Some(child) = node.child(index) {
            flatten_node(top, child, out);
        }
    }
    if node.kind().is_assignment() {
        if let Some(target) = node.child(0) {
            flatten_target(top, target, out);
        }
    }
    for entity in top.scoped_entities(ScopeKey::Node(node.id())) {
        flatten_entity(entity, out);
    }
}

/// Lvalue targets are not nodes of their own walk step, so only their
/// traversed sub-expressions contribute.
fn flatten_target<'a>(top: &'a Entity, target: &'a Node, out: &mut Vec<&'a Entity>) {
    match target.kind() {
        NodeKind::ArrayRef => {
            let indices = std::iter::once(0).chain(2..target.child_count());
            for child in indices.filter_map(|i| target.child(i)) {
                flatten_node(top, child, out);
            }
        }
        NodeKind::ObjectRef => {
            if let Some(object) = target.child(0) {
                flatten_node(top, object, out);
            }
        }
        NodeKind::BlockExpr => {
            if let Some(last) = target.last_child() {
                flatten_target(top, last, out);
            }
        }
        _ => {}
    }
}
