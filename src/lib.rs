//! castwalk: a traversal engine for a language-neutral common AST.
//!
//! Per-language translators produce [`Entity`] trees whose bodies are
//! [`Node`] trees. A [`Walker`] drives a [`Visitor`] over them, threading an
//! analysis-specific context and calling a hook at every step, so IR builders
//! only supply the hooks they care about.
//!
//! This crate re-exports the workspace members:
//!
//! - [`ast`] (`castwalk-core`): the node and entity catalogue, printer and
//!   [`WalkError`]
//! - [`visit`] (`castwalk-visit`): the walker, visitor traits, extensions,
//!   options and ready-made visitors
//!
//! # Example
//!
//! ```
//! use castwalk::{walk, Entity, EntityCollector, EntityContext, Node, NodeKind};
//!
//! let stmt = Node::leaf(NodeKind::FunctionStmt);
//! let stmt_id = stmt.id();
//! let script = Entity::script("main.js")
//!     .with_ast(Node::new(NodeKind::BlockStmt, vec![stmt]))
//!     .with_node_scoped(stmt_id, Entity::function("helper"));
//!
//! let (collector, parents) =
//!     walk(EntityCollector::new(), &script, &EntityContext::new(&script)).unwrap();
//! assert_eq!(collector.names(), vec!["main.js", "helper"]);
//! assert_eq!(parents.len(), 1);
//! ```

pub use castwalk_core as ast;
pub use castwalk_visit as visit;

pub use castwalk_core::{
    print_node, Arity, Entity, EntityId, EntityKind, Node, NodeId, NodeKind, Position, ScopeKey,
    Value, WalkError,
};
pub use castwalk_visit::{
    preorder_entities, AssignTarget, CompoundOrder, Context, EntityCollector, EntityContext,
    EventRecorder, Extensions, ParentMap, VisitResult, Visitor, WalkEvent, WalkOptions, Walker,
};

/// Walk `root` with `visitor` under default options and no extensions.
///
/// Returns the visitor, with whatever it accumulated, and the parent table.
pub fn walk<'a, V: Visitor<'a>>(
    visitor: V,
    root: &'a Entity,
    context: &V::Context,
) -> Result<(V, ParentMap<'a>), WalkError> {
    let mut walker = Walker::new(visitor);
    let parents = walker.walk(root, context)?;
    Ok((walker.into_visitor(), parents))
}
