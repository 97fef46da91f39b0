// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Context-threading walker for the castwalk common AST.
//!
//! This crate walks the entity and node trees of
//! [`castwalk_core`] and calls a [`Visitor`] at every step, so IR builders
//! and other analyses only supply hooks.
//!
//! # Overview
//!
//! - **Entity walk**: files, types, functions, scripts and fields, with a
//!   context derived at every file, type and code boundary
//! - **Node walk**: the closed node catalogue, each kind with a fixed child
//!   order and intermediate hooks
//! - **Assignment dispatch**: assignment targets are dispatched on their
//!   lvalue shape instead of being walked as ordinary nodes
//! - **Extensions**: custom entity, node and assignment-target kinds are
//!   routed to registered handlers
//! - **Parent table**: every walk returns the entity to parent mapping it
//!   built
//!
//! # Quick Start
//!
//! ```
//! use castwalk_core::{Entity, Node, NodeKind};
//! use castwalk_visit::{EntityCollector, EntityContext, Walker};
//!
//! let file = Entity::file("a.js").with_global_scoped(
//!     Entity::function("f").with_ast(Node::new(NodeKind::Return, vec![])),
//! );
//!
//! let mut walker = Walker::new(EntityCollector::new());
//! let parents = walker.walk(&file, &EntityContext::new(&file)).unwrap();
//! assert_eq!(parents.len(), 1);
//! assert_eq!(walker.visitor().names(), vec!["a.js", "f"]);
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Walk configuration.
pub mod options;
pub use options::WalkOptions;

/// Visitor traits, the walker and ready-made visitors.
pub mod visitor;
pub use visitor::{
    preorder_entities, AssignHandler, AssignTarget, CollectedEntity, CompoundOrder, Context,
    EntityCollector, EntityContext, EntityHandler, EventRecorder, Extensions, NodeHandler,
    ParentMap, VisitResult, Visitor, WalkEvent, Walker,
};
