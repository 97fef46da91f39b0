// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for common-AST traversal.
//!
//! A [`Walker`] owns one [`Visitor`] and drives it over an entity tree. The
//! visitor supplies hooks; the walker supplies the recursion, the parent
//! side-table and routing of custom kinds to [`Extensions`].
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children in the order each node kind defines, with intermediate hooks
//!   (`leave_if_stmt_condition`, `leave_try_block`, ...) between them
//! - Entities scoped to a node right after that node
//!
//! # Visitor Pattern
//!
//! ```
//! use castwalk_core::{Entity, Node, NodeKind};
//! use castwalk_visit::{EntityContext, VisitResult, Visitor, Walker};
//!
//! #[derive(Default)]
//! struct CallCounter {
//!     calls: usize,
//! }
//!
//! impl<'a> Visitor<'a> for CallCounter {
//!     type Context = EntityContext<'a>;
//!
//!     fn visit_call(&mut self, _node: &'a Node, _context: &Self::Context) -> VisitResult {
//!         self.calls += 1;
//!         VisitResult::Continue
//!     }
//! }
//!
//! let call = Node::new(
//!     NodeKind::Call,
//!     vec![Node::var("print"), Node::constant("site"), Node::constant(1)],
//! );
//! let script = Entity::script("main.js").with_ast(call);
//!
//! let mut walker = Walker::new(CallCounter::default());
//! walker.walk(&script, &EntityContext::new(&script)).unwrap();
//! assert_eq!(walker.visitor().calls, 1);
//! ```

mod assign;
mod collector;
mod context;
mod dispatch;
mod extension;
mod parents;
mod recorder;
mod traits;
mod walker;

pub use collector::{preorder_entities, CollectedEntity, EntityCollector};
pub use context::{Context, EntityContext};
pub use extension::{AssignHandler, AssignTarget, EntityHandler, Extensions, NodeHandler};
pub use parents::ParentMap;
pub use recorder::{EventRecorder, WalkEvent};
pub use traits::{CompoundOrder, VisitResult, Visitor};
pub use walker::Walker;
