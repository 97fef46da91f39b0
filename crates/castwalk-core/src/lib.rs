//! Common AST data model for castwalk.
//!
//! This crate holds the language-neutral tree that per-language translators
//! produce and the walker consumes:
//!
//! - [`Node`] / [`NodeKind`]: the closed node catalogue with its per-kind
//!   child-shape contracts ([`Arity`])
//! - [`Entity`] / [`EntityKind`]: files, types, functions, scripts and fields,
//!   each with a table of nested entities keyed by [`ScopeKey`]
//! - [`Value`] / [`Position`]: literal payloads and diagnostic positions
//! - [`print_node`]: s-expression rendering used in diagnostics
//! - [`WalkError`]: the fatal error type of every walk
//!
//! # Example
//!
//! ```
//! use castwalk_core::{Entity, Node, NodeKind};
//!
//! let body = Node::new(
//!     NodeKind::Assign,
//!     vec![Node::var("y"), Node::constant(1)],
//! );
//! let function = Entity::function("f").with_ast(body);
//! assert_eq!(function.ast().map(|n| n.kind()), Some(NodeKind::Assign));
//! ```

pub mod entity;
pub mod error;
pub mod node;
pub mod print;
pub mod types;

pub use entity::{Entity, EntityId, EntityKind, ScopeKey};
pub use error::WalkError;
pub use node::{Arity, Node, NodeId, NodeKind};
pub use print::print_node;
pub use types::{Position, Value};
