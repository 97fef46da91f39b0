//! Error types for tree walks.
//!
//! Every error here is fatal to the walk that raised it: it signals either a
//! translator bug (a malformed node) or a mismatch between what a front end
//! emits and what the active set of extensions understands. The walker never
//! attempts partial recovery, so an incomplete analysis artifact is never
//! produced silently.
//!
//! ## Design
//!
//! - **Unified type**: `WalkError` is the single error type for every walker
//!   operation and extension handler
//! - **Diagnostics**: each variant carries the offending kind and, when the
//!   translator supplied one, the node's source position

use thiserror::Error;

use crate::entity::EntityKind;
use crate::node::{Arity, Node, NodeKind};
use crate::print::print_node;
use crate::types::Position;

// ============================================================================
// Walk Error
// ============================================================================

/// A fatal walk failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalkError {
    /// No closed dispatch arm or entity extension handles this entity kind.
    #[error("cannot handle entity '{name}' of kind {kind}")]
    UnhandledEntity { kind: EntityKind, name: String },

    /// No closed dispatch arm or node extension handles this node kind.
    #[error("cannot handle node of kind {kind}{}", at(.position))]
    UnhandledNode {
        kind: NodeKind,
        position: Option<Position>,
    },

    /// A node's child count does not match its kind's contract.
    #[error("malformed {kind} node{}: expected {expected} children, found {found}", at(.position))]
    MalformedNode {
        kind: NodeKind,
        expected: Arity,
        found: usize,
        position: Option<Position>,
    },

    /// An assignment target matches no lvalue shape and no extension.
    #[error("cannot handle assignment to {target}{}: {rendered}", at(.position))]
    UnsupportedAssignment {
        target: NodeKind,
        rendered: String,
        position: Option<Position>,
    },
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!(" at {}", pos),
        None => String::new(),
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl WalkError {
    /// An unhandled node, with its position if known.
    pub fn unhandled_node(node: &Node) -> Self {
        WalkError::UnhandledNode {
            kind: node.kind(),
            position: node.position().cloned(),
        }
    }

    /// A node whose child count violates `expected`.
    pub fn malformed(node: &Node, expected: Arity) -> Self {
        WalkError::MalformedNode {
            kind: node.kind(),
            expected,
            found: node.child_count(),
            position: node.position().cloned(),
        }
    }

    /// An assignment whose target has no lvalue handling. The whole
    /// assignment expression is rendered for the diagnostic.
    pub fn unsupported_assignment(target: &Node, assign: &Node) -> Self {
        WalkError::UnsupportedAssignment {
            target: target.kind(),
            rendered: print_node(assign),
            position: assign.position().or(target.position()).cloned(),
        }
    }

    /// The name of the offending node or entity kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            WalkError::UnhandledEntity { kind, .. } => kind.as_str(),
            WalkError::UnhandledNode { kind, .. } => kind.as_str(),
            WalkError::MalformedNode { kind, .. } => kind.as_str(),
            WalkError::UnsupportedAssignment { target, .. } => target.as_str(),
        }
    }

    /// The source position of the offending node, if the translator set one.
    pub fn position(&self) -> Option<&Position> {
        match self {
            WalkError::UnhandledEntity { .. } => None,
            WalkError::UnhandledNode { position, .. }
            | WalkError::MalformedNode { position, .. }
            | WalkError::UnsupportedAssignment { position, .. } => position.as_ref(),
        }
    }
}
