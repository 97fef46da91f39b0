//! The closed node catalogue and the immutable [`Node`] tree.
//!
//! Every node kind has a fixed child-shape contract ([`Arity`]). Translators
//! are responsible for honoring it; the walker reports a violation as a fatal
//! [`WalkError::MalformedNode`](crate::WalkError::MalformedNode).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{Position, Value};

// ============================================================================
// Node Kinds
// ============================================================================

/// The kind of a common-AST node.
///
/// All kinds except [`NodeKind::Custom`] are handled by the walker's closed
/// dispatch. Custom kinds are routed to extension handlers registered under
/// their name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    FunctionExpr,
    FunctionStmt,
    LocalScope,
    BlockExpr,
    BlockStmt,
    Loop,
    GetCaughtException,
    This,
    Super,
    Call,
    Var,
    Constant,
    BinaryExpr,
    UnaryExpr,
    ArrayLength,
    ArrayRef,
    DeclStmt,
    Return,
    IfGoto,
    Goto,
    LabelStmt,
    IfStmt,
    IfExpr,
    New,
    ObjectLiteral,
    ArrayLiteral,
    ObjectRef,
    Assign,
    AssignPreOp,
    AssignPostOp,
    Switch,
    Throw,
    Catch,
    Unwind,
    Try,
    Empty,
    Primitive,
    Void,
    Cast,
    InstanceOf,
    Assert,
    EachElementGet,
    EachElementHasNext,
    TypeLiteralExpr,
    /// A front-end specific kind, identified by name.
    Custom(&'static str),
}

impl NodeKind {
    /// Returns the name used in diagnostics and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::FunctionExpr => "FunctionExpr",
            NodeKind::FunctionStmt => "FunctionStmt",
            NodeKind::LocalScope => "LocalScope",
            NodeKind::BlockExpr => "BlockExpr",
            NodeKind::BlockStmt => "BlockStmt",
            NodeKind::Loop => "Loop",
            NodeKind::GetCaughtException => "GetCaughtException",
            NodeKind::This => "This",
            NodeKind::Super => "Super",
            NodeKind::Call => "Call",
            NodeKind::Var => "Var",
            NodeKind::Constant => "Constant",
            NodeKind::BinaryExpr => "BinaryExpr",
            NodeKind::UnaryExpr => "UnaryExpr",
            NodeKind::ArrayLength => "ArrayLength",
            NodeKind::ArrayRef => "ArrayRef",
            NodeKind::DeclStmt => "DeclStmt",
            NodeKind::Return => "Return",
            NodeKind::IfGoto => "IfGoto",
            NodeKind::Goto => "Goto",
            NodeKind::LabelStmt => "LabelStmt",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::IfExpr => "IfExpr",
            NodeKind::New => "New",
            NodeKind::ObjectLiteral => "ObjectLiteral",
            NodeKind::ArrayLiteral => "ArrayLiteral",
            NodeKind::ObjectRef => "ObjectRef",
            NodeKind::Assign => "Assign",
            NodeKind::AssignPreOp => "AssignPreOp",
            NodeKind::AssignPostOp => "AssignPostOp",
            NodeKind::Switch => "Switch",
            NodeKind::Throw => "Throw",
            NodeKind::Catch => "Catch",
            NodeKind::Unwind => "Unwind",
            NodeKind::Try => "Try",
            NodeKind::Empty => "Empty",
            NodeKind::Primitive => "Primitive",
            NodeKind::Void => "Void",
            NodeKind::Cast => "Cast",
            NodeKind::InstanceOf => "InstanceOf",
            NodeKind::Assert => "Assert",
            NodeKind::EachElementGet => "EachElementGet",
            NodeKind::EachElementHasNext => "EachElementHasNext",
            NodeKind::TypeLiteralExpr => "TypeLiteralExpr",
            NodeKind::Custom(name) => name,
        }
    }

    /// Returns true for the three assignment-family kinds.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            NodeKind::Assign | NodeKind::AssignPreOp | NodeKind::AssignPostOp
        )
    }

    /// Returns the child-shape contract for this kind.
    ///
    /// Custom kinds have no contract known to the core and return `None`.
    pub fn arity(&self) -> Option<Arity> {
        let arity = match self {
            NodeKind::FunctionExpr
            | NodeKind::FunctionStmt
            | NodeKind::BlockExpr
            | NodeKind::BlockStmt
            | NodeKind::GetCaughtException
            | NodeKind::This
            | NodeKind::Super
            | NodeKind::Var
            | NodeKind::Constant
            | NodeKind::Goto
            | NodeKind::Empty
            | NodeKind::Primitive
            | NodeKind::Void => Arity::Any,
            NodeKind::LocalScope
            | NodeKind::ArrayLength
            | NodeKind::Throw
            | NodeKind::TypeLiteralExpr => Arity::Exactly(1),
            NodeKind::Loop
            | NodeKind::UnaryExpr
            | NodeKind::ObjectRef
            | NodeKind::Assign
            | NodeKind::Unwind
            | NodeKind::Try
            | NodeKind::Cast
            | NodeKind::InstanceOf => Arity::Exactly(2),
            NodeKind::BinaryExpr | NodeKind::AssignPreOp | NodeKind::AssignPostOp => {
                Arity::Exactly(3)
            }
            NodeKind::Call | NodeKind::ArrayRef | NodeKind::Switch => Arity::AtLeast(2),
            NodeKind::New
            | NodeKind::ArrayLiteral
            | NodeKind::Catch
            | NodeKind::EachElementGet
            | NodeKind::EachElementHasNext => Arity::AtLeast(1),
            NodeKind::DeclStmt => Arity::Between(3, 4),
            NodeKind::Return => Arity::Between(0, 1),
            NodeKind::LabelStmt | NodeKind::Assert => Arity::Between(1, 2),
            NodeKind::IfStmt | NodeKind::IfExpr => Arity::Between(2, 3),
            NodeKind::IfGoto => Arity::Either(1, 3),
            NodeKind::ObjectLiteral => Arity::Pairs,
            NodeKind::Custom(_) => return None,
        };
        Some(arity)
    }

    /// Returns the indices of the children the walker visits as ordinary
    /// (rvalue) nodes, in visitation order, for a node with `count` children.
    ///
    /// For assignment kinds this is only the right-hand side; the target is
    /// routed through the assignment dispatcher. Custom kinds return nothing.
    pub fn traversed_children(&self, count: usize) -> Vec<usize> {
        let upto = |start: usize, end: usize| (start..end.min(count)).collect::<Vec<_>>();
        match self {
            NodeKind::BlockExpr
            | NodeKind::BlockStmt
            | NodeKind::ObjectLiteral
            | NodeKind::ArrayLiteral => upto(0, count),
            NodeKind::LocalScope
            | NodeKind::ArrayLength
            | NodeKind::ObjectRef
            | NodeKind::Throw
            | NodeKind::Return
            | NodeKind::Assert
            | NodeKind::EachElementGet
            | NodeKind::EachElementHasNext
            | NodeKind::TypeLiteralExpr => upto(0, 1),
            NodeKind::Loop
            | NodeKind::Unwind
            | NodeKind::Try
            | NodeKind::Switch
            | NodeKind::LabelStmt => upto(0, 2),
            NodeKind::IfStmt | NodeKind::IfExpr => upto(0, 3),
            NodeKind::Call | NodeKind::ArrayRef => {
                let mut indices = upto(0, 1);
                indices.extend(upto(2, count));
                indices
            }
            NodeKind::BinaryExpr => upto(1, 3),
            NodeKind::UnaryExpr
            | NodeKind::Cast
            | NodeKind::InstanceOf
            | NodeKind::Assign
            | NodeKind::AssignPreOp
            | NodeKind::AssignPostOp => upto(1, 2),
            NodeKind::New | NodeKind::Catch => upto(1, count),
            NodeKind::DeclStmt => upto(3, 4),
            NodeKind::IfGoto => match count {
                1 => vec![0],
                3 => vec![1, 2],
                _ => Vec::new(),
            },
            NodeKind::FunctionExpr
            | NodeKind::FunctionStmt
            | NodeKind::GetCaughtException
            | NodeKind::This
            | NodeKind::Super
            | NodeKind::Var
            | NodeKind::Constant
            | NodeKind::Goto
            | NodeKind::Empty
            | NodeKind::Primitive
            | NodeKind::Void
            | NodeKind::Custom(_) => Vec::new(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Arity
// ============================================================================

/// The child-count contract of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Any number of children.
    Any,
    /// Exactly this many children.
    Exactly(usize),
    /// At least this many children.
    AtLeast(usize),
    /// An inclusive range of child counts.
    Between(usize, usize),
    /// One of two specific child counts.
    Either(usize, usize),
    /// One leading child followed by key/value pairs.
    Pairs,
}

impl Arity {
    /// Returns true if a node with `count` children satisfies this contract.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Any => true,
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::Either(a, b) => count == a || count == b,
            Arity::Pairs => count >= 1 && (count - 1) % 2 == 0,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Any => write!(f, "any number of"),
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Between(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::Either(a, b) => write!(f, "{} or {}", a, b),
            Arity::Pairs => write!(f, "1 plus key/value pairs of"),
        }
    }
}

// ============================================================================
// Node Identity
// ============================================================================

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a node.
///
/// Scope tables refer to nodes by id, so two structurally identical nodes are
/// still distinct scope keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ============================================================================
// Node
// ============================================================================

/// An immutable common-AST node.
///
/// A node exclusively owns its children. Nodes are deliberately not `Clone`:
/// a copy would share the identity of the original.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    children: Vec<Node>,
    value: Option<Value>,
    position: Option<Position>,
}

impl Node {
    /// Create a node of `kind` with the given children.
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Node {
            id: NodeId::fresh(),
            kind,
            children,
            value: None,
            position: None,
        }
    }

    /// Create a node with no children.
    pub fn leaf(kind: NodeKind) -> Self {
        Node::new(kind, Vec::new())
    }

    /// Create a constant node.
    pub fn constant(value: impl Into<Value>) -> Self {
        Node::leaf(NodeKind::Constant).with_value(value)
    }

    /// Create a variable reference carrying its symbol name.
    pub fn var(name: impl Into<String>) -> Self {
        Node::leaf(NodeKind::Var).with_value(Value::Str(name.into()))
    }

    /// Create an operator child, as used in slot 0 of binary/unary
    /// expressions and slot 2 of compound assignments.
    pub fn operator(op: &str) -> Self {
        Node::constant(op)
    }

    /// Attach a literal payload.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a source position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.children.last()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Returns true if the child count satisfies the kind's contract.
    ///
    /// Custom kinds are always considered well formed.
    pub fn is_well_formed(&self) -> bool {
        self.kind
            .arity()
            .is_none_or(|arity| arity.accepts(self.children.len()))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::print::write_node(f, self)
    }
}
