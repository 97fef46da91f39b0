//! S-expression rendering of node trees for diagnostics.
//!
//! ```
//! use castwalk_core::{print_node, Node, NodeKind};
//!
//! let assign = Node::new(NodeKind::Assign, vec![Node::var("x"), Node::constant(1)]);
//! assert_eq!(print_node(&assign), r#"(Assign (Var "x") (Constant 1))"#);
//! ```

use std::fmt::{self, Write};

use crate::node::Node;

/// Render a node and its subtree on a single line.
pub fn print_node(node: &Node) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_node(&mut out, node);
    out
}

pub(crate) fn write_node<W: Write>(out: &mut W, node: &Node) -> fmt::Result {
    write!(out, "({}", node.kind())?;
    if let Some(value) = node.value() {
        write!(out, " {}", value)?;
    }
    for child in node.children() {
        out.write_char(' ')?;
        write_node(out, child)?;
    }
    out.write_char(')')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn test_print_nested() {
        let node = Node::new(
            NodeKind::BinaryExpr,
            vec![Node::operator("+"), Node::var("a"), Node::constant(2)],
        );
        assert_eq!(
            print_node(&node),
            r#"(BinaryExpr (Constant "+") (Var "a") (Constant 2))"#
        );
    }

    #[test]
    fn test_display_matches_print() {
        let node = Node::leaf(NodeKind::This);
        assert_eq!(node.to_string(), print_node(&node));
        assert_eq!(node.to_string(), "(This)");
    }
}
