// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Assignment-target dispatch.
//!
//! The target of an `Assign`, `AssignPreOp` or `AssignPostOp` node is not
//! walked as an ordinary node. It is dispatched on its lvalue shape instead:
//!
//! | Target | Visited as lvalue |
//! |---|---|
//! | `ArrayRef` | child 0, then children 2.. |
//! | `ObjectRef` | child 0 |
//! | `BlockExpr` | the last child, dispatched again as a target |
//! | `Var` | nothing |
//!
//! Every other target kind is looked up by name in the assignment-target
//! extension table.

use castwalk_core::{Arity, Node, NodeKind, WalkError};

use super::dispatch::{child, malformed};
use super::extension::AssignTarget;
use super::traits::{CompoundOrder, VisitResult, Visitor};
use super::walker::Walker;

/// Call the plain or the compound variant of a target hook.
macro_rules! target_hook {
    ($self:ident . $plain:ident / $compound:ident ($target:expr, $rhs:expr, $assign:expr, $order:expr, $context:expr)) => {
        match $order {
            None => $self.visitor.$plain($target, $rhs, $assign, $context),
            Some(order) => $self.visitor.$compound($target, $rhs, $assign, order, $context),
        }
    };
}

/// The compound order of an assignment node, or `None` for a plain one.
///
/// Kinds other than the three assignment kinds count as post-op.
pub(crate) fn compound_order(assign: &Node) -> Option<CompoundOrder> {
    match assign.kind() {
        NodeKind::Assign => None,
        NodeKind::AssignPreOp => Some(CompoundOrder::Pre),
        _ => Some(CompoundOrder::Post),
    }
}

impl<'a, V: Visitor<'a>> Walker<'a, V> {
    /// Dispatch `target` on its lvalue shape.
    ///
    /// `rhs` is the already visited right-hand side and `assign` the
    /// enclosing assignment node. Returns `Handled` if a target visit hook
    /// short-circuited, in which case the caller skips `leave_assign`.
    ///
    /// # Errors
    ///
    /// Fails with [`WalkError::UnsupportedAssignment`] when the target has
    /// no lvalue shape and no extension handles it.
    pub fn dispatch_assign_target(
        &mut self,
        target: &'a Node,
        context: &V::Context,
        rhs: &'a Node,
        assign: &'a Node,
    ) -> Result<VisitResult, WalkError> {
        let order = compound_order(assign);
        tracing::trace!(
            target = %target.kind(),
            id = %target.id(),
            assign = %assign.kind(),
            "dispatch assignment target"
        );

        match target.kind() {
            NodeKind::ArrayRef => {
                self.check_arity(target)?;
                if target_hook!(self.visit_array_ref_assign / visit_array_ref_assign_op(
                    target, rhs, assign, order, context
                ))
                .is_handled()
                {
                    return Ok(VisitResult::Handled);
                }
                self.visit(child(target, 0)?, context)?;
                self.visit_children(target, 2, context)?;
                target_hook!(self.leave_array_ref_assign / leave_array_ref_assign_op(
                    target, rhs, assign, order, context
                ));
            }
            NodeKind::ObjectRef => {
                self.check_arity(target)?;
                if target_hook!(self.visit_object_ref_assign / visit_object_ref_assign_op(
                    target, rhs, assign, order, context
                ))
                .is_handled()
                {
                    return Ok(VisitResult::Handled);
                }
                self.visit(child(target, 0)?, context)?;
                target_hook!(self.leave_object_ref_assign / leave_object_ref_assign_op(
                    target, rhs, assign, order, context
                ));
            }
            NodeKind::BlockExpr => {
                if target_hook!(self.visit_block_expr_assign / visit_block_expr_assign_op(
                    target, rhs, assign, order, context
                ))
                .is_handled()
                {
                    return Ok(VisitResult::Handled);
                }
                let last = target
                    .last_child()
                    .ok_or_else(|| malformed(target, Arity::AtLeast(1)))?;
                if self
                    .dispatch_assign_target(last, context, rhs, assign)?
                    .is_handled()
                {
                    return Ok(VisitResult::Handled);
                }
                target_hook!(self.leave_block_expr_assign / leave_block_expr_assign_op(
                    target, rhs, assign, order, context
                ));
            }
            NodeKind::Var => {
                if target_hook!(self.visit_var_assign / visit_var_assign_op(
                    target, rhs, assign, order, context
                ))
                .is_handled()
                {
                    return Ok(VisitResult::Handled);
                }
                target_hook!(self.leave_var_assign / leave_var_assign_op(
                    target, rhs, assign, order, context
                ));
            }
            kind => {
                if let Some(handler) = self.extensions.assign_handler(kind.as_str()) {
                    let handled = handler(self, AssignTarget { target, rhs, assign }, context)?;
                    if handled.is_handled() {
                        return Ok(VisitResult::Continue);
                    }
                }
                tracing::error!(target = %kind, assign = %assign.kind(), "cannot handle assignment target");
                return Err(WalkError::unsupported_assignment(target, assign));
            }
        }
        Ok(VisitResult::Continue)
    }
}
