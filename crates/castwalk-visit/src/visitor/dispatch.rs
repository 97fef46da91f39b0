// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Entity and node dispatch.
//!
//! This module contains the walker operations that traverse entities and
//! nodes and call visitor hooks:
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Kind order**: children are visited in the order each kind defines,
//!   which is not always index order, with intermediate hooks in between
//!
//! After every node, the entities the enclosing entity scopes to that node
//! are visited, so declarations appear right after the node introducing them.
//!
//! # Control Flow
//!
//! - `enter_*` returning `Handled` skips the construct entirely
//! - `visit_*` returning `Handled` skips the children and `leave_*`, but
//!   node-scoped entities and `post_process_*` still run

use castwalk_core::{Arity, Entity, EntityKind, Node, NodeKind, ScopeKey, WalkError};

use super::context::Context;
use super::traits::{VisitResult, Visitor};
use super::walker::Walker;

type VisitHook<'a, V> = fn(&mut V, &'a Node, &<V as Visitor<'a>>::Context) -> VisitResult;
type LeaveHook<'a, V> = fn(&mut V, &'a Node, &<V as Visitor<'a>>::Context);

const NO_CHILDREN: [usize; 0] = [];

/// Fetch a required child, failing with `MalformedNode` if it is missing.
pub(crate) fn child(node: &Node, index: usize) -> Result<&Node, WalkError> {
    node.child(index).ok_or_else(|| {
        let expected = match node.kind().arity() {
            Some(arity) if !arity.accepts(node.child_count()) => arity,
            _ => Arity::AtLeast(index + 1),
        };
        malformed(node, expected)
    })
}

pub(crate) fn malformed(node: &Node, expected: Arity) -> WalkError {
    tracing::error!(
        kind = %node.kind(),
        id = %node.id(),
        expected = %expected,
        found = node.child_count(),
        "malformed node"
    );
    WalkError::malformed(node, expected)
}

// ============================================================================
// Entity walk
// ============================================================================

impl<'a, V: Visitor<'a>> Walker<'a, V> {
    /// Visit `entity` and everything nested in it.
    ///
    /// Order:
    /// 1. `enter_entity` (returning `Handled` skips everything below)
    /// 2. The kind's context derivation, visit hook, nested entities or body,
    ///    and leave hook
    /// 3. `post_process_entity`
    ///
    /// Custom kinds are routed to the entity extension table.
    pub fn visit_entities(&mut self, entity: &'a Entity, context: &V::Context) -> Result<(), WalkError> {
        if self.visitor.enter_entity(entity, context, &self.parents).is_handled() {
            tracing::debug!(entity = entity.name(), kind = %entity.kind(), "entity handled on enter");
            return Ok(());
        }
        tracing::debug!(entity = entity.name(), kind = %entity.kind(), "visiting entity");

        match entity.kind() {
            EntityKind::File => {
                let file_context = self.visitor.make_file_context(context, entity);
                if self
                    .visitor
                    .visit_file_entity(entity, context, &file_context, &self.parents)
                    .is_continue()
                {
                    self.visit_scoped_entities(entity, entity.all_scoped_entities(), &file_context)?;
                    self.visitor
                        .leave_file_entity(entity, context, &file_context, &self.parents);
                }
            }
            EntityKind::Type => {
                let type_context = self.visitor.make_type_context(context, entity);
                if self
                    .visitor
                    .visit_type_entity(entity, context, &type_context, &self.parents)
                    .is_continue()
                {
                    self.visit_scoped_entities(entity, entity.all_scoped_entities(), &type_context)?;
                    self.visitor
                        .leave_type_entity(entity, context, &type_context, &self.parents);
                }
            }
            EntityKind::Field => {
                if self
                    .visitor
                    .visit_field_entity(entity, context, &self.parents)
                    .is_continue()
                {
                    self.visitor.leave_field_entity(entity, context, &self.parents);
                }
            }
            EntityKind::Function | EntityKind::Script => self.walk_code_entity(entity, context)?,
            EntityKind::Custom(name) => self.walk_custom_entity(entity, name, context)?,
        }

        self.visitor.post_process_entity(entity, context, &self.parents);
        tracing::debug!(entity = entity.name(), kind = %entity.kind(), "left entity");
        Ok(())
    }

    /// Visit `children` as entities nested in `parent`, recording the parent
    /// of each before descending into it.
    pub fn visit_scoped_entities<I>(
        &mut self,
        parent: &'a Entity,
        children: I,
        context: &V::Context,
    ) -> Result<(), WalkError>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        for child in children {
            self.parents.set(child, parent);
            self.visit_entities(child, context)?;
        }
        Ok(())
    }

    fn walk_code_entity(&mut self, entity: &'a Entity, context: &V::Context) -> Result<(), WalkError> {
        let is_script = entity.kind() == EntityKind::Script;
        let code_context = self.visitor.make_code_context(context, entity);
        let result = if is_script {
            self.visitor
                .visit_script_entity(entity, context, &code_context, &self.parents)
        } else {
            self.visitor
                .visit_function_entity(entity, context, &code_context, &self.parents)
        };
        if result.is_handled() {
            return Ok(());
        }

        if let Some(ast) = entity.ast() {
            self.visit(ast, &code_context)?;
        }
        // Declarations not attached to any node of the body.
        self.visit_scoped_entities(entity, entity.scoped_entities(ScopeKey::Global), &code_context)?;

        if is_script {
            self.visitor
                .leave_script_entity(entity, context, &code_context, &self.parents);
        } else {
            self.visitor
                .leave_function_entity(entity, context, &code_context, &self.parents);
        }
        Ok(())
    }

    fn walk_custom_entity(
        &mut self,
        entity: &'a Entity,
        kind: &'static str,
        context: &V::Context,
    ) -> Result<(), WalkError> {
        if let Some(handler) = self.extensions.entity_handler(kind) {
            if handler(self, entity, context)?.is_handled() {
                return Ok(());
            }
        }
        tracing::error!(entity = entity.name(), kind, "no handler for entity");
        Err(WalkError::UnhandledEntity {
            kind: entity.kind(),
            name: entity.name().to_string(),
        })
    }
}

// ============================================================================
// Node walk
// ============================================================================

impl<'a, V: Visitor<'a>> Walker<'a, V> {
    /// Visit `node` and its subtree.
    ///
    /// Order:
    /// 1. `enter_node` (returning `Handled` skips everything below)
    /// 2. Arity check, when enabled
    /// 3. The kind's visit hook, children and intermediate hooks, leave hook
    /// 4. Entities the enclosing entity scopes to this node
    /// 5. `post_process_node`
    ///
    /// Custom kinds are routed to the node extension table.
    pub fn visit(&mut self, node: &'a Node, context: &V::Context) -> Result<(), WalkError> {
        if self.visitor.enter_node(node, context).is_handled() {
            return Ok(());
        }
        tracing::trace!(kind = %node.kind(), id = %node.id(), "visit node");

        self.check_arity(node)?;
        let result = self.dispatch_node(node, context)?;

        if result.is_continue() || self.options.rescan_node_scopes {
            self.visit_node_scoped_entities(node, context)?;
        }

        self.visitor.post_process_node(node, context);
        Ok(())
    }

    /// Visit the children of `node` from index `start` to the end, in order.
    pub fn visit_children(&mut self, node: &'a Node, start: usize, context: &V::Context) -> Result<(), WalkError> {
        for child in node.children().iter().skip(start) {
            self.visit(child, context)?;
        }
        Ok(())
    }

    /// Visit every child of `node`, in order.
    pub fn visit_all_children(&mut self, node: &'a Node, context: &V::Context) -> Result<(), WalkError> {
        self.visit_children(node, 0, context)
    }

    pub(crate) fn check_arity(&self, node: &Node) -> Result<(), WalkError> {
        if !self.options.check_arity {
            return Ok(());
        }
        match node.kind().arity() {
            Some(expected) if !expected.accepts(node.child_count()) => Err(malformed(node, expected)),
            _ => Ok(()),
        }
    }

    fn visit_node_scoped_entities(&mut self, node: &'a Node, context: &V::Context) -> Result<(), WalkError> {
        let top = context.top();
        let scoped = top.scoped_entities(ScopeKey::Node(node.id()));
        if !scoped.is_empty() {
            tracing::trace!(
                node = %node.id(),
                top = top.name(),
                count = scoped.len(),
                "hoisting node-scoped entities"
            );
        }
        self.visit_scoped_entities(top, scoped, context)
    }

    /// Run the kind-specific part of a node visit.
    ///
    /// Returns `Handled` if the kind's visit hook short-circuited.
    fn dispatch_node(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        let count = node.child_count();
        match node.kind() {
            NodeKind::FunctionExpr => {
                self.walk_simple(node, context, V::visit_function_expr, V::leave_function_expr, NO_CHILDREN)
            }
            NodeKind::FunctionStmt => {
                self.walk_simple(node, context, V::visit_function_stmt, V::leave_function_stmt, NO_CHILDREN)
            }
            NodeKind::LocalScope => self.walk_local_scope(node, context),
            NodeKind::BlockExpr => {
                self.walk_simple(node, context, V::visit_block_expr, V::leave_block_expr, 0..count)
            }
            NodeKind::BlockStmt => {
                self.walk_simple(node, context, V::visit_block_stmt, V::leave_block_stmt, 0..count)
            }
            NodeKind::Loop => self.walk_loop(node, context),
            NodeKind::GetCaughtException => self.walk_simple(
                node,
                context,
                V::visit_get_caught_exception,
                V::leave_get_caught_exception,
                NO_CHILDREN,
            ),
            NodeKind::This => self.walk_simple(node, context, V::visit_this, V::leave_this, NO_CHILDREN),
            NodeKind::Super => {
                self.walk_simple(node, context, V::visit_super_expr, V::leave_super_expr, NO_CHILDREN)
            }
            // Child 1 is call-site data, not an expression.
            NodeKind::Call => self.walk_simple(
                node,
                context,
                V::visit_call,
                V::leave_call,
                std::iter::once(0).chain(2..count),
            ),
            NodeKind::Var => self.walk_simple(node, context, V::visit_var, V::leave_var, NO_CHILDREN),
            NodeKind::Constant => {
                self.walk_simple(node, context, V::visit_constant, V::leave_constant, NO_CHILDREN)
            }
            NodeKind::BinaryExpr => {
                self.walk_simple(node, context, V::visit_binary_expr, V::leave_binary_expr, [1, 2])
            }
            NodeKind::UnaryExpr => {
                self.walk_simple(node, context, V::visit_unary_expr, V::leave_unary_expr, [1])
            }
            NodeKind::ArrayLength => {
                self.walk_simple(node, context, V::visit_array_length, V::leave_array_length, [0])
            }
            // Child 1 is the element type.
            NodeKind::ArrayRef => self.walk_simple(
                node,
                context,
                V::visit_array_ref,
                V::leave_array_ref,
                std::iter::once(0).chain(2..count),
            ),
            NodeKind::DeclStmt => self.walk_simple(
                node,
                context,
                V::visit_decl_stmt,
                V::leave_decl_stmt,
                (count == 4).then_some(3),
            ),
            NodeKind::Return => self.walk_simple(
                node,
                context,
                V::visit_return_stmt,
                V::leave_return_stmt,
                (count > 0).then_some(0),
            ),
            NodeKind::IfGoto => {
                let indices = match count {
                    1 => vec![0],
                    3 => vec![1, 2],
                    _ => return Err(malformed(node, Arity::Either(1, 3))),
                };
                self.walk_simple(node, context, V::visit_if_goto, V::leave_if_goto, indices)
            }
            NodeKind::Goto => self.walk_simple(node, context, V::visit_goto, V::leave_goto, NO_CHILDREN),
            NodeKind::LabelStmt => self.walk_simple(
                node,
                context,
                V::visit_label_stmt,
                V::leave_label_stmt,
                std::iter::once(0).chain((count == 2).then_some(1)),
            ),
            NodeKind::IfStmt => self.walk_conditional(
                node,
                context,
                V::visit_if_stmt,
                V::leave_if_stmt_condition,
                V::leave_if_stmt_true_clause,
                V::leave_if_stmt,
            ),
            NodeKind::IfExpr => self.walk_conditional(
                node,
                context,
                V::visit_if_expr,
                V::leave_if_expr_condition,
                V::leave_if_expr_true_clause,
                V::leave_if_expr,
            ),
            // Child 0 is the allocated type.
            NodeKind::New => self.walk_simple(node, context, V::visit_new_expr, V::leave_new_expr, 1..count),
            NodeKind::ObjectLiteral => self.walk_object_literal(node, context),
            NodeKind::ArrayLiteral => self.walk_array_literal(node, context),
            // Child 1 is the field name.
            NodeKind::ObjectRef => {
                self.walk_simple(node, context, V::visit_object_ref, V::leave_object_ref, [0])
            }
            NodeKind::Assign | NodeKind::AssignPreOp | NodeKind::AssignPostOp => self.walk_assign(node, context),
            NodeKind::Switch => self.walk_switch(node, context),
            NodeKind::Throw => self.walk_simple(node, context, V::visit_throw, V::leave_throw, [0]),
            // Child 0 is the bound exception name.
            NodeKind::Catch => self.walk_simple(node, context, V::visit_catch, V::leave_catch, 1..count),
            NodeKind::Unwind => self.walk_unwind(node, context),
            NodeKind::Try => self.walk_try(node, context),
            NodeKind::Empty => self.walk_simple(node, context, V::visit_empty, V::leave_empty, NO_CHILDREN),
            NodeKind::Primitive => {
                self.walk_simple(node, context, V::visit_primitive, V::leave_primitive, NO_CHILDREN)
            }
            NodeKind::Void => self.walk_simple(node, context, V::visit_void, V::leave_void, NO_CHILDREN),
            // Child 0 is the target type.
            NodeKind::Cast => self.walk_simple(node, context, V::visit_cast, V::leave_cast, [1]),
            NodeKind::InstanceOf => {
                self.walk_simple(node, context, V::visit_instance_of, V::leave_instance_of, [1])
            }
            NodeKind::Assert => {
                self.walk_simple(node, context, V::visit_assert_stmt, V::leave_assert_stmt, [0])
            }
            NodeKind::EachElementGet => self.walk_simple(
                node,
                context,
                V::visit_each_element_get,
                V::leave_each_element_get,
                [0],
            ),
            NodeKind::EachElementHasNext => self.walk_simple(
                node,
                context,
                V::visit_each_element_has_next,
                V::leave_each_element_has_next,
                [0],
            ),
            NodeKind::TypeLiteralExpr => self.walk_simple(
                node,
                context,
                V::visit_type_literal_expr,
                V::leave_type_literal_expr,
                [0],
            ),
            NodeKind::Custom(kind) => self.walk_custom_node(node, kind, context),
        }
    }

    /// Visit hook, the given children in order, leave hook.
    fn walk_simple<I>(
        &mut self,
        node: &'a Node,
        context: &V::Context,
        visit: VisitHook<'a, V>,
        leave: LeaveHook<'a, V>,
        children: I,
    ) -> Result<VisitResult, WalkError>
    where
        I: IntoIterator<Item = usize>,
    {
        if visit(&mut self.visitor, node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        for index in children {
            self.visit(child(node, index)?, context)?;
        }
        leave(&mut self.visitor, node, context);
        Ok(VisitResult::Continue)
    }

    /// The body is walked under a derived local context; the hooks see the
    /// enclosing one.
    fn walk_local_scope(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_local_scope(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        let local_context = self.visitor.make_local_context(context, node);
        self.visit(child(node, 0)?, &local_context)?;
        self.visitor.leave_local_scope(node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_loop(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_loop_stmt(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        self.visitor.leave_loop_header(node, context);
        self.visit(child(node, 1)?, context)?;
        self.visitor.leave_loop_stmt(node, context);
        Ok(VisitResult::Continue)
    }

    /// Shared by `IfStmt` and `IfExpr`: condition, true branch, optional
    /// false branch.
    fn walk_conditional(
        &mut self,
        node: &'a Node,
        context: &V::Context,
        visit: VisitHook<'a, V>,
        condition_done: LeaveHook<'a, V>,
        true_clause_done: LeaveHook<'a, V>,
        leave: LeaveHook<'a, V>,
    ) -> Result<VisitResult, WalkError> {
        if visit(&mut self.visitor, node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        condition_done(&mut self.visitor, node, context);
        self.visit(child(node, 1)?, context)?;
        true_clause_done(&mut self.visitor, node, context);
        if let Some(false_clause) = node.child(2) {
            self.visit(false_clause, context)?;
        }
        leave(&mut self.visitor, node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_object_literal(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_object_literal(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        for key in (1..node.child_count()).step_by(2) {
            self.visit(child(node, key)?, context)?;
            self.visit(child(node, key + 1)?, context)?;
            self.visitor.leave_object_literal_field_init(node, key, context);
        }
        self.visitor.leave_object_literal(node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_array_literal(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_array_literal(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        self.visitor.leave_array_literal_object(node, context);
        for (index, element) in node.children().iter().enumerate().skip(1) {
            self.visit(element, context)?;
            self.visitor.leave_array_literal_init_element(node, index, context);
        }
        self.visitor.leave_array_literal(node, context);
        Ok(VisitResult::Continue)
    }

    /// The right-hand side is visited first, then the target goes through
    /// the assignment dispatcher. A target hook returning `Handled` also
    /// skips `leave_assign`.
    fn walk_assign(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_assign(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        let target = child(node, 0)?;
        let rhs = child(node, 1)?;
        self.visit(rhs, context)?;
        if self
            .dispatch_assign_target(target, context, rhs, node)?
            .is_handled()
        {
            return Ok(VisitResult::Continue);
        }
        self.visitor.leave_assign(node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_switch(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_switch(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        self.visitor.leave_switch_value(node, context);
        self.visit(child(node, 1)?, context)?;
        self.visitor.leave_switch(node, context);
        Ok(VisitResult::Continue)
    }

    /// The protected child is walked under an unwind context derived from
    /// the cleanup child; the cleanup child is walked under the original one.
    fn walk_unwind(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_unwind(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        let protected = child(node, 0)?;
        let cleanup = child(node, 1)?;
        let unwind_context = self.visitor.make_unwind_context(context, cleanup);
        self.visit(protected, &unwind_context)?;
        self.visit(cleanup, context)?;
        self.visitor.leave_unwind(node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_try(&mut self, node: &'a Node, context: &V::Context) -> Result<VisitResult, WalkError> {
        if self.visitor.visit_try_stmt(node, context).is_handled() {
            return Ok(VisitResult::Handled);
        }
        self.visit(child(node, 0)?, context)?;
        self.visitor.leave_try_block(node, context);
        self.visit(child(node, 1)?, context)?;
        self.visitor.leave_try_stmt(node, context);
        Ok(VisitResult::Continue)
    }

    fn walk_custom_node(
        &mut self,
        node: &'a Node,
        kind: &'static str,
        context: &V::Context,
    ) -> Result<VisitResult, WalkError> {
        if let Some(handler) = self.extensions.node_handler(kind) {
            if handler(self, node, context)?.is_handled() {
                return Ok(VisitResult::Continue);
            }
        }
        tracing::error!(kind, id = %node.id(), "no handler for node");
        Err(WalkError::unhandled_node(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_reports_kind_contract() {
        let node = Node::new(NodeKind::Loop, vec![Node::var("c")]);
        let err = child(&node, 1).unwrap_err();
        assert_eq!(
            err,
            WalkError::MalformedNode {
                kind: NodeKind::Loop,
                expected: Arity::Exactly(2),
                found: 1,
                position: None,
            }
        );
    }

    #[test]
    fn test_child_falls_back_to_needed_count() {
        let node = Node::leaf(NodeKind::BlockExpr);
        let err = child(&node, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed BlockExpr node: expected at least 1 children, found 0"
        );
    }

    #[test]
    fn test_child_present() {
        let node = Node::new(NodeKind::Throw, vec![Node::var("e")]);
        assert_eq!(child(&node, 0).unwrap().kind(), NodeKind::Var);
    }
}
