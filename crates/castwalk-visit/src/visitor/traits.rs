// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for common-AST traversal.

use castwalk_core::{Entity, Node};
use serde::Serialize;

use super::context::Context;
use super::parents::ParentMap;

/// Result of a visit hook - controls traversal behavior.
///
/// When a visit hook returns a `VisitResult`, it controls how the walker
/// proceeds with the construct being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue with the default traversal of this construct.
    ///
    /// Children are walked and the matching `leave_*` hook is called.
    #[default]
    Continue,

    /// The hook fully handled the construct.
    ///
    /// The walker skips the construct's children and its `leave_*` hook.
    /// Post-processing and node-scoped entity hoisting still run.
    Handled,
}

impl VisitResult {
    /// Returns true if this is [`VisitResult::Handled`].
    pub fn is_handled(self) -> bool {
        self == VisitResult::Handled
    }

    /// Returns true if this is [`VisitResult::Continue`].
    pub fn is_continue(self) -> bool {
        self == VisitResult::Continue
    }
}

/// When a compound assignment produces its value relative to the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundOrder {
    /// `++x`, `x += 1`: the value is read after the update.
    Pre,
    /// `x++`: the value is read before the update.
    Post,
}

/// Macro to generate node visitor hook pairs.
///
/// Each name generates a `visit_*` hook that defaults to
/// [`Visitor::visit_node`] and a `leave_*` hook that defaults to
/// [`Visitor::leave_node`], so overriding the generic pair changes behavior
/// for every kind at once.
macro_rules! node_hooks {
    (
        $lt:lifetime =>
        $(
            $(#[$meta:meta])*
            $base_name:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = ""]
                #[doc = "Called before descending into children. Return `Handled` to skip the children and the leave hook."]
                fn [<visit_ $base_name>](&mut self, node: &$lt Node, context: &Self::Context) -> VisitResult {
                    self.visit_node(node, context)
                }

                $(#[$meta])*
                #[doc = ""]
                #[doc = "Called after all children have been visited."]
                fn [<leave_ $base_name>](&mut self, node: &$lt Node, context: &Self::Context) {
                    self.leave_node(node, context)
                }
            )*
        }
    };
}

/// Macro to generate assignment-target hooks.
///
/// Each lvalue shape gets a plain-assignment pair and a compound-assignment
/// pair. The compound pair also receives the [`CompoundOrder`].
macro_rules! assign_hooks {
    (
        $lt:lifetime =>
        $(
            $(#[$meta:meta])*
            $base_name:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = ""]
                #[doc = "Plain assignment, called after the right-hand side was visited. Return `Handled` to skip the target's children and the leave hooks."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name _assign>](
                    &mut self,
                    target: &$lt Node,
                    rhs: &$lt Node,
                    assign: &$lt Node,
                    context: &Self::Context,
                ) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = ""]
                #[doc = "Plain assignment, called after the target's children were visited."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name _assign>](
                    &mut self,
                    target: &$lt Node,
                    rhs: &$lt Node,
                    assign: &$lt Node,
                    context: &Self::Context,
                ) {
                }

                $(#[$meta])*
                #[doc = ""]
                #[doc = "Compound assignment, called after the right-hand side was visited."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name _assign_op>](
                    &mut self,
                    target: &$lt Node,
                    rhs: &$lt Node,
                    assign: &$lt Node,
                    order: CompoundOrder,
                    context: &Self::Context,
                ) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = ""]
                #[doc = "Compound assignment, called after the target's children were visited."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name _assign_op>](
                    &mut self,
                    target: &$lt Node,
                    rhs: &$lt Node,
                    assign: &$lt Node,
                    order: CompoundOrder,
                    context: &Self::Context,
                ) {
                }
            )*
        }
    };
}

/// The full hook set of a common-AST walk.
///
/// Implement this trait to react to a walk driven by a
/// [`Walker`](super::Walker). Every hook has a default, so an implementation
/// overrides only what it needs.
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in a kind-defined order, interleaved with
///   intermediate hooks such as [`leave_if_stmt_condition`](Self::leave_if_stmt_condition)
///
/// # Default Chaining
///
/// Per-kind entity hooks default to [`visit_entity`](Self::visit_entity) /
/// [`leave_entity`](Self::leave_entity); per-kind node hooks default to
/// [`visit_node`](Self::visit_node) / [`leave_node`](Self::leave_node).
/// Context derivation hooks default to cloning the parent context.
///
/// # Example
///
/// ```
/// use castwalk_core::Node;
/// use castwalk_visit::{EntityContext, VisitResult, Visitor};
///
/// struct VarCounter {
///     count: usize,
/// }
///
/// impl<'a> Visitor<'a> for VarCounter {
///     type Context = EntityContext<'a>;
///
///     fn visit_var(&mut self, _node: &'a Node, _context: &Self::Context) -> VisitResult {
///         self.count += 1;
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor<'a> {
    /// The analysis-specific context threaded through the walk.
    type Context: Context<'a> + Clone;

    // ------------------------------------------------------------------
    // Context derivation
    // ------------------------------------------------------------------

    /// Derive the context used inside a file entity.
    #[allow(unused_variables)]
    fn make_file_context(&mut self, context: &Self::Context, entity: &'a Entity) -> Self::Context {
        context.clone()
    }

    /// Derive the context used inside a type entity.
    #[allow(unused_variables)]
    fn make_type_context(&mut self, context: &Self::Context, entity: &'a Entity) -> Self::Context {
        context.clone()
    }

    /// Derive the context used for the body of a function or script entity.
    ///
    /// Node-scoped entities are looked up through [`Context::top`], so a
    /// context whose `top()` is `entity` makes declarations inside the body
    /// hoist right after their introducing node.
    #[allow(unused_variables)]
    fn make_code_context(&mut self, context: &Self::Context, entity: &'a Entity) -> Self::Context {
        context.clone()
    }

    /// Derive the context used inside a `LocalScope` node.
    #[allow(unused_variables)]
    fn make_local_context(&mut self, context: &Self::Context, node: &'a Node) -> Self::Context {
        context.clone()
    }

    /// Derive the context used for the protected child of an `Unwind` node.
    ///
    /// `cleanup` is the cleanup child. The cleanup child itself is visited
    /// under the original context.
    #[allow(unused_variables)]
    fn make_unwind_context(&mut self, context: &Self::Context, cleanup: &'a Node) -> Self::Context {
        context.clone()
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Called first for every entity. Return `Handled` to skip the entity
    /// entirely, including post-processing.
    #[allow(unused_variables)]
    fn enter_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        VisitResult::Continue
    }

    /// Called last for every entity that was entered.
    #[allow(unused_variables)]
    fn post_process_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        parents: &ParentMap<'a>,
    ) {
    }

    /// Visit any entity. Override only this to change behavior for all kinds.
    #[allow(unused_variables)]
    fn visit_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        VisitResult::Continue
    }

    /// Leave any entity. Override only this to change behavior for all kinds.
    #[allow(unused_variables)]
    fn leave_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) {}

    /// Visit a file entity. `file_context` is the derived context.
    #[allow(unused_variables)]
    fn visit_file_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        file_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        self.visit_entity(entity, context, parents)
    }

    /// Leave a file entity.
    #[allow(unused_variables)]
    fn leave_file_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        file_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) {
        self.leave_entity(entity, context, parents)
    }

    /// Visit a type entity. `type_context` is the derived context.
    #[allow(unused_variables)]
    fn visit_type_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        type_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        self.visit_entity(entity, context, parents)
    }

    /// Leave a type entity.
    #[allow(unused_variables)]
    fn leave_type_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        type_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) {
        self.leave_entity(entity, context, parents)
    }

    /// Visit a field entity.
    fn visit_field_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        self.visit_entity(entity, context, parents)
    }

    /// Leave a field entity.
    fn leave_field_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) {
        self.leave_entity(entity, context, parents)
    }

    /// Visit a function entity. `code_context` is the derived context.
    ///
    /// Returning `Handled` also skips the body, which is how an implementation
    /// skips entities without a usable body.
    #[allow(unused_variables)]
    fn visit_function_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        code_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        self.visit_entity(entity, context, parents)
    }

    /// Leave a function entity.
    #[allow(unused_variables)]
    fn leave_function_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        code_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) {
        self.leave_entity(entity, context, parents)
    }

    /// Visit a script entity. `code_context` is the derived context.
    #[allow(unused_variables)]
    fn visit_script_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        code_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) -> VisitResult {
        self.visit_entity(entity, context, parents)
    }

    /// Leave a script entity.
    #[allow(unused_variables)]
    fn leave_script_entity(
        &mut self,
        entity: &'a Entity,
        context: &Self::Context,
        code_context: &Self::Context,
        parents: &ParentMap<'a>,
    ) {
        self.leave_entity(entity, context, parents)
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Called first for every node. Return `Handled` to skip the node
    /// entirely, including hoisting and post-processing.
    #[allow(unused_variables)]
    fn enter_node(&mut self, node: &'a Node, context: &Self::Context) -> VisitResult {
        VisitResult::Continue
    }

    /// Called last for every node that was entered.
    #[allow(unused_variables)]
    fn post_process_node(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Visit any node. Override only this to change behavior for all kinds.
    #[allow(unused_variables)]
    fn visit_node(&mut self, node: &'a Node, context: &Self::Context) -> VisitResult {
        VisitResult::Continue
    }

    /// Leave any node. Override only this to change behavior for all kinds.
    #[allow(unused_variables)]
    fn leave_node(&mut self, node: &'a Node, context: &Self::Context) {}

    node_hooks! { 'a =>
        /// A function expression.
        function_expr,
        /// A function declaration statement.
        function_stmt,
        /// A local scope.
        local_scope,
        /// A block producing a value.
        block_expr,
        /// A statement block.
        block_stmt,
        /// A loop.
        loop_stmt,
        /// The caught exception of a handler.
        get_caught_exception,
        /// `this`.
        this,
        /// `super`.
        super_expr,
        /// A call.
        call,
        /// A variable reference.
        var,
        /// A constant.
        constant,
        /// A binary expression.
        binary_expr,
        /// A unary expression.
        unary_expr,
        /// An array length read.
        array_length,
        /// An array element read.
        array_ref,
        /// A local declaration.
        decl_stmt,
        /// A return.
        return_stmt,
        /// A conditional jump.
        if_goto,
        /// An unconditional jump.
        goto,
        /// A labeled statement.
        label_stmt,
        /// An if statement.
        if_stmt,
        /// A conditional expression.
        if_expr,
        /// An allocation.
        new_expr,
        /// An object literal.
        object_literal,
        /// An array literal.
        array_literal,
        /// A field read.
        object_ref,
        /// Any assignment: plain, pre-op or post-op.
        assign,
        /// A switch.
        switch,
        /// A throw.
        throw,
        /// An exception handler.
        catch,
        /// A region whose abrupt exit runs cleanup code.
        unwind,
        /// A try statement.
        try_stmt,
        /// An empty node.
        empty,
        /// A primitive operation.
        primitive,
        /// A void value.
        void,
        /// A cast.
        cast,
        /// An instance-of test.
        instance_of,
        /// An assertion.
        assert_stmt,
        /// Element extraction in a for-each loop.
        each_element_get,
        /// Element test in a for-each loop.
        each_element_has_next,
        /// A type literal.
        type_literal_expr,
    }

    // ------------------------------------------------------------------
    // Intermediate hooks
    // ------------------------------------------------------------------

    /// Called between a loop's header and its body.
    #[allow(unused_variables)]
    fn leave_loop_header(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called between an if statement's condition and its true branch.
    #[allow(unused_variables)]
    fn leave_if_stmt_condition(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called after an if statement's true branch.
    #[allow(unused_variables)]
    fn leave_if_stmt_true_clause(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called between a conditional expression's condition and its true branch.
    #[allow(unused_variables)]
    fn leave_if_expr_condition(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called after a conditional expression's true branch.
    #[allow(unused_variables)]
    fn leave_if_expr_true_clause(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called after each key/value pair of an object literal. `index` is the
    /// child index of the pair's key.
    #[allow(unused_variables)]
    fn leave_object_literal_field_init(&mut self, node: &'a Node, index: usize, context: &Self::Context) {}

    /// Called after the array object of an array literal.
    #[allow(unused_variables)]
    fn leave_array_literal_object(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called after each element of an array literal. `index` is the
    /// element's child index.
    #[allow(unused_variables)]
    fn leave_array_literal_init_element(&mut self, node: &'a Node, index: usize, context: &Self::Context) {}

    /// Called between a switch's value and its body.
    #[allow(unused_variables)]
    fn leave_switch_value(&mut self, node: &'a Node, context: &Self::Context) {}

    /// Called between a try statement's protected block and its handler.
    #[allow(unused_variables)]
    fn leave_try_block(&mut self, node: &'a Node, context: &Self::Context) {}

    // ------------------------------------------------------------------
    // Assignment targets
    // ------------------------------------------------------------------

    assign_hooks! { 'a =>
        /// Assignment to an array element.
        array_ref,
        /// Assignment to a field.
        object_ref,
        /// Assignment to the value of a block expression.
        block_expr,
        /// Assignment to a variable.
        var,
    }
}
