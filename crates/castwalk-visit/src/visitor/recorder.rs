// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! EventRecorder visitor for observing traversal order.
//!
//! The recorder appends one [`WalkEvent`] per hook invocation. It is the
//! reference consumer of the hook protocol and the main tool for checking
//! traversal order in tests:
//!
//! ```
//! use castwalk_core::{Entity, Node, NodeKind};
//! use castwalk_visit::{EntityContext, EventRecorder, Walker};
//!
//! let body = Node::new(
//!     NodeKind::Loop,
//!     vec![Node::var("c"), Node::leaf(NodeKind::Empty)],
//! );
//! let function = Entity::function("f").with_ast(body);
//!
//! let mut walker = Walker::new(EventRecorder::new());
//! walker.walk(&function, &EntityContext::new(&function)).unwrap();
//! let nodes: Vec<String> = walker
//!     .into_visitor()
//!     .trace()
//!     .into_iter()
//!     .filter(|line| !line.contains("entity") && !line.starts_with("make_"))
//!     .collect();
//!
//! assert_eq!(
//!     nodes,
//!     vec![
//!         "visit Loop",
//!         "visit Var c",
//!         "leave Var c",
//!         "leave_loop_header Loop",
//!         "visit Empty",
//!         "leave Empty",
//!         "leave Loop",
//!     ]
//! );
//! ```

use std::collections::HashSet;
use std::fmt;

use castwalk_core::{Entity, EntityKind, Node, NodeKind, Value};
use serde::Serialize;

use super::context::EntityContext;
use super::parents::ParentMap;
use super::traits::{CompoundOrder, VisitResult, Visitor};

// ============================================================================
// Walk Events
// ============================================================================

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkEvent {
    /// The hook name. Per-kind node hooks are recorded as `visit` and `leave`.
    pub hook: &'static str,
    /// The entity name, or the node kind followed by its value if it has one.
    pub subject: String,
    /// The node id, for node hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<u64>,
    /// The entity kind, for entity hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_kind: Option<&'static str>,
    /// The recorded parent of the entity, for entity hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// The child index passed to per-element hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// The compound order passed to compound assignment hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<CompoundOrder>,
    /// Serial of the context the hook received. For context derivation
    /// hooks, the serial of the derived context.
    pub context: u64,
}

impl fmt::Display for WalkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hook, self.subject)?;
        if let Some(index) = self.index {
            write!(f, " [{}]", index)?;
        }
        if let Some(order) = self.order {
            let order = match order {
                CompoundOrder::Pre => "pre",
                CompoundOrder::Post => "post",
            };
            write!(f, " ({})", order)?;
        }
        Ok(())
    }
}

fn describe(node: &Node) -> String {
    match node.value() {
        Some(Value::Str(s)) => format!("{} {}", node.kind(), s),
        Some(value) => format!("{} {}", node.kind(), value),
        None => node.kind().to_string(),
    }
}

// ============================================================================
// EventRecorder
// ============================================================================

/// A visitor that records every hook invocation.
///
/// Context derivation creates a new [`EntityContext`]: file, type and code
/// contexts take the entity being entered as their top, local and unwind
/// contexts keep the enclosing top. Each derived context has a new serial, so
/// events show which context a hook ran under.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<WalkEvent>,
    short_circuit: HashSet<NodeKind>,
    skipped_entities: HashSet<String>,
    record_bookkeeping: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `Handled` from the visit hook of every node of `kind`.
    pub fn with_short_circuit(mut self, kind: NodeKind) -> Self {
        self.short_circuit.insert(kind);
        self
    }

    /// Return `Handled` from `enter_entity` for entities named `name`.
    pub fn with_skipped_entity(mut self, name: impl Into<String>) -> Self {
        self.skipped_entities.insert(name.into());
        self
    }

    /// Also record `enter_node` and `post_process_node`.
    pub fn with_bookkeeping(mut self, record: bool) -> Self {
        self.record_bookkeeping = record;
        self
    }

    pub fn events(&self) -> &[WalkEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<WalkEvent> {
        self.events
    }

    /// The recorded events rendered one per line.
    pub fn trace(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// The recorded events as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    fn node_event(&mut self, hook: &'static str, node: &Node, context: &EntityContext<'_>) {
        self.events.push(WalkEvent {
            hook,
            subject: describe(node),
            node: Some(node.id().get()),
            entity_kind: None,
            parent: None,
            index: None,
            order: None,
            context: context.serial(),
        });
    }

    fn indexed_event(&mut self, hook: &'static str, node: &Node, index: usize, context: &EntityContext<'_>) {
        self.node_event(hook, node, context);
        if let Some(event) = self.events.last_mut() {
            event.index = Some(index);
        }
    }

    fn assign_event(
        &mut self,
        hook: &'static str,
        target: &Node,
        order: Option<CompoundOrder>,
        context: &EntityContext<'_>,
    ) {
        self.node_event(hook, target, context);
        if let Some(event) = self.events.last_mut() {
            event.order = order;
        }
    }

    fn entity_event(
        &mut self,
        hook: &'static str,
        entity: &Entity,
        context: &EntityContext<'_>,
        parents: &ParentMap<'_>,
    ) {
        self.events.push(WalkEvent {
            hook,
            subject: entity.name().to_string(),
            node: None,
            entity_kind: Some(entity.kind().as_str()),
            parent: parents.get(entity).map(|p| p.name().to_string()),
            index: None,
            order: None,
            context: context.serial(),
        });
    }

    fn derived(&mut self, hook: &'static str, subject: String, derived: EntityContext<'_>) {
        self.events.push(WalkEvent {
            hook,
            subject,
            node: None,
            entity_kind: None,
            parent: None,
            index: None,
            order: None,
            context: derived.serial(),
        });
    }
}

/// Record both variants of an assignment-target hook pair.
macro_rules! record_assign_hooks {
    ($lt:lifetime => $($visit:ident, $leave:ident, $visit_op:ident, $leave_op:ident;)*) => {
        $(
            fn $visit(
                &mut self,
                target: &$lt Node,
                _rhs: &$lt Node,
                _assign: &$lt Node,
                context: &Self::Context,
            ) -> VisitResult {
                self.assign_event(stringify!($visit), target, None, context);
                VisitResult::Continue
            }

            fn $leave(&mut self, target: &$lt Node, _rhs: &$lt Node, _assign: &$lt Node, context: &Self::Context) {
                self.assign_event(stringify!($leave), target, None, context);
            }

            fn $visit_op(
                &mut self,
                target: &$lt Node,
                _rhs: &$lt Node,
                _assign: &$lt Node,
                order: CompoundOrder,
                context: &Self::Context,
            ) -> VisitResult {
                self.assign_event(stringify!($visit_op), target, Some(order), context);
                VisitResult::Continue
            }

            fn $leave_op(
                &mut self,
                target: &$lt Node,
                _rhs: &$lt Node,
                _assign: &$lt Node,
                order: CompoundOrder,
                context: &Self::Context,
            ) {
                self.assign_event(stringify!($leave_op), target, Some(order), context);
            }
        )*
    };
}

/// Record intermediate hooks that take only the node.
macro_rules! record_node_hooks {
    ($lt:lifetime => $($hook:ident),* $(,)?) => {
        $(
            fn $hook(&mut self, node: &$lt Node, context: &Self::Context) {
                self.node_event(stringify!($hook), node, context);
            }
        )*
    };
}

impl<'a> Visitor<'a> for EventRecorder {
    type Context = EntityContext<'a>;

    fn make_file_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        let derived = EntityContext::new(entity);
        self.derived("make_file_context", entity.name().to_string(), derived);
        derived
    }

    fn make_type_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        let derived = EntityContext::new(entity);
        self.derived("make_type_context", entity.name().to_string(), derived);
        derived
    }

    fn make_code_context(&mut self, _context: &Self::Context, entity: &'a Entity) -> Self::Context {
        let derived = EntityContext::new(entity);
        self.derived("make_code_context", entity.name().to_string(), derived);
        derived
    }

    fn make_local_context(&mut self, context: &Self::Context, node: &'a Node) -> Self::Context {
        let derived = context.derive();
        self.derived("make_local_context", describe(node), derived);
        derived
    }

    fn make_unwind_context(&mut self, context: &Self::Context, cleanup: &'a Node) -> Self::Context {
        let derived = context.derive();
        self.derived("make_unwind_context", describe(cleanup), derived);
        derived
    }

    fn enter_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) -> VisitResult {
        self.entity_event("enter_entity", entity, context, parents);
        if self.skipped_entities.contains(entity.name()) {
            VisitResult::Handled
        } else {
            VisitResult::Continue
        }
    }

    fn post_process_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) {
        self.entity_event("post_process_entity", entity, context, parents);
    }

    fn visit_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) -> VisitResult {
        let hook = match entity.kind() {
            EntityKind::File => "visit_file_entity",
            EntityKind::Type => "visit_type_entity",
            EntityKind::Function => "visit_function_entity",
            EntityKind::Script => "visit_script_entity",
            EntityKind::Field => "visit_field_entity",
            EntityKind::Custom(_) => "visit_entity",
        };
        self.entity_event(hook, entity, context, parents);
        VisitResult::Continue
    }

    fn leave_entity(&mut self, entity: &'a Entity, context: &Self::Context, parents: &ParentMap<'a>) {
        let hook = match entity.kind() {
            EntityKind::File => "leave_file_entity",
            EntityKind::Type => "leave_type_entity",
            EntityKind::Function => "leave_function_entity",
            EntityKind::Script => "leave_script_entity",
            EntityKind::Field => "leave_field_entity",
            EntityKind::Custom(_) => "leave_entity",
        };
        self.entity_event(hook, entity, context, parents);
    }

    fn enter_node(&mut self, node: &'a Node, context: &Self::Context) -> VisitResult {
        if self.record_bookkeeping {
            self.node_event("enter_node", node, context);
        }
        VisitResult::Continue
    }

    fn post_process_node(&mut self, node: &'a Node, context: &Self::Context) {
        if self.record_bookkeeping {
            self.node_event("post_process_node", node, context);
        }
    }

    fn visit_node(&mut self, node: &'a Node, context: &Self::Context) -> VisitResult {
        self.node_event("visit", node, context);
        if self.short_circuit.contains(&node.kind()) {
            VisitResult::Handled
        } else {
            VisitResult::Continue
        }
    }

    fn leave_node(&mut self, node: &'a Node, context: &Self::Context) {
        self.node_event("leave", node, context);
    }

    record_node_hooks! { 'a =>
        leave_loop_header,
        leave_if_stmt_condition,
        leave_if_stmt_true_clause,
        leave_if_expr_condition,
        leave_if_expr_true_clause,
        leave_array_literal_object,
        leave_switch_value,
        leave_try_block,
    }

    fn leave_object_literal_field_init(&mut self, node: &'a Node, index: usize, context: &Self::Context) {
        self.indexed_event("leave_object_literal_field_init", node, index, context);
    }

    fn leave_array_literal_init_element(&mut self, node: &'a Node, index: usize, context: &Self::Context) {
        self.indexed_event("leave_array_literal_init_element", node, index, context);
    }

    record_assign_hooks! { 'a =>
        visit_array_ref_assign, leave_array_ref_assign, visit_array_ref_assign_op, leave_array_ref_assign_op;
        visit_object_ref_assign, leave_object_ref_assign, visit_object_ref_assign_op, leave_object_ref_assign_op;
        visit_block_expr_assign, leave_block_expr_assign, visit_block_expr_assign_op, leave_block_expr_assign_op;
        visit_var_assign, leave_var_assign, visit_var_assign_op, leave_var_assign_op;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = WalkEvent {
            hook: "visit_array_ref_assign_op",
            subject: "ArrayRef".to_string(),
            node: Some(7),
            entity_kind: None,
            parent: None,
            index: None,
            order: Some(CompoundOrder::Pre),
            context: 1,
        };
        assert_eq!(event.to_string(), "visit_array_ref_assign_op ArrayRef (pre)");
    }

    #[test]
    fn test_describe_uses_plain_strings() {
        assert_eq!(describe(&Node::var("x")), "Var x");
        assert_eq!(describe(&Node::constant(0)), "Constant 0");
        assert_eq!(describe(&Node::leaf(NodeKind::This)), "This");
    }

    #[test]
    fn test_event_json_skips_empty_fields() {
        let event = WalkEvent {
            hook: "visit",
            subject: "This".to_string(),
            node: Some(3),
            entity_kind: None,
            parent: None,
            index: None,
            order: None,
            context: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hook": "visit", "subject": "This", "node": 3, "context": 2})
        );
    }
}
