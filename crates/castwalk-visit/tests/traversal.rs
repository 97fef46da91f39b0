// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node traversal order tests.
//!
//! Each test walks a small function body with an [`EventRecorder`] and
//! compares the node-level hook sequence with the order the node kind
//! defines, including intermediate hooks.

mod common;

use castwalk_core::{Entity, Node, NodeKind};
use castwalk_visit::{EntityContext, EventRecorder, WalkEvent, WalkOptions, Walker};

use common::{array_ref, assign, block, lines, object_ref, record, trace_body, trace_body_with};

// ============================================================================
// Statements and expressions
// ============================================================================

#[test]
fn test_if_else_scenario() {
    // if (x) { y = a[0]; } else { y = 1; }
    let body = Node::new(
        NodeKind::IfStmt,
        vec![
            Node::var("x"),
            block(vec![assign(Node::var("y"), array_ref(Node::var("a"), Node::constant(0)))]),
            block(vec![assign(Node::var("y"), Node::constant(1))]),
        ],
    );
    assert_eq!(
        trace_body(body),
        lines(&[
            "visit IfStmt",
            "visit Var x",
            "leave Var x",
            "leave_if_stmt_condition IfStmt",
            "visit BlockStmt",
            "visit Assign",
            "visit ArrayRef",
            "visit Var a",
            "leave Var a",
            "visit Constant 0",
            "leave Constant 0",
            "leave ArrayRef",
            "visit_var_assign Var y",
            "leave_var_assign Var y",
            "leave Assign",
            "leave BlockStmt",
            "leave_if_stmt_true_clause IfStmt",
            "visit BlockStmt",
            "visit Assign",
            "visit Constant 1",
            "leave Constant 1",
            "visit_var_assign Var y",
            "leave_var_assign Var y",
            "leave Assign",
            "leave BlockStmt",
            "leave IfStmt",
        ])
    );
}

#[test]
fn test_if_without_else_and_if_expr() {
    let stmt = Node::new(NodeKind::IfStmt, vec![Node::var("c"), Node::leaf(NodeKind::Empty)]);
    assert_eq!(
        trace_body(stmt),
        lines(&[
            "visit IfStmt",
            "visit Var c",
            "leave Var c",
            "leave_if_stmt_condition IfStmt",
            "visit Empty",
            "leave Empty",
            "leave_if_stmt_true_clause IfStmt",
            "leave IfStmt",
        ])
    );

    let expr = Node::new(
        NodeKind::IfExpr,
        vec![Node::var("c"), Node::constant(1), Node::constant(2)],
    );
    assert_eq!(
        trace_body(expr),
        lines(&[
            "visit IfExpr",
            "visit Var c",
            "leave Var c",
            "leave_if_expr_condition IfExpr",
            "visit Constant 1",
            "leave Constant 1",
            "leave_if_expr_true_clause IfExpr",
            "visit Constant 2",
            "leave Constant 2",
            "leave IfExpr",
        ])
    );
}

#[test]
fn test_loop_header_hook_between_children() {
    let body = Node::new(NodeKind::Loop, vec![Node::var("more"), block(vec![])]);
    assert_eq!(
        trace_body(body),
        lines(&[
            "visit Loop",
            "visit Var more",
            "leave Var more",
            "leave_loop_header Loop",
            "visit BlockStmt",
            "leave BlockStmt",
            "leave Loop",
        ])
    );
}

#[test]
fn test_call_skips_call_site_child() {
    let body = Node::new(
        NodeKind::Call,
        vec![Node::var("f"), Node::constant("site"), Node::var("a"), Node::var("b")],
    );
    assert_eq!(
        trace_body(body),
        lines(&[
            "visit Call",
            "visit Var f",
            "leave Var f",
            "visit Var a",
            "leave Var a",
            "visit Var b",
            "leave Var b",
            "leave Call",
        ])
    );
}

#[test]
fn test_operators_are_not_visited() {
    let binary = Node::new(
        NodeKind::BinaryExpr,
        vec![Node::operator("+"), Node::var("a"), Node::var("b")],
    );
    assert_eq!(
        trace_body(binary),
        lines(&["visit BinaryExpr", "visit Var a", "leave Var a", "visit Var b", "leave Var b", "leave BinaryExpr"])
    );

    let unary = Node::new(NodeKind::UnaryExpr, vec![Node::operator("!"), Node::var("a")]);
    assert_eq!(
        trace_body(unary),
        lines(&["visit UnaryExpr", "visit Var a", "leave Var a", "leave UnaryExpr"])
    );
}

#[test]
fn test_type_children_are_not_visited() {
    let new = Node::new(NodeKind::New, vec![Node::constant("Point"), Node::var("x")]);
    assert_eq!(
        trace_body(new),
        lines(&["visit New", "visit Var x", "leave Var x", "leave New"])
    );

    let cast = Node::new(NodeKind::Cast, vec![Node::constant("int"), Node::var("x")]);
    assert_eq!(
        trace_body(cast),
        lines(&["visit Cast", "visit Var x", "leave Var x", "leave Cast"])
    );

    let test = Node::new(NodeKind::InstanceOf, vec![Node::constant("Point"), Node::var("p")]);
    assert_eq!(
        trace_body(test),
        lines(&["visit InstanceOf", "visit Var p", "leave Var p", "leave InstanceOf"])
    );
}

#[test]
fn test_first_operand_kinds_visit_child_zero_only() {
    let cases = [
        (NodeKind::ArrayLength, vec![Node::var("a")]),
        (NodeKind::Throw, vec![Node::var("a")]),
        (NodeKind::TypeLiteralExpr, vec![Node::var("a")]),
        (NodeKind::EachElementGet, vec![Node::var("a"), Node::var("hidden")]),
        (NodeKind::EachElementHasNext, vec![Node::var("a"), Node::var("hidden")]),
        (NodeKind::Assert, vec![Node::var("a"), Node::var("hidden")]),
        // As an rvalue, child 1 is the field name.
        (NodeKind::ObjectRef, vec![Node::var("a"), Node::var("hidden")]),
    ];

    for (kind, children) in cases {
        let expected = vec![
            format!("visit {}", kind),
            "visit Var a".to_string(),
            "leave Var a".to_string(),
            format!("leave {}", kind),
        ];
        assert_eq!(trace_body(Node::new(kind, children)), expected, "{}", kind);
    }
}

#[test]
fn test_block_expr_value_visits_all_children() {
    let value = Node::new(NodeKind::BlockExpr, vec![Node::var("a"), Node::var("b")]);
    assert_eq!(
        trace_body(value),
        lines(&[
            "visit BlockExpr",
            "visit Var a",
            "leave Var a",
            "visit Var b",
            "leave Var b",
            "leave BlockExpr",
        ])
    );
}

#[test]
fn test_decl_stmt_visits_initializer_only() {
    let with_init = Node::new(
        NodeKind::DeclStmt,
        vec![
            Node::constant("x"),
            Node::constant("var"),
            Node::constant(false),
            Node::var("init"),
        ],
    );
    assert_eq!(
        trace_body(with_init),
        lines(&["visit DeclStmt", "visit Var init", "leave Var init", "leave DeclStmt"])
    );

    let without_init = Node::new(
        NodeKind::DeclStmt,
        vec![Node::constant("x"), Node::constant("var"), Node::constant(false)],
    );
    assert_eq!(trace_body(without_init), lines(&["visit DeclStmt", "leave DeclStmt"]));
}

#[test]
fn test_return_and_label() {
    let bare = Node::new(NodeKind::Return, vec![]);
    assert_eq!(trace_body(bare), lines(&["visit Return", "leave Return"]));

    let label = Node::new(NodeKind::LabelStmt, vec![Node::constant("L"), Node::var("s")]);
    assert_eq!(
        trace_body(label),
        lines(&[
            "visit LabelStmt",
            "visit Constant L",
            "leave Constant L",
            "visit Var s",
            "leave Var s",
            "leave LabelStmt",
        ])
    );
}

#[test]
fn test_if_goto_shapes() {
    let short = Node::new(NodeKind::IfGoto, vec![Node::var("c")]);
    assert_eq!(
        trace_body(short),
        lines(&["visit IfGoto", "visit Var c", "leave Var c", "leave IfGoto"])
    );

    let long = Node::new(
        NodeKind::IfGoto,
        vec![Node::operator("<"), Node::var("a"), Node::var("b")],
    );
    assert_eq!(
        trace_body(long),
        lines(&["visit IfGoto", "visit Var a", "leave Var a", "visit Var b", "leave Var b", "leave IfGoto"])
    );
}

#[test]
fn test_object_literal_field_init_hooks() {
    let literal = Node::new(
        NodeKind::ObjectLiteral,
        vec![
            Node::new(NodeKind::New, vec![Node::constant("Object")]),
            Node::constant("a"),
            Node::constant(1),
            Node::constant("b"),
            Node::var("x"),
        ],
    );
    let trace = trace_body(literal);
    assert_eq!(
        trace,
        lines(&[
            "visit ObjectLiteral",
            "visit New",
            "leave New",
            "visit Constant a",
            "leave Constant a",
            "visit Constant 1",
            "leave Constant 1",
            "leave_object_literal_field_init ObjectLiteral [1]",
            "visit Constant b",
            "leave Constant b",
            "visit Var x",
            "leave Var x",
            "leave_object_literal_field_init ObjectLiteral [3]",
            "leave ObjectLiteral",
        ])
    );
    let field_inits = trace
        .iter()
        .filter(|line| line.starts_with("leave_object_literal_field_init"))
        .count();
    assert_eq!(field_inits, 2);
}

#[test]
fn test_array_literal_element_hooks() {
    let literal = Node::new(
        NodeKind::ArrayLiteral,
        vec![
            Node::new(NodeKind::New, vec![Node::constant("Array")]),
            Node::constant(1),
            Node::constant(2),
        ],
    );
    assert_eq!(
        trace_body(literal),
        lines(&[
            "visit ArrayLiteral",
            "visit New",
            "leave New",
            "leave_array_literal_object ArrayLiteral",
            "visit Constant 1",
            "leave Constant 1",
            "leave_array_literal_init_element ArrayLiteral [1]",
            "visit Constant 2",
            "leave Constant 2",
            "leave_array_literal_init_element ArrayLiteral [2]",
            "leave ArrayLiteral",
        ])
    );
}

#[test]
fn test_switch_and_try() {
    let switch = Node::new(NodeKind::Switch, vec![Node::var("v"), block(vec![])]);
    assert_eq!(
        trace_body(switch),
        lines(&[
            "visit Switch",
            "visit Var v",
            "leave Var v",
            "leave_switch_value Switch",
            "visit BlockStmt",
            "leave BlockStmt",
            "leave Switch",
        ])
    );

    let try_stmt = Node::new(
        NodeKind::Try,
        vec![
            block(vec![]),
            Node::new(NodeKind::Catch, vec![Node::constant("e"), block(vec![])]),
        ],
    );
    assert_eq!(
        trace_body(try_stmt),
        lines(&[
            "visit Try",
            "visit BlockStmt",
            "leave BlockStmt",
            "leave_try_block Try",
            "visit Catch",
            "visit BlockStmt",
            "leave BlockStmt",
            "leave Catch",
            "leave Try",
        ])
    );
}

#[test]
fn test_leaf_kinds_have_no_children_visited() {
    for kind in [
        NodeKind::FunctionExpr,
        NodeKind::FunctionStmt,
        NodeKind::GetCaughtException,
        NodeKind::This,
        NodeKind::Super,
        NodeKind::Goto,
        NodeKind::Empty,
        NodeKind::Primitive,
        NodeKind::Void,
    ] {
        let node = Node::new(kind, vec![Node::var("hidden")]);
        assert_eq!(
            trace_body(node),
            vec![format!("visit {}", kind), format!("leave {}", kind)],
            "{kind}"
        );
    }
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn test_pre_op_array_target_uses_pre_variants() {
    let body = Node::new(
        NodeKind::AssignPreOp,
        vec![
            array_ref(Node::var("a"), Node::var("i")),
            Node::var("v"),
            Node::operator("+"),
        ],
    );
    let trace = trace_body(body);
    assert_eq!(
        trace,
        lines(&[
            "visit AssignPreOp",
            "visit Var v",
            "leave Var v",
            "visit_array_ref_assign_op ArrayRef (pre)",
            "visit Var a",
            "leave Var a",
            "visit Var i",
            "leave Var i",
            "leave_array_ref_assign_op ArrayRef (pre)",
            "leave AssignPreOp",
        ])
    );
    assert!(!trace.iter().any(|line| line.contains("(post)")));
    assert!(!trace.iter().any(|line| line.starts_with("visit_array_ref_assign ")));
}

#[test]
fn test_array_target_visits_base_and_index() {
    // a[0] = y
    let body = assign(array_ref(Node::var("a"), Node::constant(0)), Node::var("y"));
    assert_eq!(
        trace_body(body),
        lines(&[
            "visit Assign",
            "visit Var y",
            "leave Var y",
            "visit_array_ref_assign ArrayRef",
            "visit Var a",
            "leave Var a",
            "visit Constant 0",
            "leave Constant 0",
            "leave_array_ref_assign ArrayRef",
            "leave Assign",
        ])
    );
}

#[test]
fn test_post_op_field_target() {
    let body = Node::new(
        NodeKind::AssignPostOp,
        vec![object_ref(Node::var("o"), "count"), Node::constant(1), Node::operator("+")],
    );
    assert_eq!(
        trace_body(body),
        lines(&[
            "visit AssignPostOp",
            "visit Constant 1",
            "leave Constant 1",
            "visit_object_ref_assign_op ObjectRef (post)",
            "visit Var o",
            "leave Var o",
            "leave_object_ref_assign_op ObjectRef (post)",
            "leave AssignPostOp",
        ])
    );
}

#[test]
fn test_variable_target_has_no_child_visits() {
    let trace = trace_body(assign(Node::var("y"), Node::constant(1)));
    let after_rhs: Vec<_> = trace
        .iter()
        .skip_while(|line| *line != "leave Constant 1")
        .skip(1)
        .cloned()
        .collect();
    assert_eq!(
        after_rhs,
        lines(&["visit_var_assign Var y", "leave_var_assign Var y", "leave Assign"])
    );
}

#[test]
fn test_block_target_dispatches_last_child_only() {
    let target = Node::new(NodeKind::BlockExpr, vec![Node::var("t"), Node::var("y")]);
    assert_eq!(
        trace_body(assign(target, Node::constant(1))),
        lines(&[
            "visit Assign",
            "visit Constant 1",
            "leave Constant 1",
            "visit_block_expr_assign BlockExpr",
            "visit_var_assign Var y",
            "leave_var_assign Var y",
            "leave_block_expr_assign BlockExpr",
            "leave Assign",
        ])
    );
}

// ============================================================================
// Short-circuiting
// ============================================================================

#[test]
fn test_short_circuit_suppresses_children_and_leave() {
    let body = Node::new(
        NodeKind::IfStmt,
        vec![Node::var("x"), block(vec![Node::var("y")])],
    );
    let recorder = EventRecorder::new().with_short_circuit(NodeKind::IfStmt);
    assert_eq!(trace_body_with(recorder, body), lines(&["visit IfStmt"]));
}

#[test]
fn test_short_circuit_still_post_processes() {
    let body = block(vec![Node::new(NodeKind::Loop, vec![Node::var("c"), Node::var("b")])]);
    let recorder = EventRecorder::new()
        .with_short_circuit(NodeKind::Loop)
        .with_bookkeeping(true);
    assert_eq!(
        trace_body_with(recorder, body),
        lines(&[
            "enter_node BlockStmt",
            "visit BlockStmt",
            "enter_node Loop",
            "visit Loop",
            "post_process_node Loop",
            "leave BlockStmt",
            "post_process_node BlockStmt",
        ])
    );
}

#[test]
fn test_short_circuited_node_still_hoists_scoped_entities() {
    // Hoisting after a short-circuited node is kept on purpose and is
    // configurable through `rescan_node_scopes`.
    let stmt = Node::new(NodeKind::IfStmt, vec![Node::var("x"), block(vec![])]);
    let stmt_id = stmt.id();
    let function = Entity::function("f")
        .with_node_scoped(stmt_id, Entity::function("hoisted"))
        .with_ast(stmt);

    let mut walker = Walker::new(EventRecorder::new().with_short_circuit(NodeKind::IfStmt));
    walker.walk(&function, &EntityContext::new(&function)).unwrap();
    assert_eq!(common::entered(walker.visitor()), vec!["f", "hoisted"]);

    let recorder = record(&function, WalkOptions::default());
    assert_eq!(common::entered(&recorder), vec!["f", "hoisted"]);

    let mut walker = Walker::new(EventRecorder::new().with_short_circuit(NodeKind::IfStmt))
        .with_options(WalkOptions::default().with_rescan_node_scopes(false));
    walker.walk(&function, &EntityContext::new(&function)).unwrap();
    assert_eq!(common::entered(walker.visitor()), vec!["f"]);
}

// ============================================================================
// Contexts
// ============================================================================

fn context_of<'e>(events: &'e [WalkEvent], line: &str) -> &'e WalkEvent {
    events
        .iter()
        .find(|event| event.to_string() == line)
        .unwrap_or_else(|| panic!("no event {line}"))
}

#[test]
fn test_unwind_contexts() {
    let unwind = |protected: &str, cleanup: &str| {
        Node::new(
            NodeKind::Unwind,
            vec![block(vec![Node::var(protected)]), block(vec![Node::var(cleanup)])],
        )
    };
    let function = Entity::function("f").with_ast(block(vec![unwind("p1", "c1"), unwind("p2", "c2")]));
    let recorder = record(&function, WalkOptions::default());
    let events = recorder.events();

    let outer = context_of(events, "visit BlockStmt").context;
    let p1 = context_of(events, "visit Var p1").context;
    let p2 = context_of(events, "visit Var p2").context;
    let c1 = context_of(events, "visit Var c1").context;
    let c2 = context_of(events, "visit Var c2").context;

    assert_eq!(c1, outer);
    assert_eq!(c2, outer);
    assert_ne!(p1, outer);
    assert_ne!(p2, outer);
    assert_ne!(p1, p2);

    let derived: Vec<_> = events
        .iter()
        .filter(|event| event.hook == "make_unwind_context")
        .collect();
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[0].subject, "BlockStmt");
    assert_eq!(derived[0].context, p1);
    assert_eq!(derived[1].context, p2);

    let leave_unwind: Vec<_> = events
        .iter()
        .filter(|event| event.to_string() == "leave Unwind")
        .map(|event| event.context)
        .collect();
    assert_eq!(leave_unwind, vec![outer, outer]);
}

#[test]
fn test_local_scope_context() {
    let function = Entity::function("f").with_ast(Node::new(
        NodeKind::LocalScope,
        vec![block(vec![Node::var("x")])],
    ));
    let recorder = record(&function, WalkOptions::default());
    let events = recorder.events();

    let visit_scope = context_of(events, "visit LocalScope").context;
    let inner = context_of(events, "visit Var x").context;
    let leave_scope = context_of(events, "leave LocalScope").context;

    assert_ne!(inner, visit_scope);
    assert_eq!(leave_scope, visit_scope);
    assert_eq!(context_of(events, "make_local_context LocalScope").context, inner);
}

#[test]
fn test_events_serialize_to_json() {
    let function = Entity::function("f").with_ast(Node::new(
        NodeKind::AssignPreOp,
        vec![Node::var("i"), Node::constant(1), Node::operator("+")],
    ));
    let recorder = record(&function, WalkOptions::default());
    let json: serde_json::Value = serde_json::from_str(&recorder.to_json().unwrap()).unwrap();

    let hook = json
        .as_array()
        .unwrap()
        .iter()
        .find(|event| event["hook"] == "visit_var_assign_op")
        .unwrap();
    assert_eq!(hook["subject"], "Var i");
    assert_eq!(hook["order"], "pre");
    assert!(hook.get("index").is_none());

    let events = recorder.into_events();
    assert_eq!(events.len(), json.as_array().map_or(0, Vec::len));
}
