// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shared helpers for castwalk-visit integration tests.

#![allow(dead_code)]

use castwalk_core::{Entity, Node, NodeKind};
use castwalk_visit::{EntityContext, EventRecorder, WalkOptions, Walker};
use tracing_subscriber::EnvFilter;

/// Route walker logs to the test harness. Set `RUST_LOG=castwalk_visit=trace`
/// to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The node-level lines of a recorder's trace.
pub fn node_trace(recorder: &EventRecorder) -> Vec<String> {
    recorder
        .events()
        .iter()
        .filter(|event| event.node.is_some())
        .map(ToString::to_string)
        .collect()
}

/// Walk `body` as the body of a function and return the node-level trace.
pub fn trace_body(body: Node) -> Vec<String> {
    trace_body_with(EventRecorder::new(), body)
}

pub fn trace_body_with(recorder: EventRecorder, body: Node) -> Vec<String> {
    init_tracing();
    let function = Entity::function("f").with_ast(body);
    let mut walker = Walker::new(recorder);
    walker
        .walk(&function, &EntityContext::new(&function))
        .expect("walk failed");
    node_trace(walker.visitor())
}

/// Walk `root` with a recorder and the given options.
pub fn record(root: &Entity, options: WalkOptions) -> EventRecorder {
    init_tracing();
    let mut walker = Walker::new(EventRecorder::new()).with_options(options);
    walker
        .walk(root, &EntityContext::new(root))
        .expect("walk failed");
    walker.into_visitor()
}

/// Names of the entities entered, in order.
pub fn entered(recorder: &EventRecorder) -> Vec<String> {
    recorder
        .events()
        .iter()
        .filter(|event| event.hook == "enter_entity")
        .map(|event| event.subject.clone())
        .collect()
}

pub fn block(children: Vec<Node>) -> Node {
    Node::new(NodeKind::BlockStmt, children)
}

pub fn assign(target: Node, rhs: Node) -> Node {
    Node::new(NodeKind::Assign, vec![target, rhs])
}

/// `base[index]`, with the element type in child 1.
pub fn array_ref(base: Node, index: Node) -> Node {
    Node::new(NodeKind::ArrayRef, vec![base, Node::constant("int"), index])
}

pub fn object_ref(object: Node, field: &str) -> Node {
    Node::new(NodeKind::ObjectRef, vec![object, Node::constant(field)])
}

/// The expected visit/leave pair of a leaf.
pub fn leaf_lines(subject: &str) -> Vec<String> {
    vec![format!("visit {}", subject), format!("leave {}", subject)]
}

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
