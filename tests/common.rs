//! Common test utilities for building flow definitions.
use kasane::prelude::*;
use serde_json::json;

/// The branching flow used by the scenario tests.
///
/// Logic: `a` (depth 0) routes to `b` (depth 0) when `output.x == 1`,
/// otherwise falls through to `c` (depth 1 overlay). `b` only routes
/// onward when asked to go deeper; `c` has no rules and therefore
/// terminates the flow when completed.
#[allow(dead_code)]
pub fn create_branching_flow() -> FlowDefinition {
    FlowBuilder::new("test-flow")
        .title("Branching test flow")
        .start("a")
        .node(
            NodeBuilder::new("a", "form")
                .route_when(|output, _, _| output["x"] == json!(1), "b")
                .route_always("c"),
        )
        .node(
            NodeBuilder::new("b", "form")
                .route_when(|output, _, _| output["go"] == json!("deeper"), "c"),
        )
        .node(NodeBuilder::new("c", "overlay").depth(1))
        .build()
        .expect("branching flow should validate")
}

/// A four-layer flow for depth-transition tests.
///
/// `base` (0) -> `o1` (1) -> `o2` (2) -> `o3` (3), and completing `o3`
/// jumps shallower to `landing` (1).
#[allow(dead_code)]
pub fn create_stacked_flow() -> FlowDefinition {
    FlowBuilder::new("stacked")
        .start("base")
        .node(NodeBuilder::new("base", "form").route_always("o1"))
        .node(NodeBuilder::new("o1", "overlay").depth(1).route_always("o2"))
        .node(NodeBuilder::new("o2", "overlay").depth(2).route_always("o3"))
        .node(
            NodeBuilder::new("o3", "overlay")
                .depth(3)
                .route_always("landing"),
        )
        .node(NodeBuilder::new("landing", "overlay").depth(1))
        .build()
        .expect("stacked flow should validate")
}

/// Two depth-0 nodes routing to each other forever; exercises the history
/// clamp.
#[allow(dead_code)]
pub fn create_cyclic_flow() -> FlowDefinition {
    FlowBuilder::new("cycle")
        .start("ping")
        .node(NodeBuilder::new("ping", "form").route_always("pong"))
        .node(NodeBuilder::new("pong", "form").route_always("ping"))
        .build()
        .expect("cyclic flow should validate")
}

/// Asserts the cross-map invariants that must hold for every open
/// instance.
#[allow(dead_code)]
pub fn assert_instance_invariants(instance: &FlowInstance) {
    let depths: Vec<u32> = instance.open_depths().collect();
    assert!(depths.contains(&0), "open instance must keep depth 0");
    for depth in depths {
        let history = instance
            .history(depth)
            .expect("every open depth must have a history");
        assert!(!history.is_empty(), "history at depth {depth} is empty");
        assert_eq!(
            history.last().map(String::as_str),
            instance.active_node(depth),
            "history tail and active node diverged at depth {depth}"
        );
    }
}
