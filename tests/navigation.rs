//! Depth-transition and history tests: stacking, shallower jumps, cascade
//! closing, and the history clamp.
mod common;
use common::*;
use kasane::engine::MAX_HISTORY_PER_DEPTH;
use kasane::prelude::*;
use serde_json::json;

fn stack_to_depth_3() -> (FlowEngine, Generation) {
    let mut engine = FlowEngine::new(create_stacked_flow());
    let generation = engine.start(StartOptions::default()).unwrap();
    engine.complete_node(generation, 0, json!({})).unwrap();
    engine.complete_node(generation, 1, json!({})).unwrap();
    engine.complete_node(generation, 2, json!({})).unwrap();
    (engine, generation)
}

#[test]
fn deeper_transitions_stack_overlays() {
    let (engine, _) = stack_to_depth_3();
    let instance = engine.instance().unwrap();
    assert_eq!(instance.open_depths().collect::<Vec<_>>(), [0, 1, 2, 3]);
    assert_eq!(instance.active_node(0), Some("base"));
    assert_eq!(instance.active_node(3), Some("o3"));
    // Each overlay opened fresh with a single-entry history.
    for depth in 1..=3 {
        assert_eq!(instance.history(depth).unwrap().len(), 1);
    }
    assert_instance_invariants(instance);
}

#[test]
fn shallower_transition_closes_all_depths_above_target() {
    let (mut engine, generation) = stack_to_depth_3();

    // "o3" (depth 3) routes to "landing" (depth 1): every depth above 1
    // closes and depth 1 is re-rooted, whatever history it had.
    engine.complete_node(generation, 3, json!({})).unwrap();

    let instance = engine.instance().unwrap();
    assert_eq!(instance.open_depths().collect::<Vec<_>>(), [0, 1]);
    assert_eq!(instance.active_node(1), Some("landing"));
    assert_eq!(instance.history(1).unwrap(), ["landing"]);
    // The base layer was never touched.
    assert_eq!(instance.active_node(0), Some("base"));
    assert_eq!(instance.history(0).unwrap(), ["base"]);
    assert_instance_invariants(instance);
}

#[test]
fn back_pops_within_a_layer_before_closing_it() {
    let flow = FlowBuilder::new("chain")
        .start("s1")
        .node(NodeBuilder::new("s1", "form").route_always("s2"))
        .node(NodeBuilder::new("s2", "form").route_always("s3"))
        .node(NodeBuilder::new("s3", "form"))
        .build()
        .unwrap();
    let mut engine = FlowEngine::new(flow);
    let generation = engine.start(StartOptions::default()).unwrap();
    engine.complete_node(generation, 0, json!({})).unwrap();
    engine.complete_node(generation, 0, json!({})).unwrap();
    assert_eq!(engine.instance().unwrap().history(0).unwrap(), ["s1", "s2", "s3"]);

    assert!(matches!(engine.go_back(generation, 0), Progress::Advanced));
    assert_eq!(engine.instance().unwrap().active_node(0), Some("s2"));

    assert!(matches!(engine.go_back(generation, 0), Progress::Advanced));
    assert_eq!(engine.instance().unwrap().active_node(0), Some("s1"));
    assert!(!engine.instance().unwrap().can_go_back(0));

    // History exhausted at the base layer: the flow ends.
    assert!(matches!(engine.go_back(generation, 0), Progress::Finished(_)));
    assert!(!engine.is_open());
}

#[test]
fn close_depth_cascades_upward_only() {
    let (mut engine, _) = stack_to_depth_3();

    assert!(matches!(engine.close_depth(2), Progress::Advanced));
    let instance = engine.instance().unwrap();
    assert_eq!(instance.open_depths().collect::<Vec<_>>(), [0, 1]);
    assert_eq!(instance.active_node(1), Some("o1"));
    assert_instance_invariants(instance);

    // Closing an already-closed depth changes nothing.
    assert!(matches!(engine.close_depth(3), Progress::Advanced));
    assert_eq!(
        engine.instance().unwrap().open_depths().collect::<Vec<_>>(),
        [0, 1]
    );
}

#[test]
fn close_depth_zero_ends_the_flow_with_a_snapshot() {
    let (mut engine, _) = stack_to_depth_3();
    let Progress::Finished(completion) = engine.close_depth(0) else {
        panic!("closing the base layer must end the flow");
    };
    assert_eq!(completion.flow, "stacked");
    assert!(completion.outputs.contains_key("base"));
    assert!(!engine.is_open());
    assert!(matches!(engine.close_depth(0), Progress::Stale));
}

#[test]
fn back_on_stale_or_unopened_overlay_depth_is_harmless() {
    let mut engine = FlowEngine::new(create_stacked_flow());
    let generation = engine.start(StartOptions::default()).unwrap();

    // Depth 2 was never opened; back-navigation there closes nothing and
    // the instance survives.
    assert!(matches!(engine.go_back(generation, 2), Progress::Advanced));
    assert!(engine.is_open());
    assert_eq!(
        engine.instance().unwrap().open_depths().collect::<Vec<_>>(),
        [0]
    );
}

#[test]
fn history_is_clamped_under_pathological_cycles() {
    let mut engine = FlowEngine::new(create_cyclic_flow());
    let generation = engine.start(StartOptions::default()).unwrap();

    for _ in 0..(MAX_HISTORY_PER_DEPTH * 3) {
        engine.complete_node(generation, 0, json!({})).unwrap();
    }

    let instance = engine.instance().unwrap();
    let history = instance.history(0).unwrap();
    assert_eq!(history.len(), MAX_HISTORY_PER_DEPTH);
    assert_eq!(history.last().map(String::as_str), instance.active_node(0));
    assert_instance_invariants(instance);
}

#[test]
fn overlay_reentry_after_shallower_jump_is_fresh() {
    let (mut engine, generation) = stack_to_depth_3();
    engine.complete_node(generation, 3, json!({})).unwrap();

    // "landing" has no rules; completing it ends the flow even though
    // depth 0 is still open underneath.
    let progress = engine.complete_node(generation, 1, json!({"done": true})).unwrap();
    assert!(matches!(progress, Progress::Finished(_)));
}
