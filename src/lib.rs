//! # Kasane - Layered Flow Navigation Engine
//!
//! **Kasane** drives multi-step interactive sequences ("flows") composed of
//! discrete steps ("nodes"), where steps can be presented as stacked
//! overlay layers ("depths"), each layer keeping its own back-navigation
//! history, with conditional branching between steps and data accumulated
//! across the whole sequence.
//!
//! The engine is a small, purely synchronous graph-traversal state machine
//! with nested undo-stacks. It performs no I/O, renders nothing, and never
//! invokes a step implementation itself; those concerns belong to the
//! integrator's presentation adapter and handler registry.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: build a [`FlowDefinition`](flow::FlowDefinition) with
//!     [`FlowBuilder`](flow::FlowBuilder) — a named graph of nodes, each
//!     with a handler reference, a declared depth, and ordered routing
//!     rules. `build` validates the graph (undefined targets, duplicate
//!     ids) before any instance can run.
//! 2.  **Start**: hand the definition to a [`FlowEngine`](engine::FlowEngine)
//!     and call `start`, optionally deep-linking into an arbitrary node
//!     with pre-seeded parameters.
//! 3.  **Render**: read [`surfaces`](engine::FlowEngine::surfaces) — one
//!     surface per open depth, ascending — and present each with the
//!     handler resolved through a [`HandlerRegistry`](handler::HandlerRegistry).
//! 4.  **Navigate**: report user interaction back through `complete_node`,
//!     `go_back`, `close_depth`, and `update_context`; the engine computes
//!     the next set of open layers or signals that the flow finished.
//!
//! ## Quick Start
//!
//! ```rust
//! use kasane::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     // A three-step flow: "ask" branches on its output, either to a
//!     // same-layer "confirm" step or to a "details" overlay on depth 1.
//!     let flow = FlowBuilder::new("signup")
//!         .title("Sign up")
//!         .start("ask")
//!         .node(
//!             NodeBuilder::new("ask", "choice-form")
//!                 .route_when(|output, _, _| output["plan"] == json!("basic"), "confirm")
//!                 .route_always("details"),
//!         )
//!         .node(NodeBuilder::new("confirm", "summary"))
//!         .node(NodeBuilder::new("details", "payment-form").depth(1))
//!         .build()?;
//!
//!     let mut engine = FlowEngine::new(flow);
//!     let generation = engine.start(StartOptions::default())?;
//!
//!     // The base layer shows "ask"; completing it with a non-basic plan
//!     // opens the "details" overlay on top.
//!     engine.complete_node(generation, 0, json!({"plan": "pro"}))?;
//!     let depths: Vec<u32> = engine.surfaces().iter().map(|s| s.depth).collect();
//!     assert_eq!(depths, vec![0, 1]);
//!
//!     // Dismissing the overlay falls back to the base layer.
//!     engine.go_back(generation, 1);
//!     assert_eq!(engine.surfaces().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod flow;
pub mod handler;
pub mod prelude;
pub mod surface;
