//! Prelude module for convenient imports
//!
//! Re-exports the types most integrations touch: the authoring builders,
//! the engine with its lifecycle operations, and the handler/surface
//! contracts.
//!
//! # Example
//!
//! ```rust
//! use kasane::prelude::*;
//! use serde_json::json;
//!
//! # fn run_example() -> Result<()> {
//! let flow = FlowBuilder::new("onboarding")
//!     .start("welcome")
//!     .node(NodeBuilder::new("welcome", "info").route_always("profile"))
//!     .node(NodeBuilder::new("profile", "form"))
//!     .build()?;
//!
//! let mut engine = FlowEngine::new(flow);
//! let generation = engine.start(StartOptions::default())?;
//! engine.complete_node(generation, 0, json!({"ack": true}))?;
//! # Ok(())
//! # }
//! ```

// Authoring
pub use crate::flow::{
    FlowBuilder, FlowDefinition, NodeBuilder, NodeDefinition, RoutePredicate, RoutingRule,
};

// Runtime
pub use crate::engine::{
    FlowCompletion, FlowEngine, FlowInstance, Generation, Progress, StartOptions,
};

// Integration contracts
pub use crate::handler::{HandlerRegistry, StepEnvelope, StepHandler};
pub use crate::surface::Surface;

// Error types
pub use crate::error::{DefinitionError, FlowConfigError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
