use crate::engine::{FlowEngine, Generation};
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Everything a step implementation receives when its node becomes active.
///
/// `input` is the node's `default_input` shallow-merged with the
/// accumulated outputs, so any later step can read any earlier step's
/// output keyed by that step's node id (outputs win over defaults).
#[derive(Debug, Clone)]
pub struct StepEnvelope {
    pub node_id: String,
    pub handler_ref: String,
    pub depth: u32,
    /// Pass this back with `complete_node`/`go_back`; the engine drops
    /// calls minted for a generation that is no longer live.
    pub generation: Generation,
    pub input: Map<String, Value>,
    pub context: Map<String, Value>,
    /// Whether back-navigation at this depth pops within the layer instead
    /// of closing it.
    pub can_go_back: bool,
}

impl FlowEngine {
    /// Builds the envelope for the node active at `depth`, or `None` when
    /// that depth is not open.
    pub fn envelope(&self, depth: u32) -> Option<StepEnvelope> {
        let instance = self.instance()?;
        let node_id = instance.active_node(depth)?;
        let node = self.definition().node(node_id)?;

        let mut input = node.default_input.clone();
        for (id, output) in instance.outputs() {
            input.insert(id.clone(), output.clone());
        }

        Some(StepEnvelope {
            node_id: node.id.clone(),
            handler_ref: node.handler_ref.clone(),
            depth,
            generation: instance.generation(),
            input,
            context: instance.context().clone(),
            can_go_back: instance.can_go_back(depth),
        })
    }
}

/// A concrete step implementation, keyed by the `handler_ref` it serves.
///
/// The engine never calls handlers; the integrator's driver resolves the
/// active node's `handler_ref` through a [`HandlerRegistry`] and invokes
/// the handler, which eventually reports back through
/// `FlowEngine::complete_node` (or `go_back`). `run` returning the step's
/// output is the synchronous shape of that contract; async handlers hold
/// on to the envelope's generation instead.
pub trait StepHandler: Send + Sync {
    fn handler_ref(&self) -> &str;
    fn run(&self, envelope: &StepEnvelope) -> Value;
}

/// Static map from `handler_ref` to a step implementation, resolved once
/// at startup.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: AHashMap<String, Box<dyn StepHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn StepHandler>) {
        self.handlers
            .insert(handler.handler_ref().to_string(), handler);
    }

    pub fn with(mut self, handler: Box<dyn StepHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn resolve(&self, handler_ref: &str) -> Option<&dyn StepHandler> {
        self.handlers.get(handler_ref).map(|h| h.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
