use ahash::AHashMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Signature of a routing predicate: `(output, accumulated_outputs,
/// shared_context) -> bool`. Predicates must be pure; the engine may
/// evaluate them any number of times.
pub type PredicateFn =
    dyn Fn(&Value, &AHashMap<String, Value>, &Map<String, Value>) -> bool + Send + Sync;

/// The condition half of a routing rule.
#[derive(Clone)]
pub enum RoutePredicate {
    /// Matches unconditionally. Used as the ordered fallback arm.
    Always,
    /// Matches when the wrapped function returns `true`.
    When(Arc<PredicateFn>),
}

impl RoutePredicate {
    pub fn matches(
        &self,
        output: &Value,
        outputs: &AHashMap<String, Value>,
        context: &Map<String, Value>,
    ) -> bool {
        match self {
            RoutePredicate::Always => true,
            RoutePredicate::When(f) => f(output, outputs, context),
        }
    }
}

// Closures have no useful Debug output; print the variant tag only.
impl fmt::Debug for RoutePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePredicate::Always => write!(f, "Always"),
            RoutePredicate::When(_) => write!(f, "When(..)"),
        }
    }
}

/// An ordered (predicate, target) pair. Rules are evaluated in declaration
/// order; the first match wins.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pub predicate: RoutePredicate,
    pub target: String,
}

impl RoutingRule {
    pub fn always(target: impl Into<String>) -> Self {
        Self {
            predicate: RoutePredicate::Always,
            target: target.into(),
        }
    }

    pub fn when<F>(predicate: F, target: impl Into<String>) -> Self
    where
        F: Fn(&Value, &AHashMap<String, Value>, &Map<String, Value>) -> bool
            + Send
            + Sync
            + 'static,
    {
        Self {
            predicate: RoutePredicate::When(Arc::new(predicate)),
            target: target.into(),
        }
    }
}

/// Defines a single step of a flow: which handler presents it, what layer it
/// opens on, and how it routes onward once it completes.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    pub id: String,
    /// Opaque reference to a step implementation; resolved by the caller
    /// (typically through a `HandlerRegistry`), never by the engine.
    pub handler_ref: String,
    pub default_input: Map<String, Value>,
    /// Presentation layer this node opens on. Depth 0 is the flow's base
    /// layer; higher depths render as stacked overlays above it.
    pub depth: u32,
    pub routing_rules: Vec<RoutingRule>,
    /// Opaque presentation options, passed through to surfaces untouched.
    pub presentation: Value,
}

impl NodeDefinition {
    pub fn new(id: impl Into<String>, handler_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handler_ref: handler_ref.into(),
            default_input: Map::new(),
            depth: 0,
            routing_rules: Vec::new(),
            presentation: Value::Null,
        }
    }
}

/// The complete, canonical definition of one flow: a named graph of nodes
/// with a designated start. Static and shareable across instances.
///
/// Construct through [`FlowBuilder`](crate::flow::FlowBuilder), which
/// validates the routing graph before handing the definition out.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub name: String,
    pub title: String,
    pub start_node_id: String,
    pub nodes: AHashMap<String, NodeDefinition>,
}

impl FlowDefinition {
    pub fn node(&self, id: &str) -> Option<&NodeDefinition> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}
