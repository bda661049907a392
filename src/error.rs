use thiserror::Error;

/// Errors detected while building a `FlowDefinition`, before any instance runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Node id '{0}' is defined more than once in the flow")]
    DuplicateNode(String),

    #[error("Start node '{0}' is not defined in the flow")]
    UnknownStartNode(String),

    #[error("Node '{node_id}' has a routing rule targeting undefined node '{target_id}'")]
    UnknownRouteTarget { node_id: String, target_id: String },

    #[error("Flow '{0}' defines no nodes")]
    EmptyFlow(String),
}

/// Configuration errors raised against a running (or starting) instance.
///
/// These are always recoverable: the attempted operation is rejected as a
/// whole and the instance stays in its last valid, invariant-satisfying
/// state. The engine never panics on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowConfigError {
    #[error("Start override '{0}' is not defined in the flow")]
    UnknownStartOverride(String),

    #[error("No node is active at depth {0}")]
    NoActiveNode(u32),

    #[error("Node '{node_id}' routed to unknown node '{target_id}'")]
    UnknownRouteTarget { node_id: String, target_id: String },
}
