use crate::error::DefinitionError;
use crate::flow::{FlowDefinition, NodeDefinition, RoutingRule};
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::{Map, Value};

/// Fluent constructor for [`NodeDefinition`].
pub struct NodeBuilder {
    node: NodeDefinition,
}

impl NodeBuilder {
    pub fn new(id: impl Into<String>, handler_ref: impl Into<String>) -> Self {
        Self {
            node: NodeDefinition::new(id, handler_ref),
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.node.depth = depth;
        self
    }

    pub fn default_input(mut self, input: Map<String, Value>) -> Self {
        self.node.default_input = input;
        self
    }

    pub fn input(mut self, key: impl Into<String>, value: Value) -> Self {
        self.node.default_input.insert(key.into(), value);
        self
    }

    pub fn presentation(mut self, options: Value) -> Self {
        self.node.presentation = options;
        self
    }

    /// Appends an unconditional routing rule. Order matters: rules are
    /// evaluated in the order they were added.
    pub fn route_always(mut self, target: impl Into<String>) -> Self {
        self.node.routing_rules.push(RoutingRule::always(target));
        self
    }

    /// Appends a conditional routing rule.
    pub fn route_when<F>(mut self, predicate: F, target: impl Into<String>) -> Self
    where
        F: Fn(&Value, &AHashMap<String, Value>, &Map<String, Value>) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.node
            .routing_rules
            .push(RoutingRule::when(predicate, target));
        self
    }

    pub fn build(self) -> NodeDefinition {
        self.node
    }
}

/// Fluent constructor for [`FlowDefinition`]. `build` validates the routing
/// graph: duplicate ids, an undefined start node, and rules targeting
/// undefined nodes are all rejected before any instance can run.
pub struct FlowBuilder {
    name: String,
    title: String,
    start_node_id: String,
    nodes: Vec<NodeDefinition>,
}

impl FlowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            start_node_id: String::new(),
            nodes: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn start(mut self, node_id: impl Into<String>) -> Self {
        self.start_node_id = node_id.into();
        self
    }

    pub fn node(mut self, node: impl Into<NodeDefinition>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn build(self) -> Result<FlowDefinition, DefinitionError> {
        if self.nodes.is_empty() {
            return Err(DefinitionError::EmptyFlow(self.name));
        }

        if let Some(dup) = self.nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
            return Err(DefinitionError::DuplicateNode(dup.to_string()));
        }

        let nodes: AHashMap<String, NodeDefinition> = self
            .nodes
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();

        if !nodes.contains_key(&self.start_node_id) {
            return Err(DefinitionError::UnknownStartNode(self.start_node_id));
        }

        for node in nodes.values() {
            for rule in &node.routing_rules {
                if !nodes.contains_key(&rule.target) {
                    return Err(DefinitionError::UnknownRouteTarget {
                        node_id: node.id.clone(),
                        target_id: rule.target.clone(),
                    });
                }
            }
        }

        Ok(FlowDefinition {
            name: self.name,
            title: self.title,
            start_node_id: self.start_node_id,
            nodes,
        })
    }
}

impl From<NodeBuilder> for NodeDefinition {
    fn from(builder: NodeBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = FlowBuilder::new("f")
            .start("a")
            .node(NodeBuilder::new("a", "h"))
            .node(NodeBuilder::new("a", "h"))
            .build()
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateNode("a".to_string()));
    }

    #[test]
    fn empty_flow_is_rejected() {
        let err = FlowBuilder::new("f").start("a").build().unwrap_err();
        assert_eq!(err, DefinitionError::EmptyFlow("f".to_string()));
    }
}
