//! The presentation adapter contract.
//!
//! An adapter renders one surface per open depth, lowest first (behind) and
//! highest last (front), and wires each surface's dismiss/back affordances
//! to `go_back` / `close_depth` for that depth.

use crate::engine::{FlowEngine, Generation};
use serde_json::Value;

/// One renderable layer of an open flow.
#[derive(Debug, Clone)]
pub struct Surface {
    pub depth: u32,
    pub node_id: String,
    pub handler_ref: String,
    /// Opaque presentation options from the node definition, passed through
    /// untouched.
    pub presentation: Value,
    pub can_go_back: bool,
    pub generation: Generation,
}

impl FlowEngine {
    /// Currently open surfaces in ascending depth order. Empty when the
    /// flow is closed.
    pub fn surfaces(&self) -> Vec<Surface> {
        let Some(instance) = self.instance() else {
            return Vec::new();
        };
        instance
            .open_depths()
            .filter_map(|depth| {
                let node_id = instance.active_node(depth)?;
                let node = self.definition().node(node_id)?;
                Some(Surface {
                    depth,
                    node_id: node.id.clone(),
                    handler_ref: node.handler_ref.clone(),
                    presentation: node.presentation.clone(),
                    can_go_back: instance.can_go_back(depth),
                    generation: instance.generation(),
                })
            })
            .collect()
    }
}
