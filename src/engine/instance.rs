use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use ahash::AHashMap;

/// Identifies one `start` of the engine. Operations minted for an older
/// generation are discarded instead of mutating a newer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(pub(crate) u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// The accumulated result of a finished flow, handed out on termination.
#[derive(Debug, Clone, Serialize)]
pub struct FlowCompletion {
    /// Name of the flow definition this instance ran.
    pub flow: String,
    /// Most recent output of every node that completed at least once.
    pub outputs: AHashMap<String, Value>,
}

/// Runtime state of one active flow: one entry per open presentation layer,
/// plus the data accumulated across the whole sequence.
///
/// Invariants, upheld by every engine operation:
/// - `active_by_depth` and `history_by_depth` share the same key set;
/// - every open depth's history is non-empty and ends with that depth's
///   active node;
/// - depth 0 is open for as long as the instance exists.
#[derive(Debug, Clone)]
pub struct FlowInstance {
    pub(crate) active_by_depth: BTreeMap<u32, String>,
    pub(crate) history_by_depth: BTreeMap<u32, Vec<String>>,
    pub(crate) outputs: AHashMap<String, Value>,
    pub(crate) context: Map<String, Value>,
    pub(crate) generation: Generation,
}

impl FlowInstance {
    pub(crate) fn new(
        start_node_id: String,
        outputs: AHashMap<String, Value>,
        context: Map<String, Value>,
        generation: Generation,
    ) -> Self {
        let mut active_by_depth = BTreeMap::new();
        let mut history_by_depth = BTreeMap::new();
        active_by_depth.insert(0, start_node_id.clone());
        history_by_depth.insert(0, vec![start_node_id]);
        Self {
            active_by_depth,
            history_by_depth,
            outputs,
            context,
            generation,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Node currently active at `depth`, if that depth is open.
    pub fn active_node(&self, depth: u32) -> Option<&str> {
        self.active_by_depth.get(&depth).map(String::as_str)
    }

    /// Open depths in ascending order (lowest renders behind, highest in
    /// front).
    pub fn open_depths(&self) -> impl Iterator<Item = u32> + '_ {
        self.active_by_depth.keys().copied()
    }

    /// Whether back-navigation at `depth` would pop within the same layer
    /// (as opposed to closing it or ending the flow).
    pub fn can_go_back(&self, depth: u32) -> bool {
        self.history_by_depth
            .get(&depth)
            .is_some_and(|h| h.len() > 1)
    }

    pub fn history(&self, depth: u32) -> Option<&[String]> {
        self.history_by_depth.get(&depth).map(Vec::as_slice)
    }

    /// Most recent output recorded for `node_id`, if any.
    pub fn output(&self, node_id: &str) -> Option<&Value> {
        self.outputs.get(node_id)
    }

    pub fn outputs(&self) -> &AHashMap<String, Value> {
        &self.outputs
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    pub(crate) fn into_completion(self, flow: String) -> FlowCompletion {
        FlowCompletion {
            flow,
            outputs: self.outputs,
        }
    }

    #[cfg(debug_assertions)]
    pub(crate) fn assert_invariants(&self) {
        debug_assert!(
            self.active_by_depth.keys().eq(self.history_by_depth.keys()),
            "active and history depth sets diverged"
        );
        for (depth, history) in &self.history_by_depth {
            debug_assert_eq!(
                history.last().map(String::as_str),
                self.active_by_depth.get(depth).map(String::as_str),
                "history tail and active node diverged at depth {depth}"
            );
        }
        debug_assert!(
            self.active_by_depth.contains_key(&0),
            "open instance lost its base depth"
        );
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn assert_invariants(&self) {}
}
