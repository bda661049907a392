//! The runtime half of the crate: a small, synchronous interpreter that
//! walks a validated [`FlowDefinition`] one completed step at a time.
//!
//! The engine never performs I/O and never invokes step handlers itself;
//! it only computes the next navigation state when the caller reports
//! what happened (`complete_node`, `go_back`, `close_depth`,
//! `update_context`).

pub mod history;
pub mod instance;
pub mod router;
pub mod transition;

pub use history::{BackAction, MAX_HISTORY_PER_DEPTH};
pub use instance::{FlowCompletion, FlowInstance, Generation};
pub use transition::DepthShift;

use crate::error::FlowConfigError;
use crate::flow::FlowDefinition;
use ahash::AHashMap;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Options for [`FlowEngine::start`].
///
/// `start_node_override` supports deep-link entry: the flow begins at an
/// arbitrary node (always placed at depth 0, whatever the node's declared
/// depth), with `initial_params` pre-seeding the accumulated outputs as if
/// the skipped nodes had produced them.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub start_node_override: Option<String>,
    pub initial_params: Map<String, Value>,
    pub initial_context: Map<String, Value>,
}

/// Result of a navigation operation that was accepted by the engine.
#[derive(Debug)]
pub enum Progress {
    /// The instance is still open; its surfaces changed.
    Advanced,
    /// The flow terminated; the instance has been discarded and its
    /// accumulated outputs are handed back.
    Finished(FlowCompletion),
    /// The operation carried a stale generation (or arrived after the flow
    /// closed) and was discarded without touching any state.
    Stale,
}

/// Drives one flow at a time: owns the validated definition, at most one
/// live [`FlowInstance`], and the generation counter that fences off
/// late-arriving completions from abandoned instances.
pub struct FlowEngine {
    definition: FlowDefinition,
    instance: Option<FlowInstance>,
    generations: u64,
}

impl FlowEngine {
    pub fn new(definition: FlowDefinition) -> Self {
        Self {
            definition,
            instance: None,
            generations: 0,
        }
    }

    pub fn definition(&self) -> &FlowDefinition {
        &self.definition
    }

    pub fn instance(&self) -> Option<&FlowInstance> {
        self.instance.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.instance.is_some()
    }

    /// Generation of the currently open instance, if any. Step handlers
    /// capture this before going async and pass it back with their
    /// completion.
    pub fn generation(&self) -> Option<Generation> {
        self.instance.as_ref().map(|i| i.generation)
    }

    /// Opens a fresh instance, replacing any instance still open.
    ///
    /// The shared context starts as `initial_context`, then the flow's
    /// name (key `"flow"`) and the initial params are merged in, so the
    /// very first node's routing rules and input already see deep-linked
    /// parameters.
    pub fn start(&mut self, options: StartOptions) -> Result<Generation, FlowConfigError> {
        let start_id = match &options.start_node_override {
            Some(id) => {
                if !self.definition.contains(id) {
                    warn!(
                        "flow '{}': start override '{}' is undefined, start rejected",
                        self.definition.name, id
                    );
                    return Err(FlowConfigError::UnknownStartOverride(id.clone()));
                }
                id.clone()
            }
            None => self.definition.start_node_id.clone(),
        };

        let outputs: AHashMap<String, Value> = options
            .initial_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut context = options.initial_context;
        context.insert(
            "flow".to_string(),
            Value::String(self.definition.name.clone()),
        );
        for (key, value) in options.initial_params {
            context.insert(key, value);
        }

        self.generations += 1;
        let generation = Generation(self.generations);
        debug!(
            "flow '{}': started at '{}' (generation {})",
            self.definition.name, start_id, self.generations
        );
        self.instance = Some(FlowInstance::new(start_id, outputs, context, generation));
        Ok(generation)
    }

    /// Reports that the node active at `depth` completed with `output`,
    /// and advances the flow along its routing rules.
    ///
    /// Terminates the flow when no rule matches. An unknown routing target
    /// rejects the whole operation, including the output recording, so the
    /// instance is left exactly as it was.
    pub fn complete_node(
        &mut self,
        generation: Generation,
        depth: u32,
        output: Value,
    ) -> Result<Progress, FlowConfigError> {
        let Some(instance) = self.instance.as_mut() else {
            warn!("completion for generation {} ignored: flow closed", generation.0);
            return Ok(Progress::Stale);
        };
        if instance.generation != generation {
            warn!(
                "completion for generation {} ignored: current is {}",
                generation.0, instance.generation.0
            );
            return Ok(Progress::Stale);
        }

        let Some(node_id) = instance.active_by_depth.get(&depth).cloned() else {
            warn!("completion at depth {depth} rejected: no active node");
            return Err(FlowConfigError::NoActiveNode(depth));
        };
        // Active nodes are placed by validated transitions or starts, so a
        // dangling id here means the definition was swapped out from under
        // the instance. Reject rather than panic.
        let Some(node) = self.definition.nodes.get(&node_id) else {
            warn!("active node '{node_id}' at depth {depth} is not defined, completion rejected");
            return Err(FlowConfigError::NoActiveNode(depth));
        };

        // Record before routing: rules see the completing node's own output
        // under its id as well.
        let previous = instance.outputs.insert(node_id.clone(), output.clone());

        let next_id =
            router::resolve_next(&node.routing_rules, &output, &instance.outputs, &instance.context)
                .map(str::to_string);

        let Some(next_id) = next_id else {
            debug!(
                "flow '{}': '{}' exhausted its rules, terminating",
                self.definition.name, node_id
            );
            return Ok(self.finish());
        };

        let Some(next) = self.definition.nodes.get(&next_id) else {
            // Roll the recorded output back; a rejected transition must not
            // leave partial mutation behind.
            match previous {
                Some(value) => instance.outputs.insert(node_id.clone(), value),
                None => instance.outputs.remove(&node_id),
            };
            warn!("node '{node_id}' routed to unknown node '{next_id}', transition rejected");
            return Err(FlowConfigError::UnknownRouteTarget {
                node_id,
                target_id: next_id,
            });
        };

        let shift = transition::apply(instance, depth, next.depth, &next_id);
        debug!(
            "flow '{}': '{}' -> '{}' ({:?}, depth {} -> {})",
            self.definition.name, node_id, next_id, shift, depth, next.depth
        );
        Ok(Progress::Advanced)
    }

    /// Back-navigation for one layer: pops within the layer when it has
    /// history, cascade-closes the layer (and everything above it) when it
    /// does not, and terminates the flow when depth 0 itself is exhausted.
    pub fn go_back(&mut self, generation: Generation, depth: u32) -> Progress {
        let Some(instance) = self.instance.as_mut() else {
            return Progress::Stale;
        };
        if instance.generation != generation {
            warn!(
                "back-navigation for generation {} ignored: current is {}",
                generation.0, instance.generation.0
            );
            return Progress::Stale;
        }

        match history::go_back(instance, depth) {
            BackAction::Popped | BackAction::CascadeClosed => Progress::Advanced,
            BackAction::FlowExhausted => self.finish(),
        }
    }

    /// Closes `depth` and every layer above it. Closing depth 0 ends the
    /// flow; the completion snapshot is returned for callers that want the
    /// data gathered so far, and may be ignored by plain tear-downs.
    pub fn close_depth(&mut self, depth: u32) -> Progress {
        let Some(instance) = self.instance.as_mut() else {
            return Progress::Stale;
        };
        if depth == 0 {
            return self.finish();
        }
        history::close_depth(instance, depth);
        Progress::Advanced
    }

    /// Discards the live instance and folds it into its completion
    /// snapshot.
    fn finish(&mut self) -> Progress {
        match self.instance.take() {
            Some(instance) => {
                Progress::Finished(instance.into_completion(self.definition.name.clone()))
            }
            None => Progress::Stale,
        }
    }

    /// Shallow-merges `updates` into the shared context. Visible to every
    /// routing evaluation and envelope built afterwards. A no-op on a
    /// closed flow, and `update_context(Map::new())` never changes state.
    pub fn update_context(&mut self, updates: Map<String, Value>) {
        if let Some(instance) = self.instance.as_mut() {
            for (key, value) in updates {
                instance.context.insert(key, value);
            }
        }
    }
}
