use crate::engine::instance::FlowInstance;

/// Upper bound on one layer's back-history. Guards against definitions
/// that cycle a user through the same nodes indefinitely; once full, the
/// oldest entry is dropped so back-navigation bottoms out early instead of
/// growing without bound.
pub const MAX_HISTORY_PER_DEPTH: usize = 64;

pub(crate) fn push_clamped(history: &mut Vec<String>, node_id: String) {
    if history.len() >= MAX_HISTORY_PER_DEPTH {
        history.remove(0);
    }
    history.push(node_id);
}

/// Outcome of a back-navigation request, before the lifecycle maps it onto
/// its public `Progress` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The layer had somewhere to go back to; its previous node is active
    /// again.
    Popped,
    /// The layer's history was exhausted; it and every layer above it were
    /// closed.
    CascadeClosed,
    /// Depth 0 exhausted its history; the whole flow is over.
    FlowExhausted,
}

/// Per-depth back-navigation. Only the addressed depth is ever popped;
/// exhaustion cascades upward (closing), never downward.
pub fn go_back(instance: &mut FlowInstance, depth: u32) -> BackAction {
    let Some(history) = instance.history_by_depth.get_mut(&depth) else {
        // Nothing open at this depth; treat as an exhausted overlay so the
        // caller's cascade semantics stay uniform.
        return if depth == 0 {
            BackAction::FlowExhausted
        } else {
            BackAction::CascadeClosed
        };
    };

    if history.len() > 1 {
        history.pop();
        let previous = history
            .last()
            .cloned()
            .unwrap_or_default();
        instance.active_by_depth.insert(depth, previous);
        instance.assert_invariants();
        return BackAction::Popped;
    }

    if depth == 0 {
        return BackAction::FlowExhausted;
    }

    close_depth(instance, depth);
    BackAction::CascadeClosed
}

/// Removes every depth at or above `depth` from the instance. Closing
/// depth 0 is the caller's signal to discard the instance entirely.
pub fn close_depth(instance: &mut FlowInstance, depth: u32) {
    instance.active_by_depth.retain(|d, _| *d < depth);
    instance.history_by_depth.retain(|d, _| *d < depth);
    if depth > 0 {
        instance.assert_invariants();
    }
}
