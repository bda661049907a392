use crate::engine::history::push_clamped;
use crate::engine::instance::FlowInstance;

/// Classification of a transition relative to the depth of the node that
/// just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthShift {
    /// The next node opens a new overlay above the current one.
    Deeper,
    /// The next node replaces the front of the current layer.
    Same,
    /// The next node re-roots a lower layer; everything above it closes.
    Shallower,
}

pub fn classify(from: u32, to: u32) -> DepthShift {
    use std::cmp::Ordering::*;
    match to.cmp(&from) {
        Greater => DepthShift::Deeper,
        Equal => DepthShift::Same,
        Less => DepthShift::Shallower,
    }
}

/// Applies a routed transition to the instance.
///
/// - Deeper: open depth `to` with a fresh single-entry history; depths at
///   or below `from` are untouched.
/// - Same: append to the layer's history and make the new node active.
/// - Shallower: close every depth above `to`, then replace depth `to` with
///   a fresh single-entry history. Closing everything above the new leaf
///   (rather than only depths at or above `from`) keeps the open layers a
///   contiguous prefix of the active path; no stale intermediate overlay
///   can survive a shallower jump.
pub fn apply(instance: &mut FlowInstance, from: u32, to: u32, next_id: &str) -> DepthShift {
    let shift = classify(from, to);
    match shift {
        DepthShift::Deeper => {
            instance.active_by_depth.insert(to, next_id.to_string());
            instance.history_by_depth.insert(to, vec![next_id.to_string()]);
        }
        DepthShift::Same => {
            instance.active_by_depth.insert(from, next_id.to_string());
            let history = instance.history_by_depth.entry(from).or_default();
            push_clamped(history, next_id.to_string());
        }
        DepthShift::Shallower => {
            instance.active_by_depth.retain(|d, _| *d <= to);
            instance.history_by_depth.retain(|d, _| *d <= to);
            instance.active_by_depth.insert(to, next_id.to_string());
            instance.history_by_depth.insert(to, vec![next_id.to_string()]);
        }
    }
    instance.assert_invariants();
    shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(classify(0, 1), DepthShift::Deeper);
        assert_eq!(classify(1, 1), DepthShift::Same);
        assert_eq!(classify(2, 0), DepthShift::Shallower);
    }
}
