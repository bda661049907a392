use crate::flow::RoutingRule;
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Picks the next node after a step completes.
///
/// Rules are evaluated in declaration order and the first match wins.
/// `None` means no rule matched, which is the documented termination
/// signal, not an error. Whether the returned target actually exists is
/// the lifecycle's concern.
pub fn resolve_next<'a>(
    rules: &'a [RoutingRule],
    output: &Value,
    outputs: &AHashMap<String, Value>,
    context: &Map<String, Value>,
) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.predicate.matches(output, outputs, context))
        .map(|rule| rule.target.as_str())
}
