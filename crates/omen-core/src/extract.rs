//! Rule-based graph extraction: fixed keyword tables over the
//! lower-cased description, plus the shared flow-inference step.

use crate::{Flow, Graph};

/// Keyword → label tables. Declaration order is output order, so the
/// same description always yields the same graph.
const ACTOR_RULES: &[(&[&str], &str)] = &[
    (&["user"], "User"),
    (&["customer"], "Customer"),
    (&["admin", "administrator"], "Admin"),
];

const COMPONENT_RULES: &[(&[&str], &str)] = &[
    (&["flask", "api"], "API Server"),
    (&["react", "frontend"], "Frontend Web App"),
    (&["database", "db"], "Database"),
    (&["mongo"], "MongoDB"),
    (&["postgres"], "PostgreSQL"),
    (&["payment"], "Payment Service"),
    (&["auth", "login"], "Authentication Service"),
    (&["admin panel", "admin dashboard"], "Admin Dashboard"),
];

/// Sentinel actor when no keyword matches.
pub const DEFAULT_ACTOR: &str = "External Actor";
/// Sentinel component when no keyword matches.
pub const DEFAULT_COMPONENT: &str = "Core Application";

/// Append `name` unless the list already holds it.
pub fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn match_rules(description_lower: &str, rules: &[(&[&str], &str)], default: &str) -> Vec<String> {
    let mut labels = Vec::new();
    for (keywords, label) in rules {
        if keywords.iter().any(|k| description_lower.contains(k)) {
            push_unique(&mut labels, label);
        }
    }
    if labels.is_empty() {
        labels.push(default.to_string());
    }
    labels
}

/// External entities that originate requests.
pub fn extract_actors(description: &str) -> Vec<String> {
    match_rules(&description.to_lowercase(), ACTOR_RULES, DEFAULT_ACTOR)
}

/// Internal system parts, in rule-declaration order.
pub fn extract_components(description: &str) -> Vec<String> {
    match_rules(&description.to_lowercase(), COMPONENT_RULES, DEFAULT_COMPONENT)
}

/// Star-then-chain flow inference: every actor fans into the first
/// component, then components connect in declared order.
pub fn infer_flows(actors: &[String], components: &[String]) -> Vec<Flow> {
    let mut flows = Vec::new();
    if let Some(first) = components.first() {
        for actor in actors {
            flows.push(Flow {
                source: actor.clone(),
                target: first.clone(),
                label: "sends requests".into(),
            });
        }
    }
    for pair in components.windows(2) {
        flows.push(Flow {
            source: pair[0].clone(),
            target: pair[1].clone(),
            label: "forwards data".into(),
        });
    }
    flows
}

/// Turn a free-text description into a graph using the keyword rules.
pub fn extract(description: &str) -> Graph {
    let actors = extract_actors(description);
    let components = extract_components(description);
    let flows = infer_flows(&actors, &components);
    Graph {
        actors,
        components,
        flows,
    }
}
