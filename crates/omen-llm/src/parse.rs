use serde::Deserialize;

use omen_core::{extract, Flow, Graph, Threat};

/// Expected shape of an extraction response. Every field may be absent.
#[derive(Debug, Default, Deserialize)]
struct RawGraph {
    #[serde(default)]
    actors: Vec<String>,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    flows: Vec<String>,
}

/// Threat object as the model returns it. Every field may be absent.
#[derive(Debug, Deserialize)]
struct RawThreat {
    title: Option<String>,
    category: Option<String>,
    component: Option<String>,
    description: Option<String>,
}

/// Strip surrounding code-fence markup (```json ... ``` or ``` ... ```).
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json" etc.) up to the first newline
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse an extraction response into a [`Graph`].
///
/// Never fails: on parse failure, or on an empty/missing field, actors
/// fall back to `["User"]` and components to `["Core Application"]`.
/// Flow strings that do not resolve to nodes of the graph are dropped,
/// and when none survive the standard inference step fills them in.
pub fn parse_graph(raw: &str) -> Graph {
    let parsed: RawGraph = serde_json::from_str(strip_fences(raw)).unwrap_or_default();

    let mut actors = Vec::new();
    for name in &parsed.actors {
        let name = name.trim();
        if !name.is_empty() {
            extract::push_unique(&mut actors, name);
        }
    }
    if actors.is_empty() {
        actors.push("User".to_string());
    }

    let mut components = Vec::new();
    for name in &parsed.components {
        let name = name.trim();
        if !name.is_empty() {
            extract::push_unique(&mut components, name);
        }
    }
    if components.is_empty() {
        components.push(extract::DEFAULT_COMPONENT.to_string());
    }

    let mut graph = Graph {
        actors,
        components,
        flows: Vec::new(),
    };
    let mut flows: Vec<Flow> = parsed
        .flows
        .iter()
        .filter_map(|s| parse_flow(s, &graph))
        .collect();
    if flows.is_empty() {
        flows = extract::infer_flows(&graph.actors, &graph.components);
    }
    graph.flows = flows;
    graph
}

/// Parse `"A -> B: label"` (ASCII or arrow glyph). Returns `None` when
/// the shape is wrong or an endpoint is not a node of `graph`.
fn parse_flow(s: &str, graph: &Graph) -> Option<Flow> {
    let (endpoints, label) = match s.split_once(':') {
        Some((e, l)) => (e, l.trim()),
        None => (s, ""),
    };
    let (source, target) = endpoints
        .split_once("->")
        .or_else(|| endpoints.split_once('→'))?;
    let (source, target) = (source.trim(), target.trim());
    if !graph.has_node(source) || !graph.has_node(target) {
        return None;
    }
    Some(Flow {
        source: source.to_string(),
        target: target.to_string(),
        label: label.to_string(),
    })
}

/// Parse a synthesis response into threats.
///
/// Returns `None` when neither the strict parse nor the
/// bracketed-substring recovery yields a non-empty list; the caller then
/// falls back to the deterministic synthesizer.
pub fn parse_threats(raw: &str) -> Option<Vec<Threat>> {
    let cleaned = strip_fences(raw);

    let parsed: Vec<RawThreat> = match serde_json::from_str(cleaned) {
        Ok(list) => list,
        Err(_) => recover_threats(cleaned)?,
    };

    if parsed.is_empty() {
        return None;
    }
    Some(parsed.into_iter().map(normalize).collect())
}

/// Locate the first bracketed (or braced, for a lone object) JSON
/// substring in prose-wrapped output and parse that.
fn recover_threats(raw: &str) -> Option<Vec<RawThreat>> {
    if let Some(block) = slice_between(raw, '[', ']') {
        if let Ok(list) = serde_json::from_str::<Vec<RawThreat>>(block) {
            return Some(list);
        }
    }
    let block = slice_between(raw, '{', '}')?;
    serde_json::from_str::<RawThreat>(block).ok().map(|t| vec![t])
}

fn slice_between(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

fn normalize(raw: RawThreat) -> Threat {
    Threat {
        title: raw.title.unwrap_or_else(|| "Threat".to_string()),
        category: raw.category.unwrap_or_else(|| "Unknown".to_string()),
        component: raw.component.unwrap_or_else(|| "Unknown component".to_string()),
        description: raw.description.unwrap_or_default(),
    }
}
