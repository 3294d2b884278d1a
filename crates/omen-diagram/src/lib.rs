//! Two-column diagram layout and draw.io (mxGraphModel) serialization.
//!
//! The tag and attribute names emitted here are a wire contract with the
//! diagrams.net viewer; the geometry and style constants match the
//! documents it expects to open.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use omen_core::Flow;

// Fixed two-column placement. This is deliberately not a graph-layout
// algorithm: same ordered input, same document.
const ACTOR_X: i32 = 40;
const COMPONENT_X: i32 = 260;
const START_Y: i32 = 40;
const Y_STEP: i32 = 90;
const ACTOR_W: i32 = 100;
const COMPONENT_W: i32 = 130;
const NODE_H: i32 = 60;

const ACTOR_STYLE: &str = "ellipse;whiteSpace=wrap;html=1;fillColor=#e0f2fe;strokeColor=#0369a1";
const COMPONENT_STYLE: &str =
    "rounded=1;whiteSpace=wrap;html=1;fillColor=#dcfce7;strokeColor=#15803d";

/// Shape family of a node cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Actor,
    Component,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeCell {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeCell {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A node/edge cell graph, built fresh each run. Cell ids "0" and "1"
/// are the format's reserved root and default parent; real cells start
/// at id 2.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DiagramDocument {
    pub nodes: Vec<NodeCell>,
    pub edges: Vec<EdgeCell>,
}

/// First occurrence wins; later duplicates collapse to the first cell.
fn unique(names: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        if !seen.iter().any(|n| n == name) {
            seen.push(name.clone());
        }
    }
    seen
}

/// Lay actors and components out into the two-column cell graph.
///
/// `flows` ride along for the caller's benefit only: the edge set is
/// derived from actor fan-in and the component chain, matching the
/// reference renderer, and flows never drive nodes or edges.
pub fn render(actors: &[String], components: &[String], _flows: &[Flow]) -> DiagramDocument {
    let actors = unique(actors);
    let components = unique(components);

    let mut doc = DiagramDocument::default();
    let mut next_id: u32 = 2;
    let mut ids: HashMap<String, String> = HashMap::new();

    let mut y = START_Y;
    for actor in &actors {
        let id = next_id.to_string();
        next_id += 1;
        ids.insert(actor.clone(), id.clone());
        doc.nodes.push(NodeCell {
            id,
            label: actor.clone(),
            kind: NodeKind::Actor,
            x: ACTOR_X,
            y,
            width: ACTOR_W,
            height: NODE_H,
        });
        y += Y_STEP;
    }

    let mut y = START_Y;
    for component in &components {
        // an actor and a component sharing a name collapse to the actor cell
        if ids.contains_key(component) {
            continue;
        }
        let id = next_id.to_string();
        next_id += 1;
        ids.insert(component.clone(), id.clone());
        doc.nodes.push(NodeCell {
            id,
            label: component.clone(),
            kind: NodeKind::Component,
            x: COMPONENT_X,
            y,
            width: COMPONENT_W,
            height: NODE_H,
        });
        y += Y_STEP;
    }

    // every actor fans into the first component
    if let Some(first) = components.first() {
        for actor in &actors {
            let (Some(source), Some(target)) = (ids.get(actor), ids.get(first)) else {
                continue;
            };
            doc.edges.push(EdgeCell {
                id: next_id.to_string(),
                source: source.clone(),
                target: target.clone(),
            });
            next_id += 1;
        }
    }

    // components chain in declared order
    for pair in components.windows(2) {
        let (Some(source), Some(target)) = (ids.get(&pair[0]), ids.get(&pair[1])) else {
            continue;
        };
        doc.edges.push(EdgeCell {
            id: next_id.to_string(),
            source: source.clone(),
            target: target.clone(),
        });
        next_id += 1;
    }

    doc
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize the document into the mxGraphModel format.
pub fn to_xml(doc: &DiagramDocument) -> String {
    let mut cells = String::with_capacity(1024);
    cells.push_str("<mxCell id=\"0\"/>");
    cells.push_str("<mxCell id=\"1\" parent=\"0\"/>");

    for node in &doc.nodes {
        let style = match node.kind {
            NodeKind::Actor => ACTOR_STYLE,
            NodeKind::Component => COMPONENT_STYLE,
        };
        let _ = write!(
            cells,
            "<mxCell id=\"{}\" value=\"{}\" style=\"{}\" vertex=\"1\" parent=\"1\">\
<mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\
</mxCell>",
            node.id,
            escape_xml(&node.label),
            style,
            node.x,
            node.y,
            node.width,
            node.height
        );
    }

    for edge in &doc.edges {
        let _ = write!(
            cells,
            "<mxCell id=\"{}\" value=\"\" edge=\"1\" parent=\"1\" source=\"{}\" target=\"{}\">\
<mxGeometry relative=\"1\" as=\"geometry\"/>\
</mxCell>",
            edge.id, edge.source, edge.target
        );
    }

    format!(
        "<mxGraphModel dx=\"1000\" dy=\"1000\" grid=\"1\" gridSize=\"10\" guides=\"1\" \
tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" \
pageWidth=\"827\" pageHeight=\"1169\"><root>{cells}</root></mxGraphModel>"
    )
}

/// Write the document to `path`, creating parent directories and fully
/// replacing any existing file. Filesystem failures propagate.
pub fn write_diagram(doc: &DiagramDocument, path: &Path) -> Result<PathBuf, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    fs::write(path, to_xml(doc)).map_err(|e| e.to_string())?;
    Ok(path.to_path_buf())
}

/// Re-read a previously written diagram. A missing file is an
/// empty-document condition, not an error.
pub fn read_diagram(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn node_and_edge_counts() {
        let doc = render(&names(&["User", "Admin"]), &names(&["A", "B", "C"]), &[]);
        assert_eq!(doc.nodes.len(), 5);
        // 2 actor fan-ins + 2 chain edges
        assert_eq!(doc.edges.len(), 4);
    }

    #[test]
    fn ids_are_sequential_from_two() {
        let doc = render(&names(&["User"]), &names(&["A"]), &[]);
        assert_eq!(doc.nodes[0].id, "2");
        assert_eq!(doc.nodes[1].id, "3");
        assert_eq!(doc.edges[0].id, "4");
    }

    #[test]
    fn component_chain_follows_declared_order() {
        let doc = render(&[], &names(&["A", "B", "C"]), &[]);
        assert_eq!(doc.edges.len(), 2);
        // A=2, B=3, C=4
        assert_eq!((doc.edges[0].source.as_str(), doc.edges[0].target.as_str()), ("2", "3"));
        assert_eq!((doc.edges[1].source.as_str(), doc.edges[1].target.as_str()), ("3", "4"));
    }

    #[test]
    fn short_chains_have_no_component_edges() {
        assert!(render(&[], &names(&["A"]), &[]).edges.is_empty());
        assert!(render(&[], &[], &[]).edges.is_empty());
    }

    #[test]
    fn no_components_means_no_actor_edges() {
        let doc = render(&names(&["User"]), &[], &[]);
        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.edges.is_empty());
    }

    #[test]
    fn duplicate_names_collapse_to_one_cell() {
        let doc = render(&names(&["User", "User"]), &names(&["A", "A", "B"]), &[]);
        assert_eq!(doc.nodes.len(), 3);
        // one fan-in + one chain edge
        assert_eq!(doc.edges.len(), 2);
    }

    #[test]
    fn columns_and_geometry_match_the_reference() {
        let doc = render(&names(&["User", "Admin"]), &names(&["A"]), &[]);
        let user = &doc.nodes[0];
        assert_eq!((user.x, user.y, user.width, user.height), (40, 40, 100, 60));
        let admin = &doc.nodes[1];
        assert_eq!((admin.x, admin.y), (40, 130));
        let comp = &doc.nodes[2];
        assert_eq!((comp.x, comp.y, comp.width), (260, 40, 130));
    }

    #[test]
    fn xml_carries_the_page_header_and_root_cells() {
        let xml = to_xml(&render(&names(&["User"]), &names(&["A"]), &[]));
        assert!(xml.starts_with("<mxGraphModel dx=\"1000\" dy=\"1000\" grid=\"1\" gridSize=\"10\""));
        assert!(xml.contains("pageWidth=\"827\" pageHeight=\"1169\""));
        assert!(xml.contains("<mxCell id=\"0\"/>"));
        assert!(xml.contains("<mxCell id=\"1\" parent=\"0\"/>"));
        assert!(xml.contains("vertex=\"1\""));
        assert!(xml.contains("edge=\"1\""));
        assert!(xml.contains(ACTOR_STYLE));
        assert!(xml.contains(COMPONENT_STYLE));
    }

    #[test]
    fn labels_are_escaped() {
        let xml = to_xml(&render(&[], &names(&["Cache <hot> & \"cold\""]), &[]));
        assert!(xml.contains("Cache &lt;hot&gt; &amp; &quot;cold&quot;"));
    }

    #[test]
    fn write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/diagram.drawio");

        let doc = render(&names(&["User"]), &names(&["A"]), &[]);
        let written = write_diagram(&doc, &path).unwrap();
        assert_eq!(written, path);
        let first = read_diagram(&path).unwrap();

        let doc = render(&names(&["Admin"]), &names(&["B"]), &[]);
        write_diagram(&doc, &path).unwrap();
        let second = read_diagram(&path).unwrap();
        assert_ne!(first, second);
        assert!(second.contains("Admin"));
        assert!(!second.contains("User"));
    }

    #[test]
    fn missing_diagram_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_diagram(&dir.path().join("absent.drawio")).is_none());
    }
}
