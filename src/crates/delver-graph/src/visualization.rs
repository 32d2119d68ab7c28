//! Mermaid rendering of graph topologies
//!
//! Renders a [`Graph`]'s nodes and edges as a [Mermaid](https://mermaid.js.org/)
//! flowchart for READMEs and debugging. Purely observational - nothing in the
//! engine depends on the rendered output.
//!
//! ```text
//! graph TD
//!     __start__((START)) --> parse
//!     parse --> search_context
//!     ...
//!     critique -. "retry" .-> search_context
//! ```

use crate::graph::{Edge, Graph, END, START};

/// Render the topology as a Mermaid `graph TD` flowchart.
///
/// Output is deterministic: nodes and edges are emitted in sorted order so
/// diffs stay stable across runs.
pub fn to_mermaid(graph: &Graph) -> String {
    let mut output = String::from("graph TD\n");

    output.push_str(&format!("    {}((START))\n", sanitize_id(START)));
    output.push_str(&format!("    {}((END))\n", sanitize_id(END)));

    let mut names: Vec<&String> = graph.nodes.keys().collect();
    names.sort();
    for name in names {
        output.push_str(&format!("    {}[\"{}\"]\n", sanitize_id(name), name));
    }

    let mut sources: Vec<&String> = graph.edges.keys().collect();
    sources.sort();
    for from in sources {
        for edge in &graph.edges[from] {
            match edge {
                Edge::Direct(to) => {
                    output.push_str(&format!(
                        "    {} --> {}\n",
                        sanitize_id(from),
                        sanitize_id(to)
                    ));
                }
                Edge::Conditional { branches, .. } => {
                    let mut labels: Vec<(&String, &String)> = branches.iter().collect();
                    labels.sort();
                    for (label, to) in labels {
                        output.push_str(&format!(
                            "    {} -. \"{}\" .-> {}\n",
                            sanitize_id(from),
                            label,
                            sanitize_id(to)
                        ));
                    }
                }
            }
        }
    }

    output
}

/// Mermaid identifiers cannot contain arbitrary characters.
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, NodeSpec};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn noop(name: &str) -> NodeSpec {
        NodeSpec {
            name: name.to_string(),
            kind: NodeKind::Sync,
            executor: Arc::new(|_| Box::pin(async move { Ok(json!({})) })),
        }
    }

    #[test]
    fn test_mermaid_contains_nodes_and_edges() {
        let mut graph = Graph::new();
        graph.add_node(noop("parse"));
        graph.add_node(noop("publish"));
        graph.add_edge(START, "parse");
        graph.add_edge("parse", "publish");
        graph.add_conditional_edge(
            "publish",
            Arc::new(|_| "done".to_string()),
            HashMap::from([("done".to_string(), END.to_string())]),
        );

        let mermaid = to_mermaid(&graph);
        assert!(mermaid.starts_with("graph TD"));
        assert!(mermaid.contains("parse[\"parse\"]"));
        assert!(mermaid.contains("parse --> publish"));
        assert!(mermaid.contains("publish -. \"done\" .-> __end__"));
    }

    #[test]
    fn test_mermaid_is_deterministic() {
        let build = || {
            let mut graph = Graph::new();
            graph.add_node(noop("b"));
            graph.add_node(noop("a"));
            graph.add_edge(START, "a");
            graph.add_edge("a", "b");
            graph.add_edge("b", END);
            graph
        };
        assert_eq!(to_mermaid(&build()), to_mermaid(&build()));
    }
}
