//! Dependency-style diagrams.
//!
//! The dependency style needs no layout of its own: every token becomes a
//! node and every head/dependent pair an edge labeled with its relation.
//! Positioning is left to whatever consumes the DOT description.

use std::{collections::HashMap, fmt};

use log::{debug, trace};
use petgraph::{
    dot::Dot,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use kellogg_core::grammar::DependencyToken;

use crate::KelloggError;

/// A token as a graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    index: usize,
    text: String,
}

impl DependencyNode {
    /// 1-based position of the token in its sentence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Directed head → dependent graph of one sentence.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<DependencyNode, String>,
    root: Option<NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from the parser's dependency rows.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::MissingDependencies`] for an empty token list
    /// and [`KelloggError::InvalidInput`] when a head refers to a token that
    /// does not exist.
    pub fn from_tokens(tokens: &[DependencyToken]) -> Result<Self, KelloggError> {
        if tokens.is_empty() {
            return Err(KelloggError::MissingDependencies);
        }

        let mut graph = DiGraph::with_capacity(tokens.len(), tokens.len());
        let indices: HashMap<usize, NodeIndex> = tokens
            .iter()
            .map(|token| {
                let node = graph.add_node(DependencyNode {
                    index: token.index(),
                    text: token.text().to_string(),
                });
                (token.index(), node)
            })
            .collect();

        let mut root = None;
        for token in tokens {
            let dependent = indices[&token.index()];
            match token.head() {
                None => {
                    root.get_or_insert(dependent);
                }
                Some(head) => {
                    let Some(&head_node) = indices.get(&head) else {
                        return Err(KelloggError::InvalidInput(format!(
                            "token {} `{}` has head {head}, which is not a token of the sentence",
                            token.index(),
                            token.text()
                        )));
                    };
                    graph.add_edge(head_node, dependent, token.relation().to_string());
                }
            }
        }

        debug!(nodes = graph.node_count(), edges = graph.edge_count(); "Dependency graph built");
        Ok(Self { graph, root })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The token with no head, if the rows name one.
    pub fn root(&self) -> Option<&DependencyNode> {
        self.root.map(|index| &self.graph[index])
    }

    /// `(head, relation, dependent)` triples in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&DependencyNode, &str, &DependencyNode)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                edge.weight().as_str(),
                &self.graph[edge.target()],
            )
        })
    }

    /// Graphviz description of the graph.
    pub fn to_dot(&self) -> String {
        let dot = format!("{}", Dot::with_config(&self.graph, &[]));
        trace!(dot = dot.as_str(); "Dependency graph as DOT");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<DependencyToken> {
        vec![
            DependencyToken::new(1, "The", Some(2), "det"),
            DependencyToken::new(2, "cat", Some(3), "nsubj"),
            DependencyToken::new(3, "sat", None, "root"),
        ]
    }

    #[test]
    fn test_one_edge_per_dependent() {
        let graph = DependencyGraph::from_tokens(&tokens()).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.root().map(DependencyNode::text), Some("sat"));

        let edges: Vec<(&str, &str, &str)> = graph
            .edges()
            .map(|(head, relation, dependent)| (head.text(), relation, dependent.text()))
            .collect();
        assert_eq!(edges, vec![("cat", "det", "The"), ("sat", "nsubj", "cat")]);
    }

    #[test]
    fn test_dot_names_relations() {
        let dot = DependencyGraph::from_tokens(&tokens()).unwrap().to_dot();

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("nsubj"));
        assert!(dot.contains("\"sat\""));
    }

    #[test]
    fn test_empty_tokens() {
        let err = DependencyGraph::from_tokens(&[]).unwrap_err();
        assert!(matches!(err, KelloggError::MissingDependencies));
    }

    #[test]
    fn test_dangling_head() {
        let tokens = vec![DependencyToken::new(1, "Go", Some(4), "root")];
        let err = DependencyGraph::from_tokens(&tokens).unwrap_err();
        assert!(matches!(err, KelloggError::InvalidInput(_)));
    }
}
