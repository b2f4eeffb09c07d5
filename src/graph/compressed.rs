//! Compressed weighted directed graph of wiki users

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::groups::Role;

/// Per-user attributes carried alongside the adjacency arrays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAttributes {
    pub username: String,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub sysop: bool,
    #[serde(default)]
    pub bureaucrat: bool,
    #[serde(default)]
    pub steward: bool,
    #[serde(default)]
    pub founder: bool,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub blocked: bool,
}

impl VertexAttributes {
    /// A user with no role flags set
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Value of one boolean role flag
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Bot => self.bot,
            Role::Sysop => self.sysop,
            Role::Bureaucrat => self.bureaucrat,
            Role::Steward => self.steward,
            Role::Founder => self.founder,
            Role::Anonymous => self.anonymous,
            Role::Blocked => self.blocked,
        }
    }
}

/// Compressed sparse representation of a weighted directed graph.
///
/// Outgoing and incoming adjacency are both kept so in- and out-based
/// statistics are a slice lookup. Every edge carries its `weight`
/// (interaction count) and its `length`, the inverse of the weight, used
/// as the cost of distance computations.
#[derive(Debug, Clone)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// offsets[i] to offsets[i+1] defines the outgoing edge range for node i
    pub offsets: Vec<u32>,

    /// Edge array: concatenated, sorted lists of target nodes
    pub edges: Vec<u32>,

    /// Weight of each outgoing edge, parallel to `edges`
    pub weights: Vec<f64>,

    /// Length (1 / weight) of each outgoing edge, parallel to `edges`
    pub lengths: Vec<f64>,

    /// Same layout as `offsets`, over incoming edges
    pub in_offsets: Vec<u32>,

    /// Concatenated, sorted lists of source nodes
    pub in_edges: Vec<u32>,

    /// Weight of each incoming edge, parallel to `in_edges`
    pub in_weights: Vec<f64>,

    /// Attributes of each node
    pub vertices: Vec<VertexAttributes>,
}

impl CompressedGraph {
    /// Number of distinct directed edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get outgoing edges for a node
    pub fn outgoing_edges(&self, node: usize) -> &[u32] {
        &self.edges[self.out_range(node)]
    }

    /// Weights of the outgoing edges, aligned with `outgoing_edges`
    pub fn outgoing_weights(&self, node: usize) -> &[f64] {
        &self.weights[self.out_range(node)]
    }

    /// Lengths of the outgoing edges, aligned with `outgoing_edges`
    pub fn outgoing_lengths(&self, node: usize) -> &[f64] {
        &self.lengths[self.out_range(node)]
    }

    /// Get incoming edges (source nodes) for a node
    pub fn incoming_edges(&self, node: usize) -> &[u32] {
        &self.in_edges[self.in_range(node)]
    }

    /// Weights of the incoming edges, aligned with `incoming_edges`
    pub fn incoming_weights(&self, node: usize) -> &[f64] {
        &self.in_weights[self.in_range(node)]
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.outgoing_edges(src).binary_search(&dst).is_ok()
    }

    /// Weight of the edge from src to dst, if present
    pub fn edge_weight(&self, src: usize, dst: u32) -> Option<f64> {
        self.outgoing_edges(src)
            .binary_search(&dst)
            .ok()
            .map(|pos| self.outgoing_weights(src)[pos])
    }

    /// Get out-degree of a node
    pub fn out_degree(&self, node: usize) -> usize {
        let range = self.out_range(node);
        range.end - range.start
    }

    /// Get in-degree of a node
    pub fn in_degree(&self, node: usize) -> usize {
        let range = self.in_range(node);
        range.end - range.start
    }

    pub fn username(&self, node: usize) -> &str {
        &self.vertices[node].username
    }

    /// Copy into a petgraph graph whose edge weights are lengths.
    ///
    /// Node `i` of the result is `NodeIndex::new(i)`.
    pub fn to_petgraph(&self) -> DiGraph<u32, f64> {
        let mut graph = DiGraph::with_capacity(self.node_count, self.edge_count());
        for node in 0..self.node_count {
            graph.add_node(node as u32);
        }
        for src in 0..self.node_count {
            for (&dst, &length) in self.outgoing_edges(src).iter().zip(self.outgoing_lengths(src)) {
                graph.add_edge(NodeIndex::new(src), NodeIndex::new(dst as usize), length);
            }
        }
        graph
    }

    fn out_range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize..self.offsets[node + 1] as usize
    }

    fn in_range(&self, node: usize) -> std::ops::Range<usize> {
        self.in_offsets[node] as usize..self.in_offsets[node + 1] as usize
    }
}
