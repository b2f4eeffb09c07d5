//! Graph construction module

use std::collections::HashMap;

use anyhow::Result;

use crate::error::GraphError;
use crate::graph::compressed::{CompressedGraph, VertexAttributes};

/// Builder for incrementally constructing a CompressedGraph
pub struct GraphBuilder {
    /// Mapping from usernames to node indices (first registration wins)
    id_to_index: HashMap<String, u32>,

    /// Node attributes, indexed by node
    vertices: Vec<VertexAttributes>,

    /// Weighted adjacency lists for each node
    adjacency_lists: Vec<Vec<(u32, f64)>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            vertices: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append a node, returning its index
    pub fn add_vertex(&mut self, attributes: VertexAttributes) -> u32 {
        let idx = self.vertices.len() as u32;
        self.id_to_index
            .entry(attributes.username.clone())
            .or_insert(idx);
        self.vertices.push(attributes);
        self.adjacency_lists.push(Vec::new());
        idx
    }

    /// Get or create a node for the given username
    pub fn get_or_create_node(&mut self, username: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(username) {
            return idx;
        }
        self.add_vertex(VertexAttributes::named(username))
    }

    /// Replace the attributes of the node registered under `attributes.username`,
    /// creating it if needed
    pub fn set_attributes(&mut self, attributes: VertexAttributes) -> u32 {
        let idx = self.get_or_create_node(&attributes.username);
        self.vertices[idx as usize] = attributes;
        idx
    }

    /// Add a weighted edge between two usernames
    pub fn add_edge(&mut self, src: &str, dst: &str, weight: f64) -> Result<()> {
        let src_idx = self.get_or_create_node(src);
        let dst_idx = self.get_or_create_node(dst);
        self.add_edge_by_index(src_idx as usize, dst_idx as usize, weight)
    }

    /// Add a weighted edge between two existing node indices
    pub fn add_edge_by_index(&mut self, src: usize, dst: usize, weight: f64) -> Result<()> {
        let vertex_count = self.vertices.len();
        if src >= vertex_count || dst >= vertex_count {
            return Err(GraphError::EdgeOutOfRange {
                source_index: src,
                target_index: dst,
                vertex_count,
            }
            .into());
        }
        if !(weight > 0.0) {
            return Err(GraphError::NonPositiveWeight {
                source_index: src,
                target_index: dst,
                weight,
            }
            .into());
        }

        self.adjacency_lists[src].push((dst as u32, weight));
        Ok(())
    }

    /// Build the compressed graph.
    ///
    /// Parallel edges are merged into one edge carrying the summed weight.
    pub fn build(mut self) -> Result<CompressedGraph> {
        let node_count = self.vertices.len();

        for list in &mut self.adjacency_lists {
            // Sort for binary search efficiency
            list.sort_unstable_by_key(|&(dst, _)| dst);
            list.dedup_by(|next, kept| {
                if next.0 == kept.0 {
                    kept.1 += next.1;
                    true
                } else {
                    false
                }
            });
        }

        let edge_count: usize = self.adjacency_lists.iter().map(|list| list.len()).sum();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut edges = Vec::with_capacity(edge_count);
        let mut weights = Vec::with_capacity(edge_count);
        let mut in_lists: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_count];

        offsets.push(0);
        for (src, list) in self.adjacency_lists.iter().enumerate() {
            for &(dst, weight) in list {
                edges.push(dst);
                weights.push(weight);
                // Sources are visited in ascending order, so incoming lists stay sorted
                in_lists[dst as usize].push((src as u32, weight));
            }
            offsets.push(edges.len() as u32);
        }

        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_edges = Vec::with_capacity(edge_count);
        let mut in_weights = Vec::with_capacity(edge_count);

        in_offsets.push(0);
        for list in &in_lists {
            for &(src, weight) in list {
                in_edges.push(src);
                in_weights.push(weight);
            }
            in_offsets.push(in_edges.len() as u32);
        }

        let lengths = invert_weights(&weights);

        log::debug!("Built graph with {} nodes and {} edges", node_count, edge_count);

        Ok(CompressedGraph {
            node_count,
            offsets,
            edges,
            weights,
            lengths,
            in_offsets,
            in_edges,
            in_weights,
            vertices: self.vertices,
        })
    }
}

/// Turn interaction weights into distances: a heavier edge is a shorter one
pub fn invert_weights(weights: &[f64]) -> Vec<f64> {
    weights.iter().map(|&w| 1.0 / w).collect()
}
