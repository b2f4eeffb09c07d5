//! Graph algorithms for analysis

use rayon::prelude::*;

use crate::graph::CompressedGraph;

/// Extract the subgraph induced by `members`.
///
/// Node `i` of the result is `members[i]` of the input; attributes and
/// weights are carried over.
pub fn induced_subgraph(graph: &CompressedGraph, members: &[u32]) -> CompressedGraph {
    let subgraph_size = members.len();

    // Create mapping from original to subgraph indices
    let mut orig_to_sub = vec![u32::MAX; graph.node_count];
    for (i, &node) in members.iter().enumerate() {
        orig_to_sub[node as usize] = i as u32;
    }

    let mut offsets = Vec::with_capacity(subgraph_size + 1);
    let mut edges = Vec::new();
    let mut weights = Vec::new();
    let mut lengths = Vec::new();
    let mut in_lists: Vec<Vec<(u32, f64)>> = vec![Vec::new(); subgraph_size];

    offsets.push(0);
    for (sub_src, &node) in members.iter().enumerate() {
        let node = node as usize;
        let mut kept: Vec<(u32, f64, f64)> = graph
            .outgoing_edges(node)
            .iter()
            .zip(graph.outgoing_weights(node))
            .zip(graph.outgoing_lengths(node))
            // Only include edges where both endpoints are in the subgraph
            .filter(|((dst, _), _)| orig_to_sub[**dst as usize] != u32::MAX)
            .map(|((&dst, &w), &l)| (orig_to_sub[dst as usize], w, l))
            .collect();
        kept.sort_unstable_by_key(|&(dst, _, _)| dst);

        for (dst, weight, length) in kept {
            edges.push(dst);
            weights.push(weight);
            lengths.push(length);
            in_lists[dst as usize].push((sub_src as u32, weight));
        }
        offsets.push(edges.len() as u32);
    }

    let mut in_offsets = Vec::with_capacity(subgraph_size + 1);
    let mut in_edges = Vec::with_capacity(edges.len());
    let mut in_weights = Vec::with_capacity(edges.len());
    in_offsets.push(0);
    for list in in_lists {
        for (src, weight) in list {
            in_edges.push(src);
            in_weights.push(weight);
        }
        in_offsets.push(in_edges.len() as u32);
    }

    let vertices = members
        .iter()
        .map(|&node| graph.vertices[node as usize].clone())
        .collect();

    CompressedGraph {
        node_count: subgraph_size,
        offsets,
        edges,
        weights,
        lengths,
        in_offsets,
        in_edges,
        in_weights,
        vertices,
    }
}

/// Directed density: every edge, loops included, over the n(n-1) loop-free
/// potential edges, so graphs with self-loops can exceed 1
pub fn density(graph: &CompressedGraph) -> f64 {
    let n = graph.node_count;
    if n <= 1 {
        return f64::NAN;
    }

    // Potential edges = n * (n - 1) for directed graph
    let potential_edges = n * (n - 1);
    graph.edge_count() as f64 / potential_edges as f64
}

/// Fraction of non-loop edges whose reverse edge also exists
pub fn reciprocity(graph: &CompressedGraph) -> f64 {
    let mut total = 0usize;
    let mut mutual = 0usize;

    for src in 0..graph.node_count {
        for &dst in graph.outgoing_edges(src) {
            let dst_idx = dst as usize;

            // Skip self-loops
            if dst_idx == src {
                continue;
            }

            total += 1;
            if graph.has_edge(dst_idx, src as u32) {
                mutual += 1;
            }
        }
    }

    if total == 0 {
        return f64::NAN;
    }
    mutual as f64 / total as f64
}

/// Unweighted in-degree of every node
pub fn in_degrees(graph: &CompressedGraph) -> Vec<u32> {
    (0..graph.node_count)
        .map(|node| graph.in_degree(node) as u32)
        .collect()
}

/// Unweighted out-degree of every node
pub fn out_degrees(graph: &CompressedGraph) -> Vec<u32> {
    (0..graph.node_count)
        .map(|node| graph.out_degree(node) as u32)
        .collect()
}

/// Sum of incoming edge weights of every node
pub fn weighted_in_degrees(graph: &CompressedGraph) -> Vec<f64> {
    (0..graph.node_count)
        .into_par_iter()
        .map(|node| graph.incoming_weights(node).iter().sum::<f64>())
        .collect()
}

/// Sum of outgoing edge weights of every node
pub fn weighted_out_degrees(graph: &CompressedGraph) -> Vec<f64> {
    (0..graph.node_count)
        .into_par_iter()
        .map(|node| graph.outgoing_weights(node).iter().sum::<f64>())
        .collect()
}

/// Sorted neighbour sets of the graph read as undirected and simple
fn undirected_neighbors(graph: &CompressedGraph) -> Vec<Vec<u32>> {
    (0..graph.node_count)
        .into_par_iter()
        .map(|node| {
            let mut neighbors: Vec<u32> = graph
                .outgoing_edges(node)
                .iter()
                .chain(graph.incoming_edges(node))
                .copied()
                .filter(|&other| other as usize != node)
                .collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            neighbors
        })
        .collect()
}

/// Per node: (closed neighbour pairs, all neighbour pairs)
fn triplet_counts(neighbors: &[Vec<u32>]) -> Vec<(u64, u64)> {
    neighbors
        .par_iter()
        .map(|adj| {
            let k = adj.len() as u64;
            let mut closed = 0u64;
            for (i, &u) in adj.iter().enumerate() {
                let u_adj = &neighbors[u as usize];
                for &w in &adj[i + 1..] {
                    if u_adj.binary_search(&w).is_ok() {
                        closed += 1;
                    }
                }
            }
            (closed, k * k.saturating_sub(1) / 2)
        })
        .collect()
}

/// Clustering of the graph treated as undirected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clustering {
    /// Closed triplets / connected triplets
    pub transitivity: f64,
    /// Mean local clustering coefficient over nodes with at least two neighbours
    pub average_local: f64,
}

pub fn clustering(graph: &CompressedGraph) -> Clustering {
    let counts = triplet_counts(&undirected_neighbors(graph));

    let (closed, triples) = counts
        .iter()
        .fold((0u64, 0u64), |(c, t), &(closed, all)| (c + closed, t + all));
    let transitivity = if triples == 0 {
        f64::NAN
    } else {
        closed as f64 / triples as f64
    };

    let locals: Vec<f64> = counts
        .iter()
        .filter(|&&(_, all)| all > 0)
        .map(|&(closed, all)| closed as f64 / all as f64)
        .collect();
    let average_local = if locals.is_empty() {
        f64::NAN
    } else {
        locals.iter().sum::<f64>() / locals.len() as f64
    };

    Clustering {
        transitivity,
        average_local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn graph_from(node_count: usize, edges: &[(usize, usize, f64)]) -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(node_count);
        for i in 0..node_count {
            builder.get_or_create_node(&format!("u{}", i));
        }
        for &(src, dst, w) in edges {
            builder.add_edge_by_index(src, dst, w).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn density_and_reciprocity() {
        // 0 <-> 1, 1 -> 2, 2 -> 2 (loop counted in density, ignored in reciprocity)
        let graph = graph_from(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 2, 1.0)]);
        assert!((density(&graph) - 4.0 / 6.0).abs() < 1e-12);
        assert!((reciprocity(&graph) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn self_loops_count_towards_density() {
        let graph = graph_from(2, &[(0, 1, 1.0), (1, 0, 1.0), (0, 0, 1.0)]);
        assert!((density(&graph) - 1.5).abs() < 1e-12);
        assert!((reciprocity(&graph) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn subgraph_keeps_internal_edges_only() {
        let graph = graph_from(4, &[(0, 1, 2.0), (1, 2, 3.0), (2, 0, 4.0), (3, 0, 1.0)]);
        let sub = induced_subgraph(&graph, &[0, 2]);

        assert_eq!(sub.node_count, 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.edge_weight(1, 0), Some(4.0));
        assert_eq!(sub.incoming_edges(0), &[1]);
        assert_eq!(sub.username(1), "u2");
    }

    #[test]
    fn degrees_and_strengths() {
        let graph = graph_from(3, &[(0, 1, 2.0), (2, 1, 3.0), (1, 0, 0.5)]);
        assert_eq!(in_degrees(&graph), vec![1, 2, 0]);
        assert_eq!(out_degrees(&graph), vec![1, 1, 1]);
        assert_eq!(weighted_in_degrees(&graph), vec![0.5, 5.0, 0.0]);
        assert_eq!(weighted_out_degrees(&graph), vec![2.0, 0.5, 3.0]);
    }

    #[test]
    fn triangle_with_tail() {
        // Triangle 0-1-2 plus pendant 3 attached to 0
        let graph = graph_from(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (0, 3, 1.0)]);

        // Node 0 has 3 neighbour pairs, one closed; nodes 1 and 2 have one closed pair each
        let result = clustering(&graph);
        assert!((result.transitivity - 3.0 / 5.0).abs() < 1e-12);
        assert!((result.average_local - (1.0 / 3.0 + 1.0 + 1.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_graphs_have_no_density() {
        let graph = graph_from(1, &[]);
        assert!(density(&graph).is_nan());
        assert!(reciprocity(&graph).is_nan());
        assert!(clustering(&graph).transitivity.is_nan());
        assert!(clustering(&graph).average_local.is_nan());
    }
}
