//! Shortest-path based statistics

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;

use crate::graph::CompressedGraph;

/// Cost of traversing an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCost {
    /// The edge length (inverse weight)
    Length,
    /// Every edge counts as one hop
    Hop,
}

/// Distances from `source` to every node it reaches, itself excluded
fn distances_from(graph: &DiGraph<u32, f64>, source: usize, cost: EdgeCost) -> Vec<f64> {
    let start = NodeIndex::new(source);
    match cost {
        EdgeCost::Length => dijkstra(graph, start, None, |e| *e.weight())
            .into_iter()
            .filter(|&(node, _)| node != start)
            .map(|(_, d)| d)
            .collect(),
        EdgeCost::Hop => dijkstra(graph, start, None, |_| 1usize)
            .into_iter()
            .filter(|&(node, _)| node != start)
            .map(|(_, d)| d as f64)
            .collect(),
    }
}

/// Mean shortest-path distance over ordered pairs of distinct nodes where
/// the second is reachable from the first. Zero when no pair is connected.
pub fn average_distance(graph: &CompressedGraph, cost: EdgeCost) -> f64 {
    let pg = graph.to_petgraph();

    let (total, pairs) = (0..graph.node_count)
        .into_par_iter()
        .map(|source| {
            let distances = distances_from(&pg, source, cost);
            (distances.iter().sum::<f64>(), distances.len() as u64)
        })
        .reduce(|| (0.0, 0), |(t1, p1), (t2, p2)| (t1 + t2, p1 + p2));

    if pairs == 0 {
        return 0.0;
    }
    total / pairs as f64
}

/// Global efficiency over edge lengths: mean of 1/d(i, j) over all ordered
/// pairs of distinct nodes, unreachable pairs counting as zero
pub fn efficiency(graph: &CompressedGraph) -> f64 {
    let n = graph.node_count;
    if n < 2 {
        return 0.0;
    }

    let pg = graph.to_petgraph();
    let total: f64 = (0..n)
        .into_par_iter()
        .map(|source| {
            distances_from(&pg, source, EdgeCost::Length)
                .iter()
                .filter(|&&d| d > 0.0)
                .map(|d| 1.0 / d)
                .sum::<f64>()
        })
        .sum();

    total / (n * (n - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn path_graph() -> CompressedGraph {
        // a -(w=2)-> b -(w=4)-> c
        let mut builder = GraphBuilder::with_capacity(3);
        builder.add_edge("a", "b", 2.0).unwrap();
        builder.add_edge("b", "c", 4.0).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn hop_and_length_averages() {
        let graph = path_graph();
        // Reachable pairs: a->b (1 hop), b->c (1), a->c (2)
        assert!((average_distance(&graph, EdgeCost::Hop) - 4.0 / 3.0).abs() < 1e-12);
        // Lengths: 0.5, 0.25, 0.75
        assert!((average_distance(&graph, EdgeCost::Length) - 1.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn efficiency_counts_unreachable_as_zero() {
        let graph = path_graph();
        let expected = (2.0 + 4.0 + 1.0 / 0.75) / 6.0;
        assert!((efficiency(&graph) - expected).abs() < 1e-12);
    }

    #[test]
    fn disconnected_graph_has_zero_average() {
        let mut builder = GraphBuilder::with_capacity(2);
        builder.get_or_create_node("x");
        builder.get_or_create_node("y");
        let graph = builder.build().unwrap();
        assert_eq!(average_distance(&graph, EdgeCost::Hop), 0.0);
        assert_eq!(efficiency(&graph), 0.0);
    }
}
