//! Centrality measures: weighted betweenness and weighted PageRank

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::graph::CompressedGraph;

/// Relative tolerance under which two path lengths count as equal
const PATH_EPSILON: f64 = 1e-10;

fn same_length(a: f64, b: f64) -> bool {
    (a - b).abs() <= PATH_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Dependencies accumulated from one source (Brandes with Dijkstra).
fn single_source_dependencies(graph: &CompressedGraph, source: usize) -> Vec<f64> {
    let n = graph.node_count;
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0f64; n];
    let mut pred: Vec<Vec<u32>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut order: Vec<usize> = Vec::new();
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    sigma[source] = 1.0;
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), v))) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        order.push(v);

        for (&w, &length) in graph.outgoing_edges(v).iter().zip(graph.outgoing_lengths(v)) {
            let w = w as usize;
            if settled[w] {
                continue;
            }
            let alt = d + length;
            if dist[w].is_finite() && same_length(alt, dist[w]) {
                sigma[w] += sigma[v];
                pred[w].push(v as u32);
            } else if alt < dist[w] {
                dist[w] = alt;
                sigma[w] = sigma[v];
                pred[w].clear();
                pred[w].push(v as u32);
                heap.push(Reverse((OrderedFloat(alt), w)));
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    for &w in order.iter().rev() {
        let sigma_w = sigma[w];
        for &v in &pred[w] {
            let v = v as usize;
            delta[v] += (sigma[v] / sigma_w) * (1.0 + delta[w]);
        }
    }
    delta[source] = 0.0;
    delta
}

/// Directed betweenness over edge lengths, unnormalised.
///
/// Returns one score per node, ordered by index.
pub fn betweenness(graph: &CompressedGraph) -> Vec<f64> {
    let n = graph.node_count;

    (0..n)
        .into_par_iter()
        .fold(
            || vec![0.0f64; n],
            |mut acc, source| {
                for (total, dep) in acc.iter_mut().zip(single_source_dependencies(graph, source)) {
                    *total += dep;
                }
                acc
            },
        )
        .reduce(
            || vec![0.0f64; n],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}

/// PageRank over edge weights.
///
/// Rank flowing out of a node is split in proportion to its outgoing
/// weights; nodes with no outgoing weight spread their rank uniformly.
/// The result sums to one.
pub fn pagerank(
    graph: &CompressedGraph,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Vec<f64> {
    let n = graph.node_count;
    if n == 0 {
        return Vec::new();
    }

    let out_strength: Vec<f64> = (0..n)
        .map(|node| graph.outgoing_weights(node).iter().sum::<f64>())
        .collect();
    let uniform = 1.0 / n as f64;
    let mut rank = vec![uniform; n];

    for iteration in 0..max_iterations {
        let dangling: f64 = rank
            .iter()
            .zip(&out_strength)
            .filter(|&(_, &s)| s <= 0.0)
            .map(|(r, _)| r)
            .sum();
        let base = (1.0 - damping) * uniform + damping * dangling * uniform;

        let next: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|node| {
                let inflow: f64 = graph
                    .incoming_edges(node)
                    .iter()
                    .zip(graph.incoming_weights(node))
                    .map(|(&src, &w)| rank[src as usize] * w / out_strength[src as usize])
                    .sum();
                base + damping * inflow
            })
            .collect();

        let change: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
        rank = next;
        if change < tolerance {
            log::debug!("PageRank converged after {} iterations", iteration + 1);
            break;
        }
    }

    let total: f64 = rank.iter().sum();
    if total > 0.0 {
        for r in &mut rank {
            *r /= total;
        }
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn graph_from(node_count: usize, edges: &[(usize, usize, f64)]) -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(node_count);
        for i in 0..node_count {
            builder.get_or_create_node(&format!("n{}", i));
        }
        for &(src, dst, w) in edges {
            builder.add_edge_by_index(src, dst, w).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn line_graph_middle_is_highest() {
        // 0 -> 1 -> 2 -> 3
        let graph = graph_from(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let bc = betweenness(&graph);
        assert_eq!(bc, vec![0.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn equal_paths_split_betweenness() {
        // 0 -> {1, 2} -> 3 with equal lengths
        let graph = graph_from(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let bc = betweenness(&graph);
        assert!((bc[1] - 0.5).abs() < 1e-12);
        assert!((bc[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn heavy_edge_is_the_short_way() {
        // 0 -> 1 -> 2 with heavy edges beats direct light 0 -> 2
        let graph = graph_from(3, &[(0, 1, 10.0), (1, 2, 10.0), (0, 2, 1.0)]);
        let bc = betweenness(&graph);
        assert!((bc[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pagerank_sums_to_one_and_favours_sinks() {
        let graph = graph_from(3, &[(0, 2, 1.0), (1, 2, 1.0)]);
        let pr = pagerank(&graph, 0.85, 1e-12, 1000);
        assert!((pr.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(pr[2] > pr[0]);
        assert!((pr[0] - pr[1]).abs() < 1e-12);
    }

    #[test]
    fn pagerank_of_cycle_is_uniform() {
        let graph = graph_from(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let pr = pagerank(&graph, 0.85, 1e-12, 1000);
        for r in pr {
            assert!((r - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn pagerank_follows_weights() {
        let graph = graph_from(3, &[(0, 1, 9.0), (0, 2, 1.0), (1, 0, 1.0), (2, 0, 1.0)]);
        let pr = pagerank(&graph, 0.85, 1e-12, 1000);
        assert!(pr[1] > pr[2]);
    }
}
