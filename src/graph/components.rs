//! Connected component detection

use std::collections::HashMap;

use clap::ValueEnum;
use petgraph::algo::tarjan_scc;

use crate::graph::CompressedGraph;

/// Which notion of connectedness splits the graph into components
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Connectivity {
    /// Mutually reachable along edge direction
    Strong,
    /// Connected when edge direction is ignored
    Weak,
}

/// Union-Find data structure for weakly connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Path compression: point every visited node at the root
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return; // Already in the same set
        }

        // Attach smaller tree under root of larger tree
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += rank_y;
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += rank_x;
        }
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.rank[root as usize]
    }
}

fn weak_components(graph: &CompressedGraph) -> Vec<Vec<u32>> {
    let mut sets = DisjointSets::new(graph.node_count);
    for src in 0..graph.node_count {
        for &dst in graph.outgoing_edges(src) {
            sets.union(src as u32, dst);
        }
    }

    let mut by_root: HashMap<u32, Vec<u32>> = HashMap::new();
    for node in 0..graph.node_count as u32 {
        let root = sets.find(node);
        by_root.entry(root).or_default().push(node);
    }
    by_root.into_values().collect()
}

fn strong_components(graph: &CompressedGraph) -> Vec<Vec<u32>> {
    let pg = graph.to_petgraph();
    tarjan_scc(&pg)
        .into_iter()
        .map(|component| component.into_iter().map(|idx| pg[idx]).collect())
        .collect()
}

/// Split the graph into components.
///
/// Each component lists its nodes in ascending order; components come
/// largest first, ties ordered by their smallest node.
pub fn components(graph: &CompressedGraph, mode: Connectivity) -> Vec<Vec<u32>> {
    let mut components = match mode {
        Connectivity::Strong => strong_components(graph),
        Connectivity::Weak => weak_components(graph),
    };

    for component in &mut components {
        component.sort_unstable();
    }
    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

    log::debug!("Found {} {:?} components", components.len(), mode);
    components
}

/// Nodes of the largest component (empty for an empty graph)
pub fn giant_component(graph: &CompressedGraph, mode: Connectivity) -> Vec<u32> {
    components(graph, mode).into_iter().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn chain() -> CompressedGraph {
        // 0 <-> 1 -> 2 <-> 3, 4 isolated
        let mut builder = GraphBuilder::with_capacity(5);
        for name in ["a", "b", "c", "d", "e"] {
            builder.get_or_create_node(name);
        }
        for (s, d) in [(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)] {
            builder.add_edge_by_index(s, d, 1.0).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn strong_components_follow_direction() {
        let found = components(&chain(), Connectivity::Strong);
        assert_eq!(found, vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert_eq!(giant_component(&chain(), Connectivity::Strong), vec![0, 1]);
    }

    #[test]
    fn weak_components_ignore_direction() {
        let found = components(&chain(), Connectivity::Weak);
        assert_eq!(found, vec![vec![0, 1, 2, 3], vec![4]]);
    }

    #[test]
    fn disjoint_sets_track_sizes() {
        let mut sets = DisjointSets::new(4);
        sets.union(0, 1);
        sets.union(2, 1);
        assert_eq!(sets.size(0), 3);
        assert_eq!(sets.size(3), 1);
        assert_eq!(sets.find(2), sets.find(0));
    }

    #[test]
    fn empty_graph_has_no_giant() {
        let graph = GraphBuilder::with_capacity(0).build().unwrap();
        assert!(giant_component(&graph, Connectivity::Weak).is_empty());
    }
}
