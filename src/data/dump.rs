//! Serialized graph dumps (bincode and JSON)

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{CompressedGraph, GraphBuilder, VertexAttributes};

/// One directed interaction between two users, by vertex position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// On-disk form of a user interaction graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDump {
    pub vertices: Vec<VertexAttributes>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDump {
    /// Snapshot of an in-memory graph
    pub fn from_graph(graph: &CompressedGraph) -> Self {
        let mut edges = Vec::with_capacity(graph.edge_count());
        for src in 0..graph.node_count {
            for (&dst, &weight) in graph.outgoing_edges(src).iter().zip(graph.outgoing_weights(src)) {
                edges.push(EdgeRecord {
                    source: src,
                    target: dst as usize,
                    weight,
                });
            }
        }
        Self {
            vertices: graph.vertices.clone(),
            edges,
        }
    }

    pub fn into_graph(self) -> Result<CompressedGraph> {
        let mut builder = GraphBuilder::with_capacity(self.vertices.len());
        for vertex in self.vertices {
            builder.add_vertex(vertex);
        }
        for edge in &self.edges {
            builder.add_edge_by_index(edge.source, edge.target, edge.weight)?;
        }
        builder.build()
    }
}

pub fn load_bincode(path: &Path) -> Result<GraphDump> {
    log::info!("Reading bincode dump: {}", path.display());

    let file = File::open(path).with_context(|| format!("File not found: {}", path.display()))?;
    let dump: GraphDump = bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Malformed bincode dump: {}", path.display()))?;
    Ok(dump)
}

pub fn load_json(path: &Path) -> Result<GraphDump> {
    log::info!("Reading JSON dump: {}", path.display());

    let file = File::open(path).with_context(|| format!("File not found: {}", path.display()))?;
    let dump: GraphDump = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed JSON dump: {}", path.display()))?;
    Ok(dump)
}

pub fn save_bincode(dump: &GraphDump, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, dump)?;
    writer.flush()?;
    Ok(())
}

pub fn save_json(dump: &GraphDump, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, dump)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dump() -> GraphDump {
        let mut bot = VertexAttributes::named("Bot1");
        bot.bot = true;
        GraphDump {
            vertices: vec![VertexAttributes::named("Alice"), bot],
            edges: vec![
                EdgeRecord { source: 0, target: 1, weight: 3.0 },
                EdgeRecord { source: 1, target: 0, weight: 1.0 },
            ],
        }
    }

    #[test]
    fn bincode_dump_loads_into_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itwiki-20100101.bin");
        save_bincode(&sample_dump(), &path).unwrap();

        let graph = load_bincode(&path).unwrap().into_graph().unwrap();
        assert_eq!(graph.node_count, 2);
        assert_eq!(graph.edge_weight(0, 1), Some(3.0));
        assert!(graph.vertices[1].bot);
    }

    #[test]
    fn json_flags_default_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dewiki-20100101.json");
        std::fs::write(
            &path,
            r#"{"vertices":[{"username":"a","sysop":true},{"username":"b"}],
                "edges":[{"source":1,"target":0,"weight":2.0}]}"#,
        )
        .unwrap();

        let graph = load_json(&path).unwrap().into_graph().unwrap();
        assert!(graph.vertices[0].sysop);
        assert!(!graph.vertices[1].sysop);
        assert_eq!(graph.in_degree(0), 1);
    }

    #[test]
    fn load_graph_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("frwiki-20100101.json");
        let bin = dir.path().join("frwiki-20100101.dump");
        save_json(&sample_dump(), &json).unwrap();
        save_bincode(&sample_dump(), &bin).unwrap();

        for path in [json, bin] {
            let graph = crate::data::load_graph(&path).unwrap();
            assert_eq!(graph.edge_count(), 2);
            assert_eq!(graph.username(0), "Alice");
        }
    }

    #[test]
    fn snapshot_preserves_edges() {
        let graph = sample_dump().into_graph().unwrap();
        assert_eq!(GraphDump::from_graph(&graph), sample_dump());
    }

    #[test]
    fn out_of_range_edge_is_rejected() {
        let mut dump = sample_dump();
        dump.edges.push(EdgeRecord { source: 0, target: 7, weight: 1.0 });
        assert!(dump.into_graph().is_err());
    }
}
