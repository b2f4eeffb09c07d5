//! Graph dump loading

pub mod dump;
pub mod filename;
pub mod parquet;

use std::path::Path;

use anyhow::Result;

use crate::graph::CompressedGraph;

/// Load a graph dump, picking the format from the file extension:
/// `.json`, `.parquet`, anything else is bincode
pub fn load_graph(path: &Path) -> Result<CompressedGraph> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => dump::load_json(path)?.into_graph(),
        "parquet" => parquet::load_interaction_graph(path),
        _ => dump::load_bincode(path)?.into_graph(),
    }
}
