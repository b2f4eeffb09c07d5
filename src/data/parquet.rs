//! Parquet file handling for graph data

use std::path::{Path, PathBuf};

use anyhow::Result;
use polars::prelude::*;

use crate::graph::{CompressedGraph, GraphBuilder, VertexAttributes};

/// Role columns read from a node table when present
const ROLE_COLUMNS: &[&str] = &[
    "bot",
    "sysop",
    "bureaucrat",
    "steward",
    "founder",
    "anonymous",
    "blocked",
];

/// `<stem>-nodes.parquet` next to an edge table `<stem>.parquet`
pub fn nodes_path(edges_path: &Path) -> PathBuf {
    let stem = edges_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    edges_path.with_file_name(format!("{}-nodes.parquet", stem))
}

fn set_role(attrs: &mut VertexAttributes, column: &str, value: bool) {
    match column {
        "bot" => attrs.bot = value,
        "sysop" => attrs.sysop = value,
        "bureaucrat" => attrs.bureaucrat = value,
        "steward" => attrs.steward = value,
        "founder" => attrs.founder = value,
        "anonymous" => attrs.anonymous = value,
        "blocked" => attrs.blocked = value,
        _ => {}
    }
}

/// Register users and their role flags from a node table
fn load_nodes(path: &Path, builder: &mut GraphBuilder) -> Result<()> {
    log::info!("Reading node table: {}", path.display());

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;
    let usernames = df.column("username")?.str()?;

    let present: Vec<&str> = ROLE_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_ok())
        .collect();
    log::debug!("Node table role columns: {:?}", present);

    let mut role_values = Vec::with_capacity(present.len());
    for &name in &present {
        role_values.push((name, df.column(name)?.bool()?));
    }

    for i in 0..df.height() {
        let Some(username) = usernames.get(i) else {
            continue;
        };
        let mut attrs = VertexAttributes::named(username);
        for (name, values) in &role_values {
            set_role(&mut attrs, name, values.get(i).unwrap_or(false));
        }
        builder.set_attributes(attrs);
    }

    Ok(())
}

/// Load an interaction graph from a parquet edge table.
///
/// The edge table has `source` and `target` username columns and an
/// optional numeric `weight` column (missing weights count as 1). Role
/// flags come from a sibling node table when one exists.
pub fn load_interaction_graph(path: &Path) -> Result<CompressedGraph> {
    log::info!("Reading parquet file: {}", path.display());

    // Check if the file exists
    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;
    log::debug!("File schema: {:?}", df.schema());
    log::info!("Loaded {} interaction rows", df.height());

    let mut builder = GraphBuilder::with_capacity(df.height());

    let nodes = nodes_path(path);
    if nodes.exists() {
        load_nodes(&nodes, &mut builder)?;
    }

    let sources = df.column("source")?.str()?;
    let targets = df.column("target")?.str()?;
    let weights = match df.column("weight") {
        Ok(column) => Some(column.cast(&DataType::Float64)?),
        Err(_) => None,
    };
    let weights = match &weights {
        Some(column) => Some(column.f64()?),
        None => None,
    };

    for i in 0..df.height() {
        let (Some(src), Some(dst)) = (sources.get(i), targets.get(i)) else {
            continue;
        };
        let weight = weights.and_then(|w| w.get(i)).unwrap_or(1.0);
        builder.add_edge(src, dst, weight)?;
    }

    log::info!("Building compressed graph with {} nodes", builder.node_count());
    builder.build()
}
