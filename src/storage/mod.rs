//! Results persistence module

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use ndarray::Array2;
use serde_json::{json, to_string_pretty};

use crate::graph::CompressedGraph;
use crate::groups::user_role;

/// Number of group columns in the histogram file
pub const HISTOGRAM_COLUMNS: usize = 6;

/// One histogram line: `value` in `column` (1-based), zeros elsewhere
pub fn histogram_row(value: f64, column: usize) -> String {
    let mut cells = vec!["0".to_string(); HISTOGRAM_COLUMNS];
    cells[column - 1] = value.to_string();
    cells.join(" ")
}

/// Write `(value, column)` entries, largest first
pub fn write_histogram(path: &Path, entries: &[(f64, usize)]) -> Result<()> {
    log::info!("Writing histogram with {} entries to {}", entries.len(), path.display());

    let sorted = entries.iter().sorted_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.cmp(&a.1))
    });

    let mut file = BufWriter::new(File::create(path)?);
    for &(value, column) in sorted {
        writeln!(file, "{}", histogram_row(value, column))?;
    }
    file.flush()?;
    Ok(())
}

/// Weight matrix of the subgraph spanned by `members`; cell (i, j) is the
/// weight of the edge members[i] -> members[j], 0 when absent
pub fn adjacency_matrix(graph: &CompressedGraph, members: &[u32]) -> Array2<f64> {
    let mut matrix = Array2::<f64>::zeros((members.len(), members.len()));
    for (i, &src) in members.iter().enumerate() {
        for (j, &dst) in members.iter().enumerate() {
            if let Some(weight) = graph.edge_weight(src as usize, dst) {
                matrix[[i, j]] = weight;
            }
        }
    }
    matrix
}

/// Reciprocated part of the adjacency matrix: `min(w(i, j), w(j, i))`
pub fn reciprocity_matrix(adjacency: &Array2<f64>) -> Array2<f64> {
    let transposed = adjacency.t();
    let mut matrix = adjacency.clone();
    matrix.zip_mut_with(&transposed, |a, &b| *a = a.min(b));
    matrix
}

fn write_matrix(graph: &CompressedGraph, members: &[u32], matrix: &Array2<f64>, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let header = std::iter::once("").chain(members.iter().map(|&node| graph.username(node as usize)));
    writer.write_record(header)?;

    for (row, &node) in matrix.rows().into_iter().zip(members) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(graph.username(node as usize).to_string());
        record.extend(row.iter().map(|weight| weight.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the weighted adjacency matrix of `members` as CSV
pub fn write_adjacency_matrix(graph: &CompressedGraph, members: &[u32], path: &Path) -> Result<()> {
    log::info!("Writing {}x{} adjacency matrix to {}", members.len(), members.len(), path.display());
    write_matrix(graph, members, &adjacency_matrix(graph, members), path)
}

/// Write the reciprocated weight matrix of `members` as CSV
pub fn write_reciprocity_matrix(graph: &CompressedGraph, members: &[u32], path: &Path) -> Result<()> {
    log::info!("Writing reciprocity matrix to {}", path.display());
    let reciprocated = reciprocity_matrix(&adjacency_matrix(graph, members));
    write_matrix(graph, members, &reciprocated, path)
}

/// `(username, role)` for every user, sorted
pub fn users_roles(graph: &CompressedGraph) -> Vec<(String, &'static str)> {
    graph
        .vertices
        .iter()
        .map(|vertex| (vertex.username.clone(), user_role(vertex)))
        .sorted()
        .collect()
}

/// Write one `username,role` line per user
pub fn write_users_role(graph: &CompressedGraph, path: &Path) -> Result<()> {
    log::info!("Writing roles of {} users to {}", graph.node_count, path.display());

    let mut writer = csv::Writer::from_path(path)?;
    for (username, role) in users_roles(graph) {
        writer.write_record([username.as_str(), role])?;
    }
    writer.flush()?;
    Ok(())
}

/// Save the captured report lines as a single table row
pub fn save_table_row(path: &Path, lang: &str, date: &str, values: &[(String, String)]) -> Result<()> {
    log::info!("Saving table row with {} values to {}", values.len(), path.display());

    let values: BTreeMap<&str, &str> = values
        .iter()
        .map(|(label, value)| (label.as_str(), value.as_str()))
        .collect();
    let row = json!({
        "lang": lang,
        "date": date,
        "values": values,
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&row)?.as_bytes())?;
    Ok(())
}
