//! Visualization data generation module

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use quick_xml::escape::escape;

use crate::graph::{CompressedGraph, VertexAttributes};

/// gnuplot script written when the working directory has none
const DEFAULT_HISTOGRAM_SCRIPT: &str = "\
set terminal png size 1200,800
set output 'hist.png'
set logscale y
set xlabel 'rank'
set ylabel 'weighted in-degree'
plot 'hist.dat' using 1 title 'users' with impulses, \\
     '' using 2 title 'sysops' with impulses, \\
     '' using 3 title 'bureaucrats' with impulses, \\
     '' using 4 title 'stewards' with impulses, \\
     '' using 5 title 'founders' with impulses, \\
     '' using 6 title 'bots' with impulses
";

/// Plot colour of a user; later rules win over earlier ones
pub fn vertex_color(vertex: &VertexAttributes) -> &'static str {
    let mut color = "red";
    if vertex.bot {
        color = "purple";
    }
    if vertex.anonymous {
        color = "blue";
    }
    if vertex.sysop {
        color = "yellow";
    }
    if vertex.bureaucrat && vertex.sysop {
        color = "orange";
    }
    color
}

/// Marker size grows with the square root of the weighted in-degree
pub fn vertex_size(weighted_indegree: f64) -> f64 {
    (weighted_indegree + 1.0).sqrt() * 10.0
}

fn write_graphml_header(file: &mut impl Write) -> Result<()> {
    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"color\" for=\"node\" attr.name=\"color\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"size\" for=\"node\" attr.name=\"size\" attr.type=\"double\"/>")?;
    writeln!(file, "  <key id=\"ecolor\" for=\"edge\" attr.name=\"color\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"width\" for=\"edge\" attr.name=\"width\" attr.type=\"double\"/>")?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"directed\">")?;
    Ok(())
}

fn write_nodes(file: &mut impl Write, graph: &CompressedGraph, weighted_in: &[f64]) -> Result<()> {
    for (node, vertex) in graph.vertices.iter().enumerate() {
        writeln!(
            file,
            "    <node id=\"n{}\">\n      <data key=\"label\">{}</data>\n      <data key=\"color\">{}</data>\n      <data key=\"size\">{:.4}</data>\n    </node>",
            node,
            escape(vertex.username.as_str()),
            vertex_color(vertex),
            vertex_size(weighted_in[node])
        )?;
    }
    Ok(())
}

/// Graph layout input with role colours and grey edges
fn write_general(path: &Path, graph: &CompressedGraph, weighted_in: &[f64]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_graphml_header(&mut file)?;
    write_nodes(&mut file, graph, weighted_in)?;

    let mut edge_id = 0;
    for src in 0..graph.node_count {
        for &dst in graph.outgoing_edges(src) {
            writeln!(
                file,
                "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">\n      <data key=\"ecolor\">grey</data>\n    </edge>",
                edge_id, src, dst
            )?;
            edge_id += 1;
        }
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;
    Ok(())
}

/// Same graph with edges shaded red by weight and as wide as their weight
fn write_weighted_edges(path: &Path, graph: &CompressedGraph, weighted_in: &[f64]) -> Result<()> {
    let max_weight = graph.weights.iter().copied().fold(0.0f64, f64::max);

    let mut file = BufWriter::new(File::create(path)?);
    write_graphml_header(&mut file)?;
    write_nodes(&mut file, graph, weighted_in)?;

    let mut edge_id = 0;
    for src in 0..graph.node_count {
        for (&dst, &weight) in graph.outgoing_edges(src).iter().zip(graph.outgoing_weights(src)) {
            let red = if max_weight > 0.0 { 255.0 * weight / max_weight } else { 0.0 };
            writeln!(
                file,
                "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">\n      <data key=\"ecolor\">rgb({:.0},0,0)</data>\n      <data key=\"width\">{}</data>\n    </edge>",
                edge_id, src, dst, red, weight
            )?;
            edge_id += 1;
        }
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;
    Ok(())
}

/// Write the two plot data files for `lang` into `dir`, returning their paths
pub fn generate_plot_data(
    graph: &CompressedGraph,
    weighted_in: &[f64],
    lang: &str,
    dir: &Path,
) -> Result<(PathBuf, PathBuf)> {
    log::info!("Generating plot data for {} nodes", graph.node_count);

    fs::create_dir_all(dir)?;
    let general = dir.join(format!("{}_general.graphml", lang));
    let weighted = dir.join(format!("{}_weighted_edges.graphml", lang));

    write_general(&general, graph, weighted_in)?;
    write_weighted_edges(&weighted, graph, weighted_in)?;

    Ok((general, weighted))
}

/// Run `gnuplot hist.gnuplot` in `dir` and give its input and output their
/// dump-specific names
pub fn run_gnuplot(dir: &Path, png_name: &str, dat_name: &str) -> Result<()> {
    let script = dir.join("hist.gnuplot");
    if !script.exists() {
        log::info!("No hist.gnuplot found, writing the default script");
        fs::write(&script, DEFAULT_HISTOGRAM_SCRIPT)?;
    }

    log::info!("Running gnuplot");
    let status = Command::new("gnuplot")
        .arg("hist.gnuplot")
        .current_dir(dir)
        .status()
        .context("Failed to start gnuplot")?;
    if !status.success() {
        return Err(anyhow!("gnuplot exited with {}", status));
    }

    fs::rename(dir.join("hist.png"), dir.join(png_name))?;
    fs::rename(dir.join("hist.dat"), dir.join(dat_name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn colours_follow_role_precedence() {
        let mut v = VertexAttributes::named("x");
        assert_eq!(vertex_color(&v), "red");
        v.bot = true;
        assert_eq!(vertex_color(&v), "purple");
        v.anonymous = true;
        assert_eq!(vertex_color(&v), "blue");
        v.sysop = true;
        assert_eq!(vertex_color(&v), "yellow");
        v.bureaucrat = true;
        assert_eq!(vertex_color(&v), "orange");
    }

    #[test]
    fn size_of_isolated_user() {
        assert_eq!(vertex_size(0.0), 10.0);
        assert_eq!(vertex_size(3.0), 20.0);
    }

    #[test]
    fn plot_files_are_written() {
        let mut builder = GraphBuilder::with_capacity(2);
        builder.add_edge("a<b&c", "c", 4.0).unwrap();
        builder.add_edge("c", "a<b&c", 2.0).unwrap();
        let graph = builder.build().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let (general, weighted) = generate_plot_data(&graph, &[2.0, 4.0], "en", dir.path()).unwrap();

        let general = fs::read_to_string(general).unwrap();
        assert!(general.contains("a&lt;b&amp;c"));
        assert!(general.contains("<data key=\"ecolor\">grey</data>"));

        let weighted = fs::read_to_string(weighted).unwrap();
        assert!(weighted.contains("rgb(255,0,0)"));
        assert!(weighted.contains("rgb(128,0,0)"));
    }
}
