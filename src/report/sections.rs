//! The report sections and the dispatcher running them in order

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;
use crate::data::filename::DumpName;
use crate::graph::algorithms::{self, induced_subgraph};
use crate::graph::centrality;
use crate::graph::components::{components, giant_component};
use crate::graph::paths::{average_distance, efficiency, EdgeCost};
use crate::graph::CompressedGraph;
use crate::groups::{self, Groups, UNPRIVILEGED};
use crate::report::timer::SectionTimer;
use crate::report::{Report, ReportFlags};
use crate::stats::power_law::fit_exponent;
use crate::stats::{gather, mean, std_dev, top, top_weights};
use crate::storage;
use crate::viz;

/// Per-node values computed on demand and shared by later sections
#[derive(Debug, Default)]
struct NodeValues {
    in_degrees: Option<Vec<u32>>,
    out_degrees: Option<Vec<u32>>,
    weighted_in: Option<Vec<f64>>,
    weighted_out: Option<Vec<f64>>,
    betweenness: Option<Vec<f64>>,
    pagerank: Option<Vec<f64>>,
}

/// Report labels of one centrality measure
struct MeasureLabels {
    average: &'static str,
    stddev: &'static str,
    max: &'static str,
    /// Top values print as integers when they are whole numbers
    weights: bool,
}

const BETWEENNESS_LABELS: MeasureLabels = MeasureLabels {
    average: "average betweenness ",
    stddev: "stddev betweenness ",
    max: "max betweenness",
    weights: false,
};

const PAGERANK_LABELS: MeasureLabels = MeasureLabels {
    average: "average pagerank ",
    stddev: "stddev pagerank ",
    max: "max pagerank",
    weights: false,
};

const IN_STRENGTH_LABELS: MeasureLabels = MeasureLabels {
    average: "average IN degree centrality (weighted)",
    stddev: "stddev IN degree centrality (weighted)",
    max: "max IN degrees centrality (weighted)",
    weights: true,
};

const OUT_STRENGTH_LABELS: MeasureLabels = MeasureLabels {
    average: "average OUT degree centrality (weighted) ",
    stddev: "stddev OUT degree centrality (weighted) ",
    max: "max OUT degrees centrality (weighted)",
    weights: true,
};

/// Everything a section may read: the graph, its groups and settings
pub struct Analysis<'a> {
    graph: &'a CompressedGraph,
    config: &'a Config,
    name: DumpName,
    input_dir: PathBuf,
    groups: Groups,
    values: NodeValues,
}

impl<'a> Analysis<'a> {
    /// `all_groups` defines every role group, otherwise only `all`
    pub fn new(
        graph: &'a CompressedGraph,
        config: &'a Config,
        name: DumpName,
        input_path: &Path,
        all_groups: bool,
    ) -> Self {
        let groups = if all_groups {
            Groups::classify_all(graph)
        } else {
            Groups::all_only(graph)
        };
        let input_dir = input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            graph,
            config,
            name,
            input_dir,
            groups,
            values: NodeValues::default(),
        }
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Directory for files named after the dump (matrices, roles, table)
    fn dump_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.clone())
    }

    /// Directory for histogram and plot files
    fn work_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn fmt_top<T: crate::stats::TopValue>(&self, values: &[T]) -> String {
        top(values, self.config.top_n, self.config.accuracy)
    }

    fn fmt_top_weights(&self, values: &[f64]) -> String {
        top_weights(values, self.config.top_n, self.config.accuracy)
    }

    fn ensure_degrees(&mut self) {
        let graph = self.graph;
        self.values
            .in_degrees
            .get_or_insert_with(|| algorithms::in_degrees(graph));
        self.values
            .out_degrees
            .get_or_insert_with(|| algorithms::out_degrees(graph));
    }

    fn ensure_weighted_degrees(&mut self) {
        let graph = self.graph;
        if self.values.weighted_in.is_none() {
            let _timer = SectionTimer::start("set weighted indegree");
            self.values.weighted_in = Some(algorithms::weighted_in_degrees(graph));
        }
        if self.values.weighted_out.is_none() {
            self.values.weighted_out = Some(algorithms::weighted_out_degrees(graph));
        }
    }

    fn ensure_centrality(&mut self) {
        let graph = self.graph;
        let config = self.config;
        if self.values.betweenness.is_none() {
            log::info!("betweenness");
            self.values.betweenness = Some(centrality::betweenness(graph));
        }
        if self.values.pagerank.is_none() {
            log::info!("pagerank");
            self.values.pagerank = Some(centrality::pagerank(
                graph,
                config.damping,
                config.pagerank_tolerance,
                config.pagerank_max_iterations,
            ));
        }
        log::info!("outdegree");
        self.ensure_weighted_degrees();
    }

    pub fn group_sizes<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        for (group, members) in self.groups.iter() {
            report.group_line(group, "nodes number ", members.len())?;
        }
        Ok(())
    }

    pub fn header<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        report.line("lang", &self.name.lang)?;
        report.line("date", &self.name.date)
    }

    pub fn details<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("details");
        let graph = self.graph;
        let vn = graph.node_count;

        let with_out = (0..vn).filter(|&node| graph.out_degree(node) >= 1).count();
        let with_in = (0..vn).filter(|&node| graph.in_degree(node) >= 1).count();

        report.line("nodes number", vn)?;
        report.line("edges number", graph.edge_count())?;
        report.line(
            "nodes with out edges number",
            format!("{} ({:.6}%)", with_out, 100.0 * with_out as f64 / vn as f64),
        )?;
        report.line(
            "nodes with in edges number",
            format!("{} ({:.6}%)", with_in, 100.0 * with_in as f64 / vn as f64),
        )?;
        report.line("max weights on edges ", self.fmt_top_weights(&graph.weights))
    }

    pub fn density_reciprocity<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("density&reciprocity");
        for (group, members) in self.groups.iter() {
            if members.len() <= 1 {
                continue;
            }

            let subgraph = induced_subgraph(self.graph, members);
            report.group_line(group, "density ", format!("{:.10}", algorithms::density(&subgraph)))?;
            report.group_line(
                group,
                "reciprocity ",
                format!("{:.10}", algorithms::reciprocity(&subgraph)),
            )?;
        }
        Ok(())
    }

    pub fn degree<W: Write, E: Write>(&mut self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("degree");
        self.ensure_degrees();
        let in_degrees = self.values.in_degrees.as_deref().unwrap_or_default();
        let out_degrees = self.values.out_degrees.as_deref().unwrap_or_default();

        for (group, members) in self.groups.iter() {
            if members.is_empty() {
                continue;
            }

            let ind = gather(in_degrees, members);
            let outd = gather(out_degrees, members);
            let ind_f: Vec<f64> = ind.iter().map(|&d| d as f64).collect();
            let outd_f: Vec<f64> = outd.iter().map(|&d| d as f64).collect();

            report.group_line(group, "mean IN degree (no weights)", format!("{:.6}", mean(&ind_f)))?;
            report.group_line(group, "mean OUT degree (no weights)", format!("{:.6}", mean(&outd_f)))?;
            report.group_line(group, "max IN degrees (no weights)", self.fmt_top(&ind))?;
            report.group_line(group, "max OUT degrees (no weights)", self.fmt_top(&outd))?;
            report.group_line(group, "stddev IN degree (no weights)", format!("{:.6}", std_dev(&ind_f)))?;
            report.group_line(group, "stddev OUT degree (no weights)", format!("{:.6}", std_dev(&outd_f)))?;
        }
        Ok(())
    }

    pub fn transitivity<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("transitivity");
        let clustering = algorithms::clustering(self.graph);
        report.line("transitivity", format!("{:.6}", clustering.transitivity))?;
        report.line(
            "average clustering coefficient",
            format!("{:.6}", clustering.average_local),
        )
    }

    pub fn summary<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let summary = format!(
            "directed, {} vertices, {} edges; vertex attributes: username, bot, sysop, bureaucrat, steward, founder, anonymous, blocked; edge attributes: weight, length",
            self.graph.node_count,
            self.graph.edge_count()
        );
        report.line("summary", summary)
    }

    pub fn distance<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let giant = {
            let _timer = SectionTimer::start("split clusters");
            let found = components(self.graph, self.config.connectivity);
            let sizes: Vec<usize> = found.iter().map(Vec::len).collect();
            report.line("length of 5 max clusters", self.fmt_top(&sizes))?;
            found.into_iter().next().unwrap_or_default()
        };

        let _timer = SectionTimer::start("distance");
        let subgraph = induced_subgraph(self.graph, &giant);
        report.line(
            "average distance in the giant component",
            format!("{:.6}", average_distance(&subgraph, EdgeCost::Length)),
        )?;
        report.line(
            "average hops in the giant component",
            format!("{:.6}", average_distance(&subgraph, EdgeCost::Hop)),
        )
    }

    pub fn efficiency<W: Write, E: Write>(&self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("efficiency");
        report.line("efficiency", format!("{:.6}", efficiency(self.graph)))
    }

    /// Average, stddev and top values of one per-node measure for a group
    fn describe<W: Write, E: Write>(
        &self,
        report: &mut Report<W, E>,
        group: &str,
        labels: &MeasureLabels,
        values: &[f64],
    ) -> Result<()> {
        report.group_line(group, labels.average, format!("{:.10}", mean(values)))?;
        report.group_line(group, labels.stddev, format!("{:.10}", std_dev(values)))?;
        let max = if labels.weights {
            self.fmt_top_weights(values)
        } else {
            self.fmt_top(values)
        };
        report.group_line(group, labels.max, max)
    }

    pub fn centrality<W: Write, E: Write>(&mut self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("centrality");
        self.ensure_centrality();

        let vn = self.graph.node_count as f64;
        let max_edges = vn * (vn - 1.0);
        let betweenness = self.values.betweenness.as_deref().unwrap_or_default();
        let pagerank = self.values.pagerank.as_deref().unwrap_or_default();
        let weighted_in = self.values.weighted_in.as_deref().unwrap_or_default();
        let weighted_out = self.values.weighted_out.as_deref().unwrap_or_default();

        for (group, members) in self.groups.iter() {
            if members.is_empty() {
                continue;
            }

            let norm_betweenness: Vec<f64> = gather(betweenness, members)
                .into_iter()
                .map(|b| b / max_edges)
                .collect();
            self.describe(report, group, &BETWEENNESS_LABELS, &norm_betweenness)?;
            self.describe(report, group, &PAGERANK_LABELS, &gather(pagerank, members))?;
            self.describe(report, group, &IN_STRENGTH_LABELS, &gather(weighted_in, members))?;
            self.describe(report, group, &OUT_STRENGTH_LABELS, &gather(weighted_out, members))?;
        }
        Ok(())
    }

    pub fn power_law<W: Write, E: Write>(&mut self, report: &mut Report<W, E>) -> Result<()> {
        let _timer = SectionTimer::start("power law");
        self.ensure_weighted_degrees();
        let weighted_in = self.values.weighted_in.as_deref().unwrap_or_default();
        let label = "alpha exp IN degree distribution ";

        for (group, members) in self.groups.iter() {
            if members.is_empty() {
                continue;
            }

            match fit_exponent(&gather(weighted_in, members), self.config.power_law_xmin) {
                Ok(alpha) => report.group_line(group, label, format!("{:10.6} ", alpha))?,
                Err(err) => {
                    log::warn!("{}: power-law fit failed: {}", group, err);
                    report.group_error(group, label)?;
                }
            }
        }
        Ok(())
    }

    /// `(weighted indegree, column)` for every user with incoming weight;
    /// column 1 holds unprivileged users, 2-6 sysops, bureaucrats,
    /// stewards, founders and bots
    pub fn histogram_entries(&mut self) -> Vec<(f64, usize)> {
        self.ensure_weighted_degrees();
        let weighted_in = self.values.weighted_in.as_deref().unwrap_or_default();

        let columns = [
            groups::select(self.graph, UNPRIVILEGED),
            self.members_of("sysop"),
            self.members_of("bureaucrat"),
            self.members_of("steward"),
            self.members_of("founder"),
            self.members_of("bot"),
        ];

        columns
            .iter()
            .enumerate()
            .flat_map(|(i, members)| {
                gather(weighted_in, members)
                    .into_iter()
                    .filter(|&degree| degree != 0.0)
                    .map(move |degree| (degree, i + 1))
            })
            .collect()
    }

    /// Members of a named group, classified on demand when the run only
    /// defined `all`
    fn members_of(&self, name: &str) -> Vec<u32> {
        match self.groups.get(name) {
            Some(members) => members.to_vec(),
            None => groups::definition(name)
                .map(|def| groups::select(self.graph, def.conditions))
                .unwrap_or_default(),
        }
    }

    /// Write the histogram file, returning its path
    pub fn histogram(&mut self, for_gnuplot: bool) -> Result<PathBuf> {
        let entries = self.histogram_entries();
        let file_name = if for_gnuplot {
            "hist.dat".to_string()
        } else {
            self.name.output_name("hist.dat")
        };
        let path = self.work_dir().join(file_name);
        storage::write_histogram(&path, &entries)?;
        Ok(path)
    }

    pub fn gnuplot(&self) -> Result<()> {
        let _timer = SectionTimer::start("gnuplot");
        viz::run_gnuplot(
            &self.work_dir(),
            &self.name.output_name("hist.png"),
            &self.name.output_name("hist.dat"),
        )
    }

    pub fn plot(&mut self) -> Result<()> {
        let _timer = SectionTimer::start("plot");
        self.ensure_weighted_degrees();
        let weighted_in = self.values.weighted_in.as_deref().unwrap_or_default();
        viz::generate_plot_data(self.graph, weighted_in, &self.name.lang, &self.work_dir())?;
        Ok(())
    }

    pub fn save_table<W: Write, E: Write>(&self, report: &Report<W, E>) -> Result<PathBuf> {
        let path = self.dump_dir().join(self.name.output_name("table.json"));
        storage::save_table_row(&path, &self.name.lang, &self.name.date, report.captured())?;
        Ok(path)
    }

    pub fn adjacency(&self) -> Result<()> {
        let _timer = SectionTimer::start("adjacency");
        let giant = giant_component(self.graph, self.config.connectivity);
        let dir = self.dump_dir();
        storage::write_adjacency_matrix(self.graph, &giant, &dir.join(self.name.output_name("adj.csv")))?;
        storage::write_reciprocity_matrix(self.graph, &giant, &dir.join(self.name.output_name("rec.csv")))
    }

    pub fn users_role(&self) -> Result<()> {
        let path = self.dump_dir().join(self.name.output_name("ur.csv"));
        storage::write_users_role(self.graph, &path)
    }
}

/// Run every enabled section in report order
pub fn run<W: Write, E: Write>(analysis: &mut Analysis, flags: &ReportFlags, report: &mut Report<W, E>) -> Result<()> {
    if flags.group {
        analysis.group_sizes(report)?;
    }
    analysis.header(report)?;

    if flags.details {
        analysis.details(report)?;
    }
    if flags.density || flags.reciprocity {
        analysis.density_reciprocity(report)?;
    }
    if flags.degree {
        analysis.degree(report)?;
    }
    if flags.transitivity {
        analysis.transitivity(report)?;
    }
    if flags.summary {
        analysis.summary(report)?;
    }
    if flags.distance {
        analysis.distance(report)?;
    }
    if flags.efficiency {
        analysis.efficiency(report)?;
    }
    if flags.centrality {
        analysis.centrality(report)?;
    }
    if flags.power_law {
        analysis.power_law(report)?;
    }
    if flags.histogram {
        analysis.histogram(flags.gnuplot)?;
    }
    if flags.gnuplot {
        analysis.gnuplot()?;
    }
    if flags.plot {
        analysis.plot()?;
    }
    if flags.as_table {
        analysis.save_table(report)?;
    }
    if flags.adjacency {
        analysis.adjacency()?;
    }
    if flags.users_role {
        analysis.users_role()?;
    }
    Ok(())
}
