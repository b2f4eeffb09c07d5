use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use wiki_network_stats::config::Config;
use wiki_network_stats::data::{self, filename::DumpName};
use wiki_network_stats::graph::components::Connectivity;
use wiki_network_stats::report::sections::{self, Analysis};
use wiki_network_stats::report::{Report, ReportFlags};

#[derive(Parser, Debug)]
#[clap(
    name = "wiki-network-stats",
    about = "Social network statistics of a wiki user interaction graph"
)]
struct Cli {
    /// Graph dump file, named `<lang>wiki-<YYYYMMDD>...`
    graph: PathBuf,

    /// Format output as a table row
    #[clap(long)]
    as_table: bool,

    /// Analyze groups
    #[clap(long)]
    group: bool,

    /// Print details about this graph (# of vertexes and # of edges)
    #[clap(short, long)]
    details: bool,

    /// Print mean, max and stddev of unweighted in/out degrees
    #[clap(short = 'e', long)]
    degree: bool,

    /// Print the density of the groups
    #[clap(short = 'r', long)]
    density: bool,

    /// Print the reciprocity of the groups
    #[clap(long)]
    reciprocity: bool,

    /// Print transitivity and average clustering coefficient
    #[clap(short, long)]
    transitivity: bool,

    /// Print component sizes and distances in the giant component
    #[clap(short = 'i', long)]
    distance: bool,

    /// Print the global efficiency
    #[clap(short = 'f', long)]
    efficiency: bool,

    /// Print a one-line summary of the graph
    #[clap(short, long)]
    summary: bool,

    /// Print betweenness, pagerank and weighted degree centrality
    #[clap(short, long)]
    centrality: bool,

    /// Write plot data files of the graph
    #[clap(short, long)]
    plot: bool,

    /// Write the weighted in-degree histogram
    #[clap(long)]
    histogram: bool,

    /// Run gnuplot on the histogram
    #[clap(short, long, requires = "histogram")]
    gnuplot: bool,

    /// Print the power-law exponent of the weighted in-degree distribution
    #[clap(short = 'w', long)]
    power_law: bool,

    /// Write the adjacency matrix of the giant component to a file
    #[clap(short, long)]
    adjacency: bool,

    /// Write a list users-role to a file
    #[clap(long)]
    users_role: bool,

    /// Component type used for the giant component
    #[clap(long, value_enum, default_value = "strong")]
    connectivity: Connectivity,

    /// Directory for output files (default: next to the dump / current directory)
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Lower cutoff of the power-law fit
    #[clap(long, default_value = "6")]
    power_law_xmin: f64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn flags(&self) -> ReportFlags {
        ReportFlags {
            as_table: self.as_table,
            group: self.group,
            details: self.details,
            degree: self.degree,
            density: self.density,
            reciprocity: self.reciprocity,
            transitivity: self.transitivity,
            distance: self.distance,
            efficiency: self.efficiency,
            summary: self.summary,
            centrality: self.centrality,
            plot: self.plot,
            histogram: self.histogram,
            gnuplot: self.gnuplot,
            power_law: self.power_law,
            adjacency: self.adjacency,
            users_role: self.users_role,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let name = DumpName::from_path(&args.graph)?;
    let config = Config::new(args.power_law_xmin, args.connectivity, args.output_dir.clone());
    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    // 1. Load data
    let graph = data::load_graph(&args.graph)?;
    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );

    // 2. Classify users
    let flags = args.flags();
    let mut analysis = Analysis::new(&graph, &config, name, &args.graph, flags.group);
    log::debug!("Defined {} groups", analysis.groups().iter().count());

    // 3. Report
    let stdout = io::stdout();
    let mut report = Report::new(BufWriter::new(stdout.lock()), io::stderr(), flags.as_table);
    sections::run(&mut analysis, &flags, &mut report)?;
    report.into_inner().flush()?;

    log::info!("Analysis complete");

    Ok(())
}
