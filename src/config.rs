//! Configuration management for the network statistics run

use std::path::PathBuf;

use crate::graph::components::Connectivity;

/// Parameters shared by the report sections
#[derive(Debug, Clone)]
pub struct Config {
    /// How many values `top()` prints
    pub top_n: usize,

    /// Decimal digits `top()` prints for floating point values
    pub accuracy: usize,

    /// Lower cutoff of the power-law fit
    pub power_law_xmin: f64,

    /// PageRank damping factor
    pub damping: f64,

    /// PageRank stops once the L1 change of an iteration drops below this
    pub pagerank_tolerance: f64,

    /// Hard cap on PageRank iterations
    pub pagerank_max_iterations: usize,

    /// Which components the distance and adjacency sections split on
    pub connectivity: Connectivity,

    /// Where output files go; `None` keeps them next to the dump / in the cwd
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: 5,
            accuracy: 10,
            power_law_xmin: 6.0,
            damping: 0.85,
            pagerank_tolerance: 1e-12,
            pagerank_max_iterations: 1000,
            connectivity: Connectivity::Strong,
            output_dir: None,
        }
    }
}

impl Config {
    /// Create a new configuration with the values the CLI exposes
    pub fn new(
        power_law_xmin: f64,
        connectivity: Connectivity,
        output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            power_law_xmin,
            connectivity,
            output_dir,
            ..Self::default()
        }
    }
}
