//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod centrality;
pub mod components;
pub mod compressed;
pub mod paths;

pub use builder::GraphBuilder;
pub use compressed::{CompressedGraph, VertexAttributes};
