//! Core library functions for the wiki network statistics tool

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod groups;
pub mod report;
pub mod stats;
pub mod storage;
pub mod viz;

pub use anyhow::{anyhow, Result};
