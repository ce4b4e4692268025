//! Output module for reporting on the index
//!
//! This module handles loading and printing index statistics.

pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, IndexStatistics};
