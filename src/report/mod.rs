//! Report rendering for analysis results.

pub mod generator;

pub use generator::*;
