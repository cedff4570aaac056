//! CLI command implementations.

pub mod parse;
pub mod stats;
