//! CLI command implementations.

pub mod export;

pub use export::export_graph;
