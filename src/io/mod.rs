//! Instance files and result reports.
//!
//! - [`parse_graph`] / [`read_graph`] / [`write_graph`] — the `.graph` text format
//! - [`write_tour_table`] — single-solve tour report
//! - [`write_runtimes`] / [`write_paths`] — batch reports

mod graph;
mod report;

pub use graph::{parse_graph, read_graph, write_graph, GraphError};
pub use report::{write_paths, write_runtimes, write_tour_table, ReportRow};
