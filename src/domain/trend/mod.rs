//! Trend domain - price history renderings

pub mod sparkline;
pub mod line_graph;

pub use sparkline::{sparkline, SPARKLINE_WINDOW};
pub use line_graph::LineGraph;
