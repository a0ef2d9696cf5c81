//! Core engine for the SalesDash product sales report.
//!
//! This crate provides:
//! - Load-once dataset cache for the transaction CSV
//! - Order status filtering and per-category counting
//! - SVG bar charts
//! - The page controller that assembles the report
//! - Text, HTML and JSON rendering of the result
//!
//! ```text
//! main_data.csv ──► DatasetCache ──► filter_by_status ──► count_by ──► render_bar_chart ──► Report
//!                     (once)            (x2)                (x2)            (x3)
//! ```

pub mod aggregate;
pub mod chart;
pub mod content;
pub mod error;
pub mod filter;
pub mod loader;
pub mod page;
pub mod render;
pub mod report;
pub mod table;

pub use aggregate::{AggregateSpec, TieBreak, count_by};
pub use chart::{BarChartStyle, BarColor, Chart, render_bar_chart};
pub use content::ReportContent;
pub use error::{Error, Result};
pub use filter::{StatusSet, filter_by_status};
pub use loader::DatasetCache;
pub use page::{PageController, ReportConfig};
pub use render::{Render, html_document};
pub use report::{Block, Report};
pub use table::{Table, Value};
