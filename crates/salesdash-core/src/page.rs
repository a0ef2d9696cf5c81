//! Page controller: the fixed sequence that turns the dataset into a report.

use std::path::PathBuf;

use crate::aggregate::{AggregateSpec, CATEGORY_COLUMN, TieBreak, count_by};
use crate::chart::render_bar_chart;
use crate::content::{ReportContent, SectionContent};
use crate::error::Result;
use crate::filter::{StatusSet, filter_by_status};
use crate::loader::DatasetCache;
use crate::report::Report;
use crate::table::Table;

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "./main_data.csv";

/// Rows shown in each top/bottom chart.
pub const DEFAULT_SLICE_LEN: usize = 5;

/// Fixed parameters of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    /// Statuses counted as a sale.
    pub sales_statuses: StatusSet,
    /// Statuses counted as a cancellation.
    pub canceled_statuses: StatusSet,
    /// Bars per chart.
    pub slice_len: usize,
    pub tie_break: TieBreak,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sales_statuses: StatusSet::new(["delivered", "shipped"]),
            canceled_statuses: StatusSet::new(["canceled"]),
            slice_len: DEFAULT_SLICE_LEN,
            tie_break: TieBreak::default(),
        }
    }
}

impl ReportConfig {
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }
}

/// Owns the dataset cache and renders the page on demand.
///
/// Every call to [`render`](Self::render) recomputes filters, aggregates and
/// charts; only the dataset read is reused between calls.
#[derive(Debug)]
pub struct PageController {
    config: ReportConfig,
    content: ReportContent,
    cache: DatasetCache,
}

impl PageController {
    pub fn new(config: ReportConfig, content: ReportContent) -> Self {
        Self {
            config,
            content,
            cache: DatasetCache::new(),
        }
    }

    /// Controller with the default configuration and built-in content.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(ReportConfig::default(), ReportContent::builtin()?))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn content(&self) -> &ReportContent {
        &self.content
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DatasetCache {
        &mut self.cache
    }

    /// Append the page to `report`.
    ///
    /// Stops at the first error. Blocks emitted before the failure stay in
    /// `report`.
    pub fn render(&mut self, report: &mut Report) -> Result<()> {
        let Self {
            config,
            content,
            cache,
        } = self;
        let sections = &content.sections;

        report.sidebar_title(&content.sidebar_title);
        for section in [&sections.top_sales, &sections.least_sales, &sections.top_canceled] {
            report.sidebar_link(&section.header);
        }
        report.sidebar_link(&content.conclusion.header);

        report.title(&content.title);

        let transactions = cache.load(&config.data_path)?;

        let sales_spec = AggregateSpec::sales().with_tie_break(config.tie_break);
        let sales = count_by(&filter_by_status(&transactions, &config.sales_statuses)?, &sales_spec)?;

        chart_section(report, &sections.top_sales, &sales.head(config.slice_len), &sales_spec)?;
        chart_section(report, &sections.least_sales, &sales.tail(config.slice_len), &sales_spec)?;

        let canceled_spec = AggregateSpec::canceled().with_tie_break(config.tie_break);
        let canceled = count_by(
            &filter_by_status(&transactions, &config.canceled_statuses)?,
            &canceled_spec,
        )?;

        chart_section(report, &sections.top_canceled, &canceled.head(config.slice_len), &canceled_spec)?;

        report.header(&content.conclusion.header);
        for subsection in &content.conclusion.subsections {
            report.subheader(&subsection.heading);
            report.markdown(&subsection.body);
        }

        tracing::info!(
            "Rendered report from {} ({} sales categories, {} canceled categories)",
            config.data_path.display(),
            sales.len(),
            canceled.len()
        );

        Ok(())
    }

    /// Render into a fresh report, discarding partial output on error.
    pub fn render_page(&mut self) -> Result<Report> {
        let mut report = Report::new();
        self.render(&mut report)?;
        Ok(report)
    }
}

fn chart_section(
    report: &mut Report,
    section: &SectionContent,
    counts: &Table,
    spec: &AggregateSpec,
) -> Result<()> {
    report.header(&section.header);
    let chart = render_bar_chart(counts, CATEGORY_COLUMN, &spec.count_column, &section.chart)?;
    report.chart(chart);
    report.markdown(&section.commentary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::report::Block;
    use std::fs;
    use tempfile::TempDir;

    fn controller_for(dir: &TempDir, csv: &str) -> PageController {
        let path = dir.path().join("main_data.csv");
        fs::write(&path, csv).expect("Failed to write dataset");
        PageController::new(
            ReportConfig::default().with_data_path(path),
            ReportContent::builtin().unwrap(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.data_path, PathBuf::from("./main_data.csv"));
        assert!(config.sales_statuses.contains("delivered"));
        assert!(config.sales_statuses.contains("shipped"));
        assert_eq!(config.canceled_statuses, StatusSet::new(["canceled"]));
        assert_eq!(config.slice_len, 5);
    }

    #[test]
    fn test_block_sequence() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut controller = controller_for(
            &temp,
            "order_status,product category\ndelivered,A\nshipped,A\ncanceled,B\ncanceled,B\ndelivered,C\n",
        );

        let report = controller.render_page().unwrap();
        let kinds: Vec<&str> = report
            .blocks()
            .iter()
            .map(|block| match block {
                Block::SidebarTitle { .. } => "sidebar_title",
                Block::SidebarLink { .. } => "link",
                Block::Title { .. } => "title",
                Block::Header { .. } => "header",
                Block::Subheader { .. } => "subheader",
                Block::Chart(_) => "chart",
                Block::Markdown { .. } => "markdown",
                Block::Error { .. } => "error",
            })
            .collect();

        assert_eq!(
            kinds,
            [
                "sidebar_title", "link", "link", "link", "link", "title",
                "header", "chart", "markdown",
                "header", "chart", "markdown",
                "header", "chart", "markdown",
                "header", "subheader", "markdown", "subheader", "markdown",
            ]
        );

        let charts: Vec<_> = report.charts().collect();
        assert_eq!(charts[0].labels, ["A", "C"]);
        assert_eq!(charts[1].labels, ["A", "C"]);
        assert_eq!(charts[2].labels, ["B"]);
        assert_eq!(charts[2].values, [2.0]);
    }

    #[test]
    fn test_rerender_reuses_cached_dataset() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut controller = controller_for(&temp, "order_status,product category\ndelivered,A\n");

        let first = controller.render_page().unwrap();
        let second = controller.render_page().unwrap();

        assert_eq!(first, second);
        assert_eq!(controller.cache().reads(), 1);
    }

    #[test]
    fn test_no_cancellations_renders_empty_chart() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut controller = controller_for(&temp, "order_status,product category\ndelivered,A\n");

        let report = controller.render_page().unwrap();
        let charts: Vec<_> = report.charts().collect();
        assert_eq!(charts.len(), 3);
        assert!(charts[2].labels.is_empty());
    }

    #[test]
    fn test_missing_dataset_keeps_preamble() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut controller = PageController::new(
            ReportConfig::default().with_data_path(temp.path().join("absent.csv")),
            ReportContent::builtin().unwrap(),
        );

        let mut report = Report::new();
        let err = controller.render(&mut report).unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(report.len(), 6);
        assert!(matches!(report.blocks().last(), Some(Block::Title { .. })));
    }

    #[test]
    fn test_missing_category_column() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut controller = controller_for(&temp, "order_status,category\ndelivered,A\n");

        let err = controller.render_page().unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == CATEGORY_COLUMN));
    }
}
