//! Render command implementation.
//!
//! Runs the page sequence once and writes the report as HTML, text or JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use salesdash_core::{Render, html_document};

use crate::colors;
use crate::{OutputFormat, build_controller};

/// Render the report.
pub fn execute(
    data: &Path,
    content: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut controller = build_controller(data, content)?;
    let report = controller.render_page()?;

    let rendered = match format {
        OutputFormat::Html => html_document(&report),
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    let output_file = match (output, format) {
        (Some(path), _) => path.to_path_buf(),
        (None, OutputFormat::Html) => PathBuf::from("report.html"),
        (None, OutputFormat::Text | OutputFormat::Json) => {
            println!("{}", rendered);
            return Ok(());
        }
    };

    fs::write(&output_file, rendered)?;

    println!(
        "{}Rendered{} {} sections from {} to {}{}{} in {:.2}s",
        colors::GREEN,
        colors::RESET,
        report.charts().count(),
        data.display(),
        colors::CYAN,
        output_file.display(),
        colors::RESET,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
