//! Output rendering for report values.
//!
//! The [`Render`] trait gives charts and whole reports text, HTML and
//! JSON representations. [`html_document`] wraps a [`Report`] into a
//! standalone page with the sidebar on the left and inline SVG charts.

use crate::chart::Chart;
use crate::report::{Block, Report};

/// Types that can render themselves for the report output.
///
/// By default, types use their [`Debug`] representation for text output.
/// Override specific methods to provide richer representations.
pub trait Render {
    /// Plain text representation (for terminals).
    fn render_text(&self) -> String
    where
        Self: std::fmt::Debug,
    {
        format!("{:?}", self)
    }

    /// HTML fragment. Return `None` to fall back to text rendering.
    fn render_html(&self) -> Option<String> {
        None
    }

    /// Structured data for programmatic access.
    fn render_data(&self) -> Option<serde_json::Value> {
        None
    }
}

impl Render for Chart {
    fn render_text(&self) -> String {
        let mut out = self.title.clone();
        if self.labels.is_empty() {
            out.push_str("\n  (no data)");
        }
        let width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        for (label, value) in self.labels.iter().zip(&self.values) {
            out.push_str(&format!("\n  {label:<width$}  {value}"));
        }
        out
    }

    fn render_html(&self) -> Option<String> {
        Some(format!("<figure class=\"chart\">\n{}\n</figure>", self.svg))
    }

    fn render_data(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

impl Render for Report {
    fn render_text(&self) -> String {
        let mut out = Vec::new();
        for block in self.blocks() {
            match block {
                Block::SidebarTitle { .. } | Block::SidebarLink { .. } => {}
                Block::Title { text } => out.push(format!("{text}\n{}", "=".repeat(text.chars().count()))),
                Block::Header { text, .. } => out.push(format!("{text}\n{}", "-".repeat(text.chars().count()))),
                Block::Subheader { text } => out.push(format!("### {text}")),
                Block::Chart(chart) => out.push(chart.render_text()),
                Block::Markdown { text } => out.push(text.clone()),
                Block::Error { message } => out.push(format!("ERROR: {message}")),
            }
        }
        out.join("\n\n")
    }

    fn render_html(&self) -> Option<String> {
        let mut html = String::new();
        for block in self.blocks() {
            match block {
                Block::SidebarTitle { .. } | Block::SidebarLink { .. } => {}
                Block::Title { text } => html.push_str(&format!("<h1>{}</h1>\n", html_escape(text))),
                Block::Header { text, anchor } => html.push_str(&format!(
                    "<h2 id=\"{}\">{}</h2>\n",
                    html_escape(anchor),
                    html_escape(text)
                )),
                Block::Subheader { text } => html.push_str(&format!("<h3>{}</h3>\n", html_escape(text))),
                Block::Chart(chart) => {
                    if let Some(fragment) = chart.render_html() {
                        html.push_str(&fragment);
                        html.push('\n');
                    }
                }
                Block::Markdown { text } => html.push_str(&markdown_to_html(text)),
                Block::Error { message } => html.push_str(&format!(
                    "<div class=\"error\"><pre>{}</pre></div>\n",
                    html_escape(message)
                )),
            }
        }
        Some(html)
    }

    fn render_data(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// Standalone HTML page for a report.
pub fn html_document(report: &Report) -> String {
    let page_title = report
        .blocks()
        .iter()
        .find_map(|block| match block {
            Block::Title { text } => Some(text.as_str()),
            _ => None,
        })
        .unwrap_or("Report");

    let mut sidebar = String::new();
    for block in report.blocks() {
        match block {
            Block::SidebarTitle { text } => sidebar.push_str(&format!("<h2>{}</h2>\n", html_escape(text))),
            Block::SidebarLink { label, anchor } => sidebar.push_str(&format!(
                "<p><a href=\"#{}\">{}</a></p>\n",
                html_escape(anchor),
                html_escape(label)
            )),
            _ => {}
        }
    }

    let main = report.render_html().unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ margin: 0; font-family: system-ui, sans-serif; color: #262730; display: flex; }}
nav.sidebar {{ position: sticky; top: 0; align-self: flex-start; width: 18rem; min-height: 100vh; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }}
nav.sidebar a {{ color: #262730; }}
main {{ flex: 1; max-width: 60rem; padding: 2rem 3rem; }}
figure.chart {{ margin: 1rem 0; }}
figure.chart svg {{ max-width: 100%; height: auto; }}
div.error {{ background: #ffe4e4; border-left: 4px solid #ff4b4b; padding: 0 1rem; }}
</style>
</head>
<body>
<nav class="sidebar">
{sidebar}</nav>
<main>
{main}</main>
</body>
</html>
"#,
        title = html_escape(page_title),
        sidebar = sidebar,
        main = main,
    )
}

/// Escape text for use in HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Convert the markdown subset used by report commentary into HTML.
///
/// Blank lines separate paragraphs, `**text**` is bold, single newlines
/// become line breaks. Everything else is escaped.
pub fn markdown_to_html(text: &str) -> String {
    let mut html = String::new();
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let escaped = html_escape(paragraph);
        let parts: Vec<&str> = escaped.split("**").collect();

        html.push_str("<p>");
        for (i, part) in parts.iter().enumerate() {
            let part = part.replace('\n', "<br>\n");
            if i % 2 == 0 {
                html.push_str(&part);
            } else if i + 1 == parts.len() {
                // unmatched opening marker
                html.push_str("**");
                html.push_str(&part);
            } else {
                html.push_str("<strong>");
                html.push_str(&part);
                html.push_str("</strong>");
            }
        }
        html.push_str("</p>\n");
    }
    html
}
