//! Static report narrative.
//!
//! Headers, chart titles and commentary live in a JSON resource keyed by
//! section, so the wording can change without touching the page sequence.
//! A default copy is compiled into the crate from `content/report.json`.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::BarChartStyle;
use crate::error::{Error, Result};

const BUILTIN_CONTENT: &str = include_str!("../content/report.json");

/// Wording of one chart section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    /// Section header, also the sidebar link label.
    pub header: String,
    pub chart: BarChartStyle,
    /// Markdown paragraph shown below the chart.
    pub commentary: String,
}

/// The three chart sections, keyed by what they show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    pub top_sales: SectionContent,
    pub least_sales: SectionContent,
    pub top_canceled: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub heading: String,
    /// Markdown body.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionContent {
    pub header: String,
    pub subsections: Vec<Subsection>,
}

/// All static text of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    pub sidebar_title: String,
    pub title: String,
    pub sections: Sections,
    pub conclusion: ConclusionContent,
}

impl ReportContent {
    /// The content shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Parse content from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Content(e.to_string()))
    }

    /// Read content from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::Content(format!("{} does not exist", path.display())),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Self::from_json(&json).map_err(|e| match e {
            Error::Content(msg) => Error::Content(format!("{}: {msg}", path.display())),
            other => other,
        })
    }
}
