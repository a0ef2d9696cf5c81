//! Report output model.
//!
//! A [`Report`] is the ordered list of display primitives a page render
//! emits: sidebar entries, headings, charts and markdown paragraphs. Blocks
//! are appended as the page is produced, so a render that fails halfway still
//! holds everything emitted before the failure.

use serde::{Deserialize, Serialize};

use crate::chart::Chart;

/// One display primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    SidebarTitle { text: String },
    /// Navigation entry pointing at a header anchor.
    SidebarLink { label: String, anchor: String },
    Title { text: String },
    Header { text: String, anchor: String },
    Subheader { text: String },
    Chart(Chart),
    Markdown { text: String },
    /// Failure shown in place of the rest of the page.
    Error { message: String },
}

/// Ordered blocks of one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    blocks: Vec<Block>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn sidebar_title(&mut self, text: impl Into<String>) {
        self.push(Block::SidebarTitle { text: text.into() });
    }

    /// Sidebar link to the header titled `label`.
    pub fn sidebar_link(&mut self, label: impl Into<String>) {
        let label = label.into();
        let anchor = anchor_for(&label);
        self.push(Block::SidebarLink { label, anchor });
    }

    pub fn title(&mut self, text: impl Into<String>) {
        self.push(Block::Title { text: text.into() });
    }

    pub fn header(&mut self, text: impl Into<String>) {
        let text = text.into();
        let anchor = anchor_for(&text);
        self.push(Block::Header { text, anchor });
    }

    pub fn subheader(&mut self, text: impl Into<String>) {
        self.push(Block::Subheader { text: text.into() });
    }

    pub fn chart(&mut self, chart: Chart) {
        self.push(Block::Chart(chart));
    }

    pub fn markdown(&mut self, text: impl Into<String>) {
        self.push(Block::Markdown { text: text.into() });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Block::Error {
            message: message.into(),
        });
    }

    /// Charts in emission order.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Chart(chart) => Some(chart),
            _ => None,
        })
    }
}

/// URL fragment for a header: lowercase words joined by `-`, punctuation
/// dropped.
///
/// `"Top Product Categories by Sales"` becomes
/// `"top-product-categories-by-sales"`.
pub fn anchor_for(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_for() {
        assert_eq!(anchor_for("Top Product Categories by Sales"), "top-product-categories-by-sales");
        assert_eq!(
            anchor_for("Product Categories With the Least Sales"),
            "product-categories-with-the-least-sales"
        );
        assert_eq!(anchor_for("Conclusion"), "conclusion");
        assert_eq!(anchor_for("  Sales (2017-2018) & more! "), "sales-2017-2018-more");
    }

    #[test]
    fn test_link_and_header_share_anchor() {
        let mut report = Report::new();
        report.sidebar_link("Conclusion");
        report.header("Conclusion");

        match report.blocks() {
            [Block::SidebarLink { anchor: link, .. }, Block::Header { anchor: header, .. }] => {
                assert_eq!(link, header);
            }
            other => panic!("unexpected blocks: {other:?}"),
        }
    }

    #[test]
    fn test_block_json_shape() {
        let mut report = Report::new();
        report.title("Sales");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"blocks": [{"type": "title", "text": "Sales"}]}));
    }
}
