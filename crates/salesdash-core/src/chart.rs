//! Vertical bar charts rendered to SVG.

use std::fmt;
use std::str::FromStr;

use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::html_escape;
use crate::table::Table;

/// Canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1000;
/// Canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

const X_LABEL_AREA: u32 = 170;
const Y_LABEL_AREA: u32 = 70;
const TICK_FONT_SIZE: u32 = 13;
/// Horizontal padding on each side of a bar, in pixels.
const BAR_GAP: u32 = 8;

/// Bar fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BarColor {
    pub const SKY_BLUE: BarColor = BarColor::rgb(0x87, 0xce, 0xeb);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_plotters(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }
}

impl Default for BarColor {
    fn default() -> Self {
        Self::SKY_BLUE
    }
}

impl FromStr for BarColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let named = match name.as_str() {
            "skyblue" => Some(Self::SKY_BLUE),
            "lightblue" => Some(Self::rgb(0xad, 0xd8, 0xe6)),
            "steelblue" => Some(Self::rgb(0x46, 0x82, 0xb4)),
            "red" => Some(Self::rgb(0xff, 0x00, 0x00)),
            "pink" => Some(Self::rgb(0xff, 0xc0, 0xcb)),
            "orange" => Some(Self::rgb(0xff, 0xa5, 0x00)),
            "green" => Some(Self::rgb(0x00, 0x80, 0x00)),
            "gray" | "grey" => Some(Self::rgb(0x80, 0x80, 0x80)),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let hex = name
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()));

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for BarColor {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BarColor> for String {
    fn from(color: BarColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Title, axis labels, color and canvas size of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default)]
    pub color: BarColor,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl BarChartStyle {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            color: BarColor::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_color(mut self, color: BarColor) -> Self {
        self.color = color;
        self
    }
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    /// Bar labels in drawing order.
    pub labels: Vec<String>,
    /// Bar heights in drawing order.
    pub values: Vec<f64>,
    /// Standalone SVG document.
    pub svg: String,
}

/// Draw one bar per row of `table`, using `x_col` as the category label and
/// `y_col` as the bar height.
///
/// Category labels are rotated 45 degrees, horizontal gridlines are drawn for
/// the y axis. A table without rows yields a chart with axes and no bars.
pub fn render_bar_chart(table: &Table, x_col: &str, y_col: &str, style: &BarChartStyle) -> Result<Chart> {
    let x_idx = table.column_index(x_col)?;
    let y_idx = table.column_index(y_col)?;

    let mut labels = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows().iter().enumerate() {
        let value = row[y_idx].as_f64().ok_or_else(|| Error::NotNumeric {
            column: y_col.to_string(),
            row: row_no,
            value: row[y_idx].to_string(),
        })?;
        labels.push(row[x_idx].to_string());
        values.push(value);
    }

    let svg = draw_svg(&labels, &values, style)?;
    tracing::debug!("Rendered chart '{}' with {} bars", style.title, labels.len());

    Ok(Chart {
        title: style.title.clone(),
        labels,
        values,
        svg,
    })
}

fn chart_err<E: fmt::Display>(err: E) -> Error {
    Error::Chart(err.to_string())
}

fn draw_svg(labels: &[String], values: &[f64], style: &BarChartStyle) -> Result<String> {
    // Bar `i` spans [i, i + 1) on the x axis, so n bars fill 0..n exactly.
    let x_max = labels.len().max(1) as f64;
    let y_min = values.iter().copied().fold(0.0_f64, f64::min);
    let y_peak = values.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if y_peak > 0.0 { y_peak * 1.1 } else { 1.0 };

    let mut svg = String::new();
    let mut anchors = Vec::with_capacity(labels.len());
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(style.title.as_str(), ("sans-serif", 22).into_font())
            .margin(20)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.05))
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(chart_err)?;

        let fill = style.color.to_plotters();
        chart
            .draw_series(values.iter().enumerate().map(|(i, &value)| {
                let left = i as f64;
                let mut bar = Rectangle::new([(left, 0.0), (left + 1.0, value)], fill.filled());
                bar.set_margin(0, 0, BAR_GAP, BAR_GAP);
                bar
            }))
            .map_err(chart_err)?;

        for i in 0..labels.len() {
            anchors.push(chart.backend_coord(&(i as f64 + 0.5, y_min)));
        }

        root.present().map_err(chart_err)?;
    }

    // The SVG backend only rotates text in quarter turns, so the 45 degree
    // category labels are appended as plain SVG text.
    let mut overlay = String::new();
    for (label, (x, y)) in labels.iter().zip(anchors) {
        let y = y + TICK_FONT_SIZE as i32 + 4;
        overlay.push_str(&format!(
            "<text x=\"{x}\" y=\"{y}\" transform=\"rotate(-45 {x} {y})\" text-anchor=\"end\" \
             font-family=\"sans-serif\" font-size=\"{TICK_FONT_SIZE}\" fill=\"black\">{}</text>\n",
            html_escape(label)
        ));
    }

    let close = svg
        .rfind("</svg>")
        .ok_or_else(|| Error::Chart("SVG backend produced an unterminated document".to_string()))?;
    svg.insert_str(close, &overlay);

    Ok(svg)
}
