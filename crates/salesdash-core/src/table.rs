//! Row-oriented in-memory table.
//!
//! Every stage of the report pipeline takes a [`Table`] and produces a new
//! one; tables are never mutated after construction.

use std::fmt;
use std::io::Read;

use crate::error::{Error, Result};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Integer value (aggregate counts).
    Integer(i64),
    /// Free text (everything read from a CSV file).
    Text(String),
}

impl Value {
    /// Borrow the text payload, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Integer(_) => None,
        }
    }

    /// Numeric view of the cell. Text cells are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

/// Named columns plus rows of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table of text cells.
    ///
    /// Rows shorter than the header are padded with empty text, longer rows
    /// are truncated.
    pub fn from_records<I, R, S>(columns: &[&str], records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns.iter().copied());
        for record in records {
            let mut row: Vec<Value> = record
                .into_iter()
                .take(columns.len())
                .map(|s| Value::Text(s.into()))
                .collect();
            row.resize(columns.len(), Value::Text(String::new()));
            table.rows.push(row);
        }
        table
    }

    /// Parse a delimited document with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Value::from).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width must match header");
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or [`Error::MissingColumn`].
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Iterate the cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// New table holding the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// First `n` rows (the whole table if it is shorter).
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Last `n` rows (the whole table if it is shorter).
    pub fn tail(&self, n: usize) -> Self {
        let start = self.rows.len().saturating_sub(n);
        Self {
            columns: self.columns.clone(),
            rows: self.rows[start..].to_vec(),
        }
    }
}
