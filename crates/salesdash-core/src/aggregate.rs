//! Per-category counting.
//!
//! Both report aggregates (sales and cancellations) are the same operation,
//! a group-by-count over `product category`, and differ only in the name of
//! the count column.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{Table, Value};

/// Column holding each row's product category.
pub const CATEGORY_COLUMN: &str = "product category";

/// Count column of the sales aggregate.
pub const SALES_COUNT_COLUMN: &str = "total_sales";

/// Count column of the cancellations aggregate.
pub const CANCELED_COUNT_COLUMN: &str = "total";

/// Ordering among groups with equal counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Category label ascending.
    #[default]
    Alphabetical,
    /// Order in which the category first appears in the input.
    FirstSeen,
}

/// Parameters of a group-by-count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    /// Column to group on.
    pub group_column: String,
    /// Name of the emitted count column.
    pub count_column: String,
    pub tie_break: TieBreak,
}

impl AggregateSpec {
    pub fn new(group_column: impl Into<String>, count_column: impl Into<String>) -> Self {
        Self {
            group_column: group_column.into(),
            count_column: count_column.into(),
            tie_break: TieBreak::default(),
        }
    }

    /// Category counts named `total_sales`.
    pub fn sales() -> Self {
        Self::new(CATEGORY_COLUMN, SALES_COUNT_COLUMN)
    }

    /// Category counts named `total`.
    pub fn canceled() -> Self {
        Self::new(CATEGORY_COLUMN, CANCELED_COUNT_COLUMN)
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// Count rows per distinct group value, largest count first.
///
/// The result has two columns, the group column and the count column. Group
/// values are compared by exact string equality.
pub fn count_by(table: &Table, spec: &AggregateSpec) -> Result<Table> {
    let idx = table.column_index(&spec.group_column)?;

    // (label, count) in first-seen order
    let mut groups: Vec<(&Value, i64)> = Vec::new();
    let mut positions: FxHashMap<&Value, usize> = FxHashMap::default();

    for row in table.rows() {
        let key = &row[idx];
        match positions.get(key) {
            Some(&pos) => groups[pos].1 += 1,
            None => {
                positions.insert(key, groups.len());
                groups.push((key, 1));
            }
        }
    }

    // Stable sort: FirstSeen ties keep insertion order.
    groups.sort_by(|(a_key, a_count), (b_key, b_count)| {
        b_count.cmp(a_count).then_with(|| match spec.tie_break {
            TieBreak::Alphabetical => a_key.to_string().cmp(&b_key.to_string()),
            TieBreak::FirstSeen => Ordering::Equal,
        })
    });

    let mut out = Table::new([spec.group_column.as_str(), spec.count_column.as_str()]);
    for (key, count) in groups {
        out.push_row(vec![key.clone(), Value::Integer(count)]);
    }

    tracing::debug!(
        "Aggregated {} rows into {} '{}' groups",
        table.len(),
        out.len(),
        spec.group_column
    );

    Ok(out)
}
