//! Order status filtering.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::Table;

/// Column holding each row's order status.
pub const ORDER_STATUS_COLUMN: &str = "order_status";

/// Set of order statuses a row may have to pass the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StatusSet(FxHashSet<String>);

impl StatusSet {
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(statuses.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, status: &str) -> bool {
        self.0.contains(status)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for StatusSet {
    fn from(statuses: Vec<String>) -> Self {
        Self::new(statuses)
    }
}

impl From<StatusSet> for Vec<String> {
    fn from(set: StatusSet) -> Self {
        let mut statuses: Vec<String> = set.0.into_iter().collect();
        statuses.sort();
        statuses
    }
}

/// Keep the rows whose `order_status` is in `statuses`.
///
/// Row order and all columns are preserved. Matching no rows is not an error.
pub fn filter_by_status(table: &Table, statuses: &StatusSet) -> Result<Table> {
    let idx = table.column_index(ORDER_STATUS_COLUMN)?;

    if statuses.is_empty() {
        tracing::warn!("Filtering with an empty status set, every row will be dropped");
    }

    let filtered = table.filter_rows(|row| {
        row[idx]
            .as_str()
            .is_some_and(|status| statuses.contains(status))
    });

    tracing::debug!(
        "Status filter kept {} of {} rows",
        filtered.len(),
        table.len()
    );

    Ok(filtered)
}
