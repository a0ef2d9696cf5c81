//! Load-once dataset cache.
//!
//! The report re-renders from scratch on every request, but the transaction
//! table is read from disk only the first time a path is asked for. The cache
//! is an ordinary value owned by whoever drives the rendering, so tests can
//! inspect and reset it.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::table::Table;

/// Mapping from dataset path to its parsed table.
#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: FxHashMap<PathBuf, Arc<Table>>,
    reads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table stored at `path`, reading the file on first use.
    ///
    /// Paths are compared as given; `./data.csv` and `data.csv` are distinct
    /// keys.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Table>> {
        let path = path.as_ref();

        if let Some(table) = self.tables.get(path) {
            tracing::debug!("Dataset cache hit: {}", path.display());
            return Ok(Arc::clone(table));
        }

        tracing::debug!("Dataset cache miss: {}", path.display());
        let table = Arc::new(read_table(path)?);
        self.reads += 1;

        tracing::info!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            table.len(),
            table.columns().len()
        );

        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached table for one path. Returns whether it was cached.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.tables.remove(path.as_ref()).is_some()
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Whether `path` is currently cached.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.tables.contains_key(path.as_ref())
    }

    /// Number of file reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound(path.to_path_buf())
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    Table::from_csv_reader(BufReader::new(file)).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("main_data.csv");
        fs::write(
            &path,
            "order_status,product category\ndelivered,toys\ncanceled,toys\n",
        )
        .expect("Failed to write dataset");
        path
    }

    #[test]
    fn test_second_load_is_cached() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = write_dataset(&temp);

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.reads(), 1);
    }

    #[test]
    fn test_cached_table_survives_file_removal() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = write_dataset(&temp);

        let mut cache = DatasetCache::new();
        cache.load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(cache.load(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reread() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = write_dataset(&temp);

        let mut cache = DatasetCache::new();
        cache.load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.contains(&path));

        fs::write(&path, "order_status,product category\nshipped,toys\n").unwrap();
        assert_eq!(cache.load(&path).unwrap().len(), 1);
        assert_eq!(cache.reads(), 2);

        cache.clear();
        assert!(!cache.contains(&path));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut cache = DatasetCache::new();

        let err = cache.load(temp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(cache.reads(), 0);
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("bad.csv");
        fs::write(&path, "a,b\n1,2,3\n").unwrap();

        let err = DatasetCache::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
    }
}
