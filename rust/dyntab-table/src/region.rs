//! Row-reference columns into another table.

use std::sync::Arc;

use dyntab_common::{Result, error::Error};

use crate::record::Record;
use crate::table::DynamicTable;

/// A column whose values are row indices into a specific target table.
///
/// The target table is held through shared ownership: many tables may
/// reference one lookup table. Stored row indices are resolved against the
/// target lazily at read time, never eagerly at construction, so a
/// reference column may be built before its target table is fully
/// populated. An index that falls outside the target fails the read with a
/// dangling-reference error.
///
/// When the owning table links a `VectorIndex` to a region column, each
/// logical row is an ordered list of target-row indices rather than a
/// single one.
#[derive(Debug, Clone)]
pub struct TableRegion {
    name: String,
    description: String,
    rows: Vec<u64>,
    table: Arc<DynamicTable>,
}

impl TableRegion {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        rows: Vec<u64>,
        table: Arc<DynamicTable>,
    ) -> TableRegion {
        TableRegion {
            name: name.into(),
            description: description.into(),
            rows,
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The stored target-row indices (flattened count when the region is
    /// addressed through an index).
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// The referenced table.
    pub fn table(&self) -> &Arc<DynamicTable> {
        &self.table
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves the stored index at flat position `pos` into the referenced
    /// row of the target table.
    ///
    /// # Errors
    ///
    /// Fails with a dangling-reference error if the stored index is not a
    /// valid row of the target table.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds of the stored indices; the owning
    /// table bounds-checks before calling.
    pub fn resolve(&self, pos: usize) -> Result<Record> {
        let row = self.rows[pos] as usize;
        if row >= self.table.len() {
            return Err(Error::dangling_reference(
                self.table.name(),
                row,
                self.table.len(),
            ));
        }
        self.table.row(row)
    }

    /// Returns a copy of this region with the stored indices replaced; the
    /// target table stays shared.
    pub fn with_rows(&self, rows: Vec<u64>) -> TableRegion {
        TableRegion {
            name: self.name.clone(),
            description: self.description.clone(),
            rows,
            table: Arc::clone(&self.table),
        }
    }
}
