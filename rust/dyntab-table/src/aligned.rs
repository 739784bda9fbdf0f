//! Aligned multi-category table groups.

use std::ops::Range;

use dyntab_common::{Result, error::Error, verify_arg};
use dyntab_sequence::values::Value;

use crate::record::{Cell, Record};
use crate::table::DynamicTable;

/// A named collection of category tables sharing one row identity, queried
/// as a single composite, wider table.
///
/// Every category has the group's row count and identical row-id values in
/// order; the invariant is enforced once, at construction, and categories
/// are never mutated through the group afterwards.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    name: String,
    description: String,
    row_ids: Vec<i64>,
    categories: Vec<DynamicTable>,
}

impl AlignedTable {
    /// Starts building an aligned group. Equivalent to
    /// [`AlignedTableBuilder::new`].
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> AlignedTableBuilder {
        AlignedTableBuilder::new(name, description)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The shared row identifiers.
    pub fn ids(&self) -> &[i64] {
        &self.row_ids
    }

    /// Category names in insertion order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name())
    }

    /// Number of logical rows, shared by every category.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Returns a category table unmodified, bypassing alignment.
    pub fn category(&self, name: &str) -> Result<&DynamicTable> {
        self.categories
            .iter()
            .find(|category| category.name() == name)
            .ok_or_else(|| Error::unknown_column(&self.name, name))
    }

    /// Reads one merged logical row: the group's `id` first, then the
    /// same-indexed row of every category, each column namespaced as
    /// `<category>.<column>`.
    pub fn row(&self, row: usize) -> Result<Record> {
        if row >= self.len() {
            return Err(Error::out_of_range("row", row, self.len()));
        }
        let mut record = Record::new();
        record.push("id", Cell::Scalar(Value::Int(self.row_ids[row])));
        for category in &self.categories {
            for column in category.column_names() {
                record.push(
                    format!("{}.{column}", category.name()),
                    category.cell(row, column)?,
                );
            }
        }
        Ok(record)
    }

    /// Builds a row-restricted group: every category selected down to the
    /// same logical rows, shared ids subset preserved. A row position may
    /// be selected at most once.
    pub fn select(&self, rows: &[usize]) -> Result<AlignedTable> {
        for &row in rows {
            if row >= self.len() {
                return Err(Error::out_of_range("row", row, self.len()));
            }
        }
        let mut unique = std::collections::HashSet::new();
        verify_arg!(rows, rows.iter().all(|row| unique.insert(*row)));
        let categories = self
            .categories
            .iter()
            .map(|category| category.select(rows))
            .collect::<Result<Vec<_>>>()?;
        Ok(AlignedTable {
            name: self.name.clone(),
            description: self.description.clone(),
            row_ids: rows.iter().map(|&row| self.row_ids[row]).collect(),
            categories,
        })
    }

    /// Builds a row-restricted group over a contiguous range.
    pub fn slice(&self, range: Range<usize>) -> Result<AlignedTable> {
        if range.end > self.len() {
            return Err(Error::out_of_range("row", range.end, self.len()));
        }
        self.select(&range.collect::<Vec<_>>())
    }

    /// Returns a row-restricted slice of a single category.
    pub fn category_rows(&self, rows: &[usize], name: &str) -> Result<DynamicTable> {
        self.category(name)?.select(rows)
    }
}

/// Builder for [`AlignedTable`].
///
/// Categories are added in display order; [`build`][AlignedTableBuilder::build]
/// checks the alignment invariant and either yields the group or fails
/// naming the offending category.
pub struct AlignedTableBuilder {
    name: String,
    description: String,
    row_ids: Option<Vec<i64>>,
    categories: Vec<DynamicTable>,
}

impl AlignedTableBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AlignedTableBuilder {
        AlignedTableBuilder {
            name: name.into(),
            description: description.into(),
            row_ids: None,
            categories: Vec::new(),
        }
    }

    /// Supplies explicit shared row identifiers. When absent, the group
    /// adopts the first category's ids.
    pub fn with_row_ids(mut self, row_ids: Vec<i64>) -> AlignedTableBuilder {
        self.row_ids = Some(row_ids);
        self
    }

    pub fn with_category(mut self, category: DynamicTable) -> AlignedTableBuilder {
        self.categories.push(category);
        self
    }

    pub fn build(self) -> Result<AlignedTable> {
        let name = self.name;
        let row_ids = match self.row_ids {
            Some(row_ids) => row_ids,
            None => self
                .categories
                .first()
                .map(|category| category.ids().to_vec())
                .unwrap_or_default(),
        };
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.name().to_string()) {
                return Err(Error::invalid_arg(
                    category.name(),
                    "category name already in use",
                ));
            }
            if category.len() != row_ids.len() {
                return Err(Error::equal_length(
                    &name,
                    category.name(),
                    row_ids.len(),
                    category.len(),
                ));
            }
            if category.ids() != row_ids.as_slice() {
                return Err(Error::invalid_arg(
                    category.name(),
                    "category row ids do not match the group's row ids",
                ));
            }
        }
        Ok(AlignedTable {
            name,
            description: self.description,
            row_ids,
            categories: self.categories,
        })
    }
}
