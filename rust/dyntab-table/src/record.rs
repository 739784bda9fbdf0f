//! Materialized results of row and cell reads.

use dyntab_sequence::values::{Value, Values};

/// One materialized cell of a table read.
///
/// Every shape a cell can take is an explicit tag, so read paths dispatch
/// on the column's structure exactly once. A plain column yields `Scalar`,
/// a ragged column yields `List` (one logical row as a homogeneous slice
/// of the flat storage), a region reference yields the resolved target
/// `Row`, and a ragged region reference yields `Rows`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Scalar(Value),
    List(Values),
    Row(Record),
    Rows(Vec<Record>),
}

impl Cell {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Cell::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Values> {
        match self {
            Cell::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&Record> {
        match self {
            Cell::Row(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_rows(&self) -> Option<&[Record]> {
        match self {
            Cell::Rows(records) => Some(records),
            _ => None,
        }
    }
}

/// An ordered name-to-cell mapping for one logical row.
///
/// Entry order is the table's display order: the `id` entry first, then
/// every column in column order. Aligned-table reads namespace entries as
/// `<category>.<column>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Cell)>,
}

impl Record {
    pub fn new() -> Record {
        Record {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Record {
        Record {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry. Names are expected to be unique; the table layer
    /// guarantees this for records it builds.
    pub fn push(&mut self, name: impl Into<String>, cell: Cell) {
        self.entries.push((name.into(), cell));
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, cell)| cell)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl std::ops::Index<&str> for Record {
    type Output = Cell;

    /// # Panics
    ///
    /// Panics if no entry has the given name.
    fn index(&self, name: &str) -> &Cell {
        self.get(name)
            .unwrap_or_else(|| panic!("record has no entry named '{name}'"))
    }
}
