//! Dynamic ragged-array tables.
//!
//! This crate is the table layer of the dyntab engine. It assembles the
//! storage primitives of `dyntab-sequence` into addressable 2D structures.
//!
//! A [`table::DynamicTable`] is a named, ordered collection of equal-length
//! columns with a parallel row-identifier column. Columns may be plain,
//! ragged (a `VectorData` carved into variable-length logical rows by a
//! linked `VectorIndex`), or [`region::TableRegion`] row-references into
//! another table, resolved lazily at read time. Tables are produced by
//! [`table::TableBuilder`] in a single validating pass, so no
//! partially-built table is ever observable. Several tables sharing one
//! row identity can be grouped into an [`aligned::AlignedTable`] and
//! queried as a single wider table. Row and cell reads materialize into
//! [`record::Record`] and [`record::Cell`] values.
//!
//! # Example
//!
//! ```
//! use dyntab_sequence::{column::VectorData, index::VectorIndex, offsets::Offsets};
//! use dyntab_table::table::TableBuilder;
//!
//! let table = TableBuilder::new("trials", "per-trial measurements")
//!     .with_column(VectorData::new("start_time", "", vec![0.0f64, 5.0, 9.0]))
//!     .with_column(VectorData::new(
//!         "spike_times",
//!         "",
//!         vec![10.0f64, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0],
//!     ))
//!     .with_index(VectorIndex::new(
//!         "spike_times_index",
//!         Offsets::from_bounds(&[3, 5, 9]).unwrap(),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.len(), 3);
//! ```

pub mod aligned;
pub mod record;
pub mod region;
pub mod table;
