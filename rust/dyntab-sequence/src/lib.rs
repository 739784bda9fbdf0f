//! Value storage primitives for the dyntab table engine.
//!
//! This crate provides the building blocks that the table layer assembles
//! into dynamic tables. A [`values::Values`] buffer holds a flat,
//! homogeneous sequence of scalar values, addressed individually as
//! [`values::Value`]. An [`offsets::Offsets`] collection of monotonically
//! non-decreasing offsets reinterprets such a buffer as variable-length
//! items (a "ragged array"). On top of these sit [`column::VectorData`],
//! a named and described column over a `Values` buffer, and
//! [`index::VectorIndex`], a named `Offsets` collection that addresses a
//! target column's storage as ragged logical rows.
//!
//! Columns and indices are plain data at this level: the pairing of an
//! index with its target column, and all row-level validation, happens in
//! the table layer during construction.

pub mod column;
pub mod index;
pub mod offsets;
pub mod values;
