//! A named, flat, homogeneous column of values.

use crate::values::{BasicType, Value, Values};

/// A named, flat, homogeneous column of values; the unit of storage.
///
/// A `VectorData` on its own is a plain fixed-stride column of `len()`
/// rows. When the owning table links a [`crate::index::VectorIndex`] to
/// it, the buffer instead holds the concatenation of all logical ragged
/// rows, and the index's offsets carve it into `item_count()` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorData {
    name: String,
    description: String,
    values: Values,
}

impl VectorData {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        values: impl Into<Values>,
    ) -> VectorData {
        VectorData {
            name: name.into(),
            description: description.into(),
            values: values.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn basic_type(&self) -> BasicType {
        self.values.basic_type()
    }

    /// Returns the number of stored elements (flattened count, not logical
    /// rows, when the column is addressed through an index).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn value_at(&self, index: usize) -> Value {
        self.values.value_at(index)
    }

    /// Returns a copy of this column with the values replaced.
    pub fn with_values(&self, values: Values) -> VectorData {
        VectorData {
            name: self.name.clone(),
            description: self.description.clone(),
            values,
        }
    }
}
