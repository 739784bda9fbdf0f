//! A named offsets collection addressing a target column as a ragged array.

use std::ops::Range;

use crate::offsets::Offsets;

/// A named sequence of monotonically non-decreasing offsets that
/// reinterprets a target column's flat storage as a sequence of
/// variable-length logical rows.
///
/// The target is identified either explicitly via [`with_target`] or by the
/// naming convention `<column>_index`. Resolution happens in the table
/// layer at construction time; the index itself never owns its target.
///
/// [`with_target`]: VectorIndex::with_target
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    name: String,
    offsets: Offsets,
    target: Option<String>,
}

impl VectorIndex {
    pub fn new(name: impl Into<String>, offsets: Offsets) -> VectorIndex {
        VectorIndex {
            name: name.into(),
            offsets,
            target: None,
        }
    }

    /// Assigns an explicit target column name, overriding the naming
    /// convention during linking.
    pub fn with_target(mut self, target: impl Into<String>) -> VectorIndex {
        self.target = Some(target.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    /// The explicitly assigned target column name, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the number of logical rows the index carves its target into.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.item_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the flat-storage range of logical row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn range_at(&self, index: usize) -> Range<usize> {
        self.offsets.range_at(index)
    }

    /// The column name this index targets by the `<column>_index` naming
    /// convention, if its own name carries the suffix.
    pub fn conventional_target(&self) -> Option<&str> {
        self.name.strip_suffix("_index").filter(|s| !s.is_empty())
    }
}
