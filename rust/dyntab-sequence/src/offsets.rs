//! A collection of offsets for variable-length data.

use std::ops::Range;

use dyntab_common::{Result, error::Error};

/// A collection of offsets for variable-length data.
///
/// Stores a sequence of monotonically non-decreasing offsets, where each
/// pair of adjacent offsets defines the range of a single item. The first
/// offset is always present and always zero, representing the start
/// position of the first item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offsets(Vec<u64>);

impl Offsets {
    /// Creates a new empty `Offsets` collection.
    ///
    /// The resulting collection will have a single offset at position 0.
    pub fn new() -> Offsets {
        Self::with_capacity(0)
    }

    /// Creates a new `Offsets` collection with the specified capacity.
    ///
    /// The resulting collection will have a single offset at position 0,
    /// and space reserved for `capacity` additional offsets.
    pub fn with_capacity(capacity: usize) -> Offsets {
        let mut buf = Vec::with_capacity(capacity + 1);
        buf.push(0u64);
        Offsets(buf)
    }

    /// Creates an `Offsets` collection from the lengths of consecutive
    /// items.
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Offsets {
        let mut offsets = Offsets::new();
        for len in lengths {
            offsets.push_length(len);
        }
        offsets
    }

    /// Creates an `Offsets` collection from the exclusive upper bounds of
    /// consecutive items, without the leading zero.
    ///
    /// This is the form index data arrives in from callers: `bounds[i]` is
    /// the end of logical item `i` in the flat target buffer, and the
    /// number of items equals `bounds.len()`.
    ///
    /// # Errors
    ///
    /// Fails if the bounds are not monotonically non-decreasing.
    pub fn from_bounds(bounds: &[u64]) -> Result<Offsets> {
        let mut buf = Vec::with_capacity(bounds.len() + 1);
        buf.push(0u64);
        for (i, &bound) in bounds.iter().enumerate() {
            if bound < buf[i] {
                return Err(Error::invalid_arg(
                    "bounds",
                    format!("offset {bound} at position {i} decreases below {}", buf[i]),
                ));
            }
            buf.push(bound);
        }
        Ok(Offsets(buf))
    }

    /// Returns the number of items represented by these offsets.
    ///
    /// This is one less than the number of stored offsets.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns `true` if the collection contains no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Returns the underlying slice of offsets, leading zero included.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Returns the first offset, which is the start position of the first
    /// item. This is always zero.
    #[inline]
    pub fn first(&self) -> u64 {
        self.0[0]
    }

    /// Returns the last offset, which marks the end of the last item and
    /// the total length of the flat storage the items occupy.
    #[inline]
    pub fn last(&self) -> u64 {
        *self.0.last().unwrap()
    }

    /// Returns the range of the item at a given logical index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= item_count()`.
    #[inline]
    pub fn range_at(&self, index: usize) -> Range<usize> {
        self.0[index] as usize..self.0[index + 1] as usize
    }

    /// Returns an iterator over the ranges of each item.
    #[inline]
    pub fn ranges(&self) -> OffsetsIter<'_> {
        OffsetsIter::new(self)
    }

    /// Adds a new offset to the end of the collection.
    ///
    /// # Panics
    ///
    /// Panics if `next_offset` is less than the current last offset.
    #[inline]
    pub fn push_offset(&mut self, next_offset: u64) {
        assert!(next_offset >= self.last());
        self.0.push(next_offset);
    }

    /// Adds a new offset by incrementing the last offset by the given
    /// length.
    #[inline]
    pub fn push_length(&mut self, len: usize) {
        let last = self.last();
        self.0.push(last + len as u64);
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the ranges of items defined by the offsets.
pub struct OffsetsIter<'a> {
    offsets: &'a [u64],
    index: usize,
}

impl<'a> OffsetsIter<'a> {
    pub fn new(offsets: &'a Offsets) -> Self {
        Self {
            offsets: offsets.as_slice(),
            index: 0,
        }
    }
}

impl Iterator for OffsetsIter<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index + 1 < self.offsets.len() {
            let start = self.offsets[self.index] as usize;
            let end = self.offsets[self.index + 1] as usize;
            self.index += 1;
            Some(start..end)
        } else {
            None
        }
    }
}
