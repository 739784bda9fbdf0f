//! Flat, homogeneous buffers of scalar values.

use std::ops::Range;

/// The storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicType {
    Int,
    Float,
    Text,
    Bool,
}

/// A single scalar element of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    pub fn basic_type(&self) -> BasicType {
        match self {
            Value::Int(_) => BasicType::Int,
            Value::Float(_) => BasicType::Float,
            Value::Text(_) => BasicType::Text,
            Value::Bool(_) => BasicType::Bool,
        }
    }

    /// Returns the integer payload, if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A flat, homogeneous sequence of scalar values.
///
/// `Values` is the unit of column storage: one fully decoded, contiguous
/// buffer per column. The element type is fixed per buffer and expressed as
/// a tagged union rather than through type erasure, so every read dispatches
/// on an explicit tag instead of probing.
///
/// When a [`crate::index::VectorIndex`] is attached to the owning column,
/// the buffer holds the concatenation of all logical ragged rows in order,
/// and the index's offsets delimit the rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    Bool(Vec<bool>),
}

impl Values {
    /// Returns the number of stored elements.
    ///
    /// For a buffer addressed through an index this is the flattened element
    /// count, not the logical row count.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Text(v) => v.len(),
            Values::Bool(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the storage type of the buffer.
    pub fn basic_type(&self) -> BasicType {
        match self {
            Values::Int(_) => BasicType::Int,
            Values::Float(_) => BasicType::Float,
            Values::Text(_) => BasicType::Text,
            Values::Bool(_) => BasicType::Bool,
        }
    }

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Callers holding untrusted indices
    /// must bounds-check first; the table layer does so on every read path.
    pub fn value_at(&self, index: usize) -> Value {
        match self {
            Values::Int(v) => Value::Int(v[index]),
            Values::Float(v) => Value::Float(v[index]),
            Values::Text(v) => Value::Text(v[index].clone()),
            Values::Bool(v) => Value::Bool(v[index]),
        }
    }

    /// Returns a new buffer holding the elements of the given contiguous
    /// range.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Values {
        match self {
            Values::Int(v) => Values::Int(v[range].to_vec()),
            Values::Float(v) => Values::Float(v[range].to_vec()),
            Values::Text(v) => Values::Text(v[range].to_vec()),
            Values::Bool(v) => Values::Bool(v[range].to_vec()),
        }
    }

    /// Returns a new buffer gathering the elements at the given positions,
    /// in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any position is out of bounds.
    pub fn take(&self, positions: &[usize]) -> Values {
        match self {
            Values::Int(v) => Values::Int(positions.iter().map(|&i| v[i]).collect()),
            Values::Float(v) => Values::Float(positions.iter().map(|&i| v[i]).collect()),
            Values::Text(v) => Values::Text(positions.iter().map(|&i| v[i].clone()).collect()),
            Values::Bool(v) => Values::Bool(positions.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Appends all elements of `other` to this buffer.
    ///
    /// # Panics
    ///
    /// Panics if the two buffers have different storage types.
    pub fn extend_from(&mut self, other: &Values) {
        match (self, other) {
            (Values::Int(dst), Values::Int(src)) => dst.extend_from_slice(src),
            (Values::Float(dst), Values::Float(src)) => dst.extend_from_slice(src),
            (Values::Text(dst), Values::Text(src)) => dst.extend_from_slice(src),
            (Values::Bool(dst), Values::Bool(src)) => dst.extend_from_slice(src),
            (dst, src) => panic!(
                "type mismatch: cannot extend {:?} buffer from {:?}",
                dst.basic_type(),
                src.basic_type()
            ),
        }
    }

    /// Returns an empty buffer of the same storage type.
    pub fn empty_like(&self) -> Values {
        match self {
            Values::Int(_) => Values::Int(Vec::new()),
            Values::Float(_) => Values::Float(Vec::new()),
            Values::Text(_) => Values::Text(Vec::new()),
            Values::Bool(_) => Values::Bool(Vec::new()),
        }
    }

    /// Returns the integer elements, if this is an `Int` buffer.
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Values::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Vec<i64>> for Values {
    fn from(v: Vec<i64>) -> Values {
        Values::Int(v)
    }
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Values {
        Values::Float(v)
    }
}

impl From<Vec<String>> for Values {
    fn from(v: Vec<String>) -> Values {
        Values::Text(v)
    }
}

impl From<Vec<&str>> for Values {
    fn from(v: Vec<&str>) -> Values {
        Values::Text(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<bool>> for Values {
    fn from(v: Vec<bool>) -> Values {
        Values::Bool(v)
    }
}
