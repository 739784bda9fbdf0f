use thiserror::Error;

/// Error type shared by all dyntab crates.
///
/// Every failure in the table engine is synchronous and deterministic:
/// construction-time errors abort table creation entirely, read-time errors
/// abort the single read call. The concrete failure is carried as a boxed
/// [`ErrorKind`] to keep `Result<T>` small.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn equal_length(
        table: impl Into<String>,
        column: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Error {
        Error(
            ErrorKind::EqualLengthViolation {
                table: table.into(),
                column: column.into(),
                expected,
                actual,
            }
            .into(),
        )
    }

    pub fn ambiguous_index_target(
        column: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::AmbiguousIndexTarget {
                column: column.into(),
                first: first.into(),
                second: second.into(),
            }
            .into(),
        )
    }

    pub fn out_of_range(what: impl Into<String>, index: usize, len: usize) -> Error {
        Error(
            ErrorKind::OutOfRange {
                what: what.into(),
                index,
                len,
            }
            .into(),
        )
    }

    pub fn dangling_reference(table: impl Into<String>, row: usize, len: usize) -> Error {
        Error(
            ErrorKind::DanglingReference {
                table: table.into(),
                row,
                len,
            }
            .into(),
        )
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnknownColumn {
                table: table.into(),
                column: column.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error(
        "column '{column}' of table '{table}' resolves to {actual} rows, expected {expected}"
    )]
    EqualLengthViolation {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("indices '{first}' and '{second}' both target column '{column}'")]
    AmbiguousIndexTarget {
        column: String,
        first: String,
        second: String,
    },

    #[error("{what} index {index} is out of range for length {len}")]
    OutOfRange {
        what: String,
        index: usize,
        len: usize,
    },

    #[error("reference points at row {row} of table '{table}', which has {len} rows")]
    DanglingReference {
        table: String,
        row: usize,
        len: usize,
    },

    #[error("'{table}' has no column or category named '{column}'")]
    UnknownColumn { table: String, column: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
