use std::fmt;

/// Coarse failure categories shared by validation and metric queries.
///
/// Every [`StatsError`] maps onto exactly one kind via [`StatsError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Shape,
    InvalidValue,
    DegenerateRow,
    InvalidParameter,
    DivisionByZero,
}

impl ErrorKind {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Shape => "E1001",
            Self::InvalidValue => "E1002",
            Self::DegenerateRow => "E1003",
            Self::InvalidParameter => "E2001",
            Self::DivisionByZero => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Shape => "Matrix has an unusable shape",
            Self::InvalidValue => "Matrix contains an invalid value",
            Self::DegenerateRow => "Matrix contains an all-zero row",
            Self::InvalidParameter => "Invalid metric parameter",
            Self::DivisionByZero => "Division by zero",
        }
    }

    /// Optional remediation hint for whoever produced the input.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::Shape => Some("Provide a non-empty square matrix (one row per process)."),
            Self::InvalidValue => Some(
                "Replace NaN, infinite and negative costs with finite values >= 0; \
                 rescale costs whose sums overflow.",
            ),
            Self::DegenerateRow => {
                Some("Every process must have some outgoing communication; drop idle processes.")
            }
            Self::InvalidParameter => Some("Use a block size k >= 1."),
            Self::DivisionByZero => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while validating a matrix or evaluating a metric.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// The input has no rows.
    #[error("communication matrix is empty")]
    Empty,

    /// Rows have different lengths.
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Rectangular but not square.
    #[error("communication matrix has to be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("communication matrix has a NaN value at ({row}, {col})")]
    NotANumber { row: usize, col: usize },

    #[error("communication matrix has an infinite value at ({row}, {col})")]
    NotFinite { row: usize, col: usize },

    #[error("communication matrix has a negative value {value} at ({row}, {col})")]
    Negative { row: usize, col: usize, value: f64 },

    /// Finite entries whose row sum exceeds the `f64` range.
    #[error("row {row} of the communication matrix sums to a value beyond the f64 range")]
    RowOverflow { row: usize },

    /// Finite row sums whose grand total exceeds the `f64` range.
    #[error("communication matrix sums to a value beyond the f64 range")]
    TotalOverflow,

    /// A row sums to exactly zero.
    #[error("row {row} of the communication matrix contains zeroes only")]
    DegenerateRow { row: usize },

    /// The matrix is valid but too small for the requested metric.
    #[error("{metric} needs a matrix of dimension >= {min}, got {dim}")]
    TooSmall {
        metric: &'static str,
        dim: usize,
        min: usize,
    },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        reason: &'static str,
    },

    /// A quantity used as divisor turned out to be zero.
    #[error("division by zero: {quantity} is 0")]
    DivisionByZero { quantity: &'static str },
}

impl StatsError {
    /// Collapse the detailed variant onto its [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty | Self::Ragged { .. } | Self::NotSquare { .. } | Self::TooSmall { .. } => {
                ErrorKind::Shape
            }
            Self::NotANumber { .. }
            | Self::NotFinite { .. }
            | Self::Negative { .. }
            | Self::RowOverflow { .. }
            | Self::TotalOverflow => ErrorKind::InvalidValue,
            Self::DegenerateRow { .. } => ErrorKind::DegenerateRow,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
        }
    }

    /// Machine-readable code of this error's kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Remediation hint of this error's kind, if any.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.kind().hint()
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
