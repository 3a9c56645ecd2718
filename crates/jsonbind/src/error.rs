use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure of a facade operation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input was not acceptable JSON under the resolved read options.
    #[error("{message} at position {position}")]
    Parse {
        /// Byte offset of the first problem.
        position: usize,
        message: String,
    },
    /// A file could not be opened, read or written.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl From<jsontree::ReadError> for Error {
    fn from(err: jsontree::ReadError) -> Self {
        Self::Parse {
            position: err.position,
            message: err.kind.to_string(),
        }
    }
}

/// Failure while turning host values into JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("circular reference detected")]
    CircularReference,
    #[error("nesting of {depth} is too deep")]
    DepthExceeded { depth: usize },
    #[error("{0} not allowed in JSON")]
    InvalidNumber(NonFinite),
    #[error(transparent)]
    Write(#[from] jsontree::WriteError),
}

/// The non-finite float that was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    NaN,
    Infinity,
    NegInfinity,
}

impl NonFinite {
    /// Classify `f`, returning `None` for finite values.
    #[must_use]
    pub fn of(f: f64) -> Option<Self> {
        if f.is_nan() {
            Some(Self::NaN)
        } else if f == f64::INFINITY {
            Some(Self::Infinity)
        } else if f == f64::NEG_INFINITY {
            Some(Self::NegInfinity)
        } else {
            None
        }
    }
}

impl std::fmt::Display for NonFinite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NaN => "NaN",
            Self::Infinity => "Infinity",
            Self::NegInfinity => "-Infinity",
        })
    }
}

/// Attempt to mutate a frozen string, array or map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("can't modify frozen {0}")]
pub struct FrozenError(pub &'static str);

/// A mode token that names no known mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode {0:?}")]
pub struct UnknownMode(pub String);
