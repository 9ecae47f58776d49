//! Trace error definitions

use std::error::Error;
use std::fmt;

/// Trace error types
///
/// Any of these aborts the whole run; no partial report is produced.
#[derive(Debug)]
pub enum TraceError {
    /// Address field is not a non-negative integer
    InvalidAddress { line: usize, value: String },
    /// Operation field is neither R nor W
    InvalidOp { line: usize, value: String },
    /// Line does not carry two comma-separated fields
    MissingField { line: usize },
    /// I/O error while reading the trace
    IoError(std::io::Error),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::InvalidAddress { line, value } => {
                write!(f, "Invalid address on line {}: {:?}", line, value)
            }
            TraceError::InvalidOp { line, value } => {
                write!(f, "Invalid operation on line {}: {:?}", line, value)
            }
            TraceError::MissingField { line } => {
                write!(f, "Expected 'address,op' on line {}", line)
            }
            TraceError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for TraceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TraceError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::IoError(err)
    }
}

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;
