//! Policy error definitions

use crate::types::Address;
use std::error::Error;
use std::fmt;

/// Queue sizes of an engine at the moment an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Requests processed so far, including the failing one
    pub request: u64,
    pub window_len: usize,
    pub window_size: usize,
    pub pool_len: usize,
    pub ram_len: usize,
    pub ssd_len: usize,
    pub candidates: usize,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request={} window={}/{} pool={} ram={} ssd={} candidates={}",
            self.request,
            self.window_len,
            self.window_size,
            self.pool_len,
            self.ram_len,
            self.ssd_len,
            self.candidates
        )
    }
}

/// Policy error types
#[derive(Debug)]
pub enum PolicyError {
    /// Two indices disagree about an address
    Inconsistent {
        address: Address,
        detail: String,
        snapshot: Snapshot,
    },
    /// An engine-wide size bound was violated
    Invariant { detail: String, snapshot: Snapshot },
    /// Report sink failure
    IoError(std::io::Error),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Inconsistent {
                address,
                detail,
                snapshot,
            } => write!(
                f,
                "Inconsistent state for address {}: {} ({})",
                address, detail, snapshot
            ),
            PolicyError::Invariant { detail, snapshot } => {
                write!(f, "Invariant violated: {} ({})", detail, snapshot)
            }
            PolicyError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for PolicyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PolicyError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PolicyError {
    fn from(err: std::io::Error) -> Self {
        PolicyError::IoError(err)
    }
}

/// Result type for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
