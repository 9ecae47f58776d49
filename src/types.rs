//! Global type definitions
//!
//! Stores the identifiers and enums shared by the trace reader, the policies
//! and the simulator driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::policy::error::PolicyError;
use crate::trace::error::TraceError;

/// Block address type
pub type Address = u64;

/// Trace sequence number (1-based request counter)
pub type Sequence = u64;

/// Storage tier holding a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Volatile cache tier
    Ram,
    /// Durable cache tier
    Ssd,
    /// Backing store, tracked but not cached
    Hdd,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Ram => write!(f, "RAM"),
            Tier::Ssd => write!(f, "SSD"),
            Tier::Hdd => write!(f, "HDD"),
        }
    }
}

/// Trace operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Read,
    Write,
}

impl Op {
    /// Parses an operation code, case-insensitive
    pub fn from_code(code: &str) -> Option<Op> {
        if code.eq_ignore_ascii_case("r") {
            Some(Op::Read)
        } else if code.eq_ignore_ascii_case("w") {
            Some(Op::Write)
        } else {
            None
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Read => write!(f, "R"),
            Op::Write => write!(f, "W"),
        }
    }
}

/// One trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub address: Address,
    pub op: Op,
}

impl TraceRecord {
    #[inline]
    pub fn new(address: Address, op: Op) -> Self {
        Self { address, op }
    }

    #[inline]
    pub fn read(address: Address) -> Self {
        Self::new(address, Op::Read)
    }

    #[inline]
    pub fn write(address: Address) -> Self {
        Self::new(address, Op::Write)
    }
}

/// Simulator error type
#[derive(Debug)]
pub enum SimError {
    /// Rejected configuration
    Config(ConfigError),
    /// Malformed or unreadable trace
    Trace(TraceError),
    /// Policy failure during replay or reporting
    Policy(PolicyError),
    /// I/O error outside of trace loading
    IoError(std::io::Error),
    /// Serialization error
    Serde(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(err) => write!(f, "Configuration error: {}", err),
            SimError::Trace(err) => write!(f, "Trace error: {}", err),
            SimError::Policy(err) => write!(f, "Policy error: {}", err),
            SimError::IoError(err) => write!(f, "I/O error: {}", err),
            SimError::Serde(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(err) => Some(err),
            SimError::Trace(err) => Some(err),
            SimError::Policy(err) => Some(err),
            SimError::IoError(err) => Some(err),
            SimError::Serde(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err)
    }
}

impl From<TraceError> for SimError {
    fn from(err: TraceError) -> Self {
        SimError::Trace(err)
    }
}

impl From<PolicyError> for SimError {
    fn from(err: PolicyError) -> Self {
        SimError::Policy(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::IoError(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serde(err)
    }
}

/// Simulator result type
pub type SimResult<T> = Result<T, SimError>;
