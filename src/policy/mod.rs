//! Cache policies
//!
//! Every policy consumes trace records one at a time and reports its counters
//! once the trace is exhausted. The tiered WEC engine lives in `crate::wec`;
//! the single-tier LRU and LFU baselines live here.

pub mod error;
pub mod lfu;
pub mod lru;
pub mod report;

use crate::config::WecConfig;
use crate::config::error::{ConfigError, ConfigResult};
use crate::types::TraceRecord;
use crate::wec::WecEngine;
use error::PolicyResult;
use lfu::LfuPolicy;
use lru::LruPolicy;
use report::Report;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Run-scoped counters
///
/// `hits + misses == requests` once every request has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub requests: u64,
    /// Read requests
    pub reads: u64,
    /// Write requests
    pub writes: u64,
    pub hits: u64,
    pub misses: u64,
    pub ram_hits: u64,
    pub ssd_hits: u64,
    /// Blocks written into the durable cache tier
    pub ssd_writes: u64,
}

/// Common surface of all simulated policies
pub trait Policy {
    /// Tag used in reports
    fn name(&self) -> &'static str;

    /// Process one trace event
    fn ingest(&mut self, record: &TraceRecord) -> PolicyResult<()>;

    fn stats(&self) -> &Stats;

    /// Build the report for a run that took `elapsed`
    fn report(&self, elapsed: Duration) -> Report;

    /// Write the final report into `sink` and return it
    fn finalize(&self, sink: &mut dyn Write, started: Instant) -> PolicyResult<Report> {
        let report = self.report(started.elapsed());
        report.write_text(sink)?;
        Ok(report)
    }
}

/// Selectable policy implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Wec,
    Lru,
    Lfu,
}

impl PolicyKind {
    /// Build a fresh policy instance. The baselines get a single tier as
    /// large as the WEC cache (RAM + SSD) derived from the same configuration.
    pub fn build(self, config: &WecConfig) -> ConfigResult<Box<dyn Policy + Send>> {
        config.validate()?;
        let policy: Box<dyn Policy + Send> = match self {
            PolicyKind::Wec => Box::new(WecEngine::new(config.clone())?),
            PolicyKind::Lru => Box::new(LruPolicy::new(config.capacities().cache)),
            PolicyKind::Lfu => Box::new(LfuPolicy::new(config.capacities().cache)),
        };
        Ok(policy)
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wec" => Ok(PolicyKind::Wec),
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Wec => write!(f, "wec"),
            PolicyKind::Lru => write!(f, "lru"),
            PolicyKind::Lfu => write!(f, "lfu"),
        }
    }
}
