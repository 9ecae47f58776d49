// Single-tier LFU baseline

use super::error::PolicyResult;
use super::report::{Report, ReportSizes};
use super::{Policy, Stats};
use crate::infrastructure::frequency::FrequencyIndex;
use crate::types::{Address, Op, TraceRecord};
use std::time::Duration;

/// Frequencies stop growing here so a hot block cannot pin itself forever
pub const MAX_FREQUENCY: u64 = 1000;

/// Least-frequently-used cache over one durable tier
///
/// Misses install the block with frequency 1 (one SSD write); when full, the
/// oldest block of the lowest frequency is evicted first. Write hits count as
/// SSD writes.
pub struct LfuPolicy {
    capacity: usize,
    index: FrequencyIndex,
    stats: Stats,
}

impl LfuPolicy {
    pub fn new(capacity: usize) -> Self {
        LfuPolicy {
            capacity,
            index: FrequencyIndex::new(),
            stats: Stats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn frequency_of(&self, address: Address) -> Option<u64> {
        self.index.frequency_of(address)
    }
}

impl Policy for LfuPolicy {
    fn name(&self) -> &'static str {
        "LFU"
    }

    fn ingest(&mut self, record: &TraceRecord) -> PolicyResult<()> {
        self.stats.requests += 1;
        match record.op {
            Op::Read => self.stats.reads += 1,
            Op::Write => self.stats.writes += 1,
        }

        if let Some(frequency) = self.index.frequency_of(record.address) {
            self.stats.hits += 1;
            self.stats.ssd_hits += 1;
            if record.op == Op::Write {
                self.stats.ssd_writes += 1;
            }
            if frequency < MAX_FREQUENCY {
                self.index.relocate(record.address, frequency + 1);
            }
            return Ok(());
        }

        self.stats.misses += 1;
        self.stats.ssd_writes += 1;
        if self.index.len() >= self.capacity {
            self.index.pop_coldest();
        }
        if self.capacity > 0 {
            self.index.insert(record.address, 1);
        }
        Ok(())
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn report(&self, elapsed: Duration) -> Report {
        let sizes = ReportSizes {
            cache: self.capacity,
            ssd: self.capacity,
            ..ReportSizes::default()
        };
        Report::new(self.name(), sizes, self.stats, elapsed)
    }
}
