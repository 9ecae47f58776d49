// Single-tier LRU baseline

use super::error::PolicyResult;
use super::report::{Report, ReportSizes};
use super::{Policy, Stats};
use crate::infrastructure::recency::RecencyQueue;
use crate::types::{Address, Op, TraceRecord};
use std::time::Duration;

/// Least-recently-used cache over one durable tier
///
/// Every miss installs the block (one SSD write) and evicts the least recently
/// used block once the cache is full. A write hit rewrites the block in place
/// and also counts as an SSD write.
pub struct LruPolicy {
    capacity: usize,
    queue: RecencyQueue,
    stats: Stats,
}

impl LruPolicy {
    pub fn new(capacity: usize) -> Self {
        LruPolicy {
            capacity,
            queue: RecencyQueue::new(),
            stats: Stats::default(),
        }
    }

    /// Number of cached blocks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.queue.contains(address)
    }
}

impl Policy for LruPolicy {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn ingest(&mut self, record: &TraceRecord) -> PolicyResult<()> {
        self.stats.requests += 1;
        match record.op {
            Op::Read => self.stats.reads += 1,
            Op::Write => self.stats.writes += 1,
        }

        if self.queue.touch(record.address) {
            self.stats.hits += 1;
            self.stats.ssd_hits += 1;
            if record.op == Op::Write {
                self.stats.ssd_writes += 1;
            }
            return Ok(());
        }

        self.stats.misses += 1;
        self.stats.ssd_writes += 1;
        self.queue.push_back(record.address);
        while self.queue.len() > self.capacity {
            self.queue.pop_front();
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
