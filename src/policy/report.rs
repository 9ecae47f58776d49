//! Final run report

use crate::policy::Stats;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;

/// Tier sizes a policy ran with, in blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSizes {
    pub cache: usize,
    pub ram: usize,
    pub ssd: usize,
    pub hdd: usize,
    /// Admission window size at the end of the run, if the policy has one
    pub window: Option<usize>,
    pub quit_threshold: Option<u64>,
}

/// Counters and derived figures of one finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Policy tag, also used in the summary line
    pub policy: String,
    pub sizes: ReportSizes,
    pub stats: Stats,
    /// Hits over classified requests, in percent
    pub hit_ratio: f64,
    /// Hits per SSD write
    pub write_efficiency: f64,
    pub elapsed_secs: f64,
}

impl Report {
    const SEPARATOR: &'static str = "_______________________________________________________";

    pub fn new(policy: &str, sizes: ReportSizes, stats: Stats, elapsed: Duration) -> Self {
        let classified = stats.hits + stats.misses;
        let hit_ratio = if classified == 0 {
            0.0
        } else {
            100.0 * stats.hits as f64 / classified as f64
        };
        let write_efficiency = if stats.ssd_writes == 0 {
            0.0
        } else {
            stats.hits as f64 / stats.ssd_writes as f64
        };

        Self {
            policy: policy.to_string(),
            sizes,
            stats,
            hit_ratio,
            write_efficiency,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// Machine-parsable line: `!<POLICY>|<cache size>|<hits>|<requests>`
    pub fn summary_line(&self) -> String {
        format!(
            "!{}|{}|{}|{}",
            self.policy, self.sizes.cache, self.stats.hits, self.stats.requests
        )
    }

    /// Render the human-readable block followed by the summary line
    pub fn write_text(&self, sink: &mut dyn Write) -> io::Result<()> {
        writeln!(sink, "{}", Self::SEPARATOR)?;
        writeln!(sink, "{}", self.policy)?;
        writeln!(sink, "cache size:{}", self.sizes.cache)?;
        writeln!(sink, "ssd size:{}", self.sizes.ssd)?;
        writeln!(sink, "ram size:{}", self.sizes.ram)?;
        writeln!(sink, "hdd size:{}", self.sizes.hdd)?;
        if let Some(window) = self.sizes.window {
            writeln!(sink, "window size:{}", window)?;
        }
        if let Some(quit) = self.sizes.quit_threshold {
            writeln!(sink, "quit threshold:{}", quit)?;
        }
        writeln!(sink, "SSD hit:{}", self.stats.ssd_hits)?;
        writeln!(sink, "RAM hit:{}", self.stats.ram_hits)?;
        writeln!(sink, "cache hit:{}", self.stats.hits)?;
        writeln!(sink, "cache miss:{}", self.stats.misses)?;
        writeln!(sink, "hit ratio:{:.4}", self.hit_ratio)?;
        writeln!(sink, "write efficiency:{:.4}", self.write_efficiency)?;
        writeln!(sink, "write count:{}", self.stats.ssd_writes)?;
        writeln!(sink, "write request count:{}", self.stats.writes)?;
        writeln!(sink, "read request count:{}", self.stats.reads)?;
        writeln!(sink, "duration:{:.6}", self.elapsed_secs)?;
        writeln!(sink, "{}", self.summary_line())?;
        Ok(())
    }
}
