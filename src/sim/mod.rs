//! Trace replay driver
//!
//! Replays a fully loaded trace through a policy and collects its report. A
//! sweep repeats the replay for several backing-store capacities, each on a
//! fresh policy instance; with `parallel` set every capacity gets its own
//! thread, and reports still come back in capacity order.

use crate::config::WecConfig;
use crate::policy::error::PolicyResult;
use crate::policy::report::Report;
use crate::policy::{Policy, PolicyKind};
use crate::types::{SimResult, TraceRecord};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::thread;
use std::time::Instant;

/// Replay `trace` through `policy` and finalize into `sink`
pub fn run_policy(
    policy: &mut dyn Policy,
    trace: &[TraceRecord],
    sink: &mut dyn Write,
) -> PolicyResult<Report> {
    let started = Instant::now();
    for record in trace {
        policy.ingest(record)?;
    }
    policy.finalize(sink, started)
}

/// Output of one sweep run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: Report,
    /// Text block written by the policy's finalize step
    pub rendered: Vec<u8>,
}

/// One policy replayed over a list of backing-store capacities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sweep {
    pub kind: PolicyKind,
    /// Template; its capacity is replaced by each entry of `capacities`
    pub config: WecConfig,
    pub capacities: Vec<usize>,
    pub parallel: bool,
}

impl Sweep {
    pub fn new(kind: PolicyKind, config: WecConfig, capacities: Vec<usize>) -> Self {
        Sweep {
            kind,
            config,
            capacities,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate every configuration of the sweep before anything runs
    pub fn validate(&self) -> SimResult<()> {
        for &capacity in &self.capacities {
            self.config.clone().with_capacity(capacity).validate()?;
        }
        Ok(())
    }

    fn run_one(&self, capacity: usize, trace: &[TraceRecord]) -> SimResult<RunOutput> {
        let config = self.config.clone().with_capacity(capacity);
        let mut policy = self.kind.build(&config)?;
        tracing::info!(policy = %self.kind, capacity, records = trace.len(), "starting run");

        let mut rendered = Vec::new();
        let report = run_policy(policy.as_mut(), trace, &mut rendered)?;
        tracing::info!(
            policy = %self.kind,
            capacity,
            hits = report.stats.hits,
            misses = report.stats.misses,
            ssd_writes = report.stats.ssd_writes,
            elapsed_secs = report.elapsed_secs,
            "finished run"
        );
        Ok(RunOutput { report, rendered })
    }

    /// Run every capacity and return the outputs in capacity-list order.
    /// The first failing run aborts the sweep.
    pub fn run(&self, trace: &[TraceRecord]) -> SimResult<Vec<RunOutput>> {
        self.validate()?;

        if !self.parallel {
            return self
                .capacities
                .iter()
                .map(|&capacity| self.run_one(capacity, trace))
                .collect();
        }

        let results = Mutex::new(Vec::with_capacity(self.capacities.len()));
        thread::scope(|scope| {
            for (idx, &capacity) in self.capacities.iter().enumerate() {
                let results = &results;
                scope.spawn(move || {
                    let output = self.run_one(capacity, trace);
                    results.lock().push((idx, output));
                });
            }
        });

        let mut results = results.into_inner();
        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, output)| output).collect()
    }
}
