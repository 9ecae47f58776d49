//! WEC tiered admission engine
//!
//! Decides, per accessed block, whether it lives in RAM, on SSD or only on
//! the backing HDD. New blocks enter RAM and the admission window (WCQ).
//! Every `update_period` requests the engine promotes the coldest tracked
//! blocks to SSD and resizes the window so that SSD writes track the free SSD
//! space. SSD blocks that fall out of the window wait in the second-chance
//! pool (SPQ) until they are read again or age past the quit threshold.
//!
//! All record state lives in one arena keyed by address; the window, pool,
//! RAM view, SSD set and candidate index only hold addresses.

pub mod record;

use crate::config::error::ConfigResult;
use crate::config::{Capacities, WecConfig};
use crate::infrastructure::frequency::FrequencyIndex;
use crate::infrastructure::hash::{AddressSet, address_set};
use crate::infrastructure::recency::RecencyQueue;
use crate::policy::error::{PolicyError, PolicyResult, Snapshot};
use crate::policy::report::{Report, ReportSizes};
use crate::policy::{Policy, Stats};
use crate::types::{Address, Op, Sequence, Tier, TraceRecord};
use record::{BlockArena, BlockRecord};
use std::time::Duration;

/// The WEC cache engine. One instance replays exactly one trace.
/// Outcome of one periodic SSD reconfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconfiguration {
    /// Blocks dropped from the second-chance pool
    pub purged: usize,
    /// SSD free space after the purge
    pub free: usize,
    pub selected: usize,
    pub promoted: usize,
    pub window_size: usize,
}

pub struct WecEngine {
    config: WecConfig,
    capacities: Capacities,
    /// Current admission window size, never below the RAM capacity
    window_size: usize,
    arena: BlockArena,
    /// Admission window (WCQ), oldest first
    window: RecencyQueue,
    /// Second-chance pool (SPQ), oldest first
    pool: RecencyQueue,
    /// RAM-resident subset of the window, oldest first
    ram: RecencyQueue,
    ssd: AddressSet,
    /// RAM and HDD records of the window, bucketed by access count
    candidates: FrequencyIndex,
    stats: Stats,
    cycles: u64,
}

impl WecEngine {
    pub fn new(config: WecConfig) -> ConfigResult<Self> {
        config.validate()?;
        let capacities = config.capacities();
        tracing::debug!(
            cache = capacities.cache,
            ram = capacities.ram,
            ssd = capacities.ssd,
            window = capacities.window,
            quit_threshold = capacities.quit_threshold,
            "created WEC engine"
        );

        Ok(WecEngine {
            config,
            capacities,
            window_size: capacities.window,
            arena: BlockArena::new(),
            window: RecencyQueue::new(),
            pool: RecencyQueue::new(),
            ram: RecencyQueue::new(),
            ssd: address_set(),
            candidates: FrequencyIndex::new(),
            stats: Stats::default(),
            cycles: 0,
        })
    }

    pub fn config(&self) -> &WecConfig {
        &self.config
    }

    pub fn capacities(&self) -> &Capacities {
        &self.capacities
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn ram_len(&self) -> usize {
        self.ram.len()
    }

    pub fn ssd_len(&self) -> usize {
        self.ssd.len()
    }

    pub fn candidate_len(&self) -> usize {
        self.candidates.len()
    }

    /// Completed SSD reconfiguration cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn record(&self, address: Address) -> Option<&BlockRecord> {
        self.arena.get(address)
    }

    pub fn in_window(&self, address: Address) -> bool {
        self.window.contains(address)
    }

    pub fn in_pool(&self, address: Address) -> bool {
        self.pool.contains(address)
    }

    pub fn in_ssd(&self, address: Address) -> bool {
        self.ssd.contains(&address)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            request: self.stats.requests,
            window_len: self.window.len(),
            window_size: self.window_size,
            pool_len: self.pool.len(),
            ram_len: self.ram.len(),
            ssd_len: self.ssd.len(),
            candidates: self.candidates.len(),
        }
    }

    fn inconsistent(&self, address: Address, detail: impl Into<String>) -> PolicyError {
        PolicyError::Inconsistent {
            address,
            detail: detail.into(),
            snapshot: self.snapshot(),
        }
    }

    fn violated(&self, detail: impl Into<String>) -> PolicyError {
        PolicyError::Invariant {
            detail: detail.into(),
            snapshot: self.snapshot(),
        }
    }

    fn tier_of(&self, address: Address) -> PolicyResult<Tier> {
        match self.arena.get(address) {
            Some(record) => Ok(record.tier),
            None => Err(self.inconsistent(address, "tracked address has no block record")),
        }
    }

    fn set_tier(&mut self, address: Address, tier: Tier) -> PolicyResult<()> {
        let Some(record) = self.arena.get_mut(address) else {
            return Err(self.inconsistent(address, "tier change on missing block record"));
        };
        record.tier = tier;
        Ok(())
    }

    /// Count an access and clear the idle time. Returns the new access count.
    fn touch_record(&mut self, address: Address, seq: Sequence) -> PolicyResult<u64> {
        let Some(record) = self.arena.get_mut(address) else {
            return Err(self.inconsistent(address, "access to missing block record"));
        };
        record.idle_time = 0;
        Ok(record.touch(seq))
    }

    fn read(&mut self, address: Address, seq: Sequence) -> PolicyResult<()> {
        self.stats.reads += 1;

        if self.window.contains(address) {
            return match self.tier_of(address)? {
                Tier::Ram => {
                    self.stats.hits += 1;
                    self.stats.ram_hits += 1;
                    let count = self.touch_record(address, seq)?;
                    self.candidates.relocate(address, count);
                    self.ram.touch(address);
                    self.window.touch(address);
                    Ok(())
                }
                Tier::Hdd => {
                    self.stats.misses += 1;
                    let count = self.touch_record(address, seq)?;
                    self.candidates.relocate(address, count);
                    self.set_tier(address, Tier::Ram)?;
                    self.ram.push_back(address);
                    self.window.touch(address);
                    self.enforce_ram_capacity()
                }
                Tier::Ssd => {
                    self.stats.hits += 1;
                    self.stats.ssd_hits += 1;
                    self.touch_record(address, seq)?;
                    self.window.touch(address);
                    Ok(())
                }
            };
        }

        if self.pool.remove(address) {
            self.stats.hits += 1;
            self.stats.ssd_hits += 1;
            self.touch_record(address, seq)?;
            self.window.push_back(address);
            tracing::trace!(address, "re-admitted block from second-chance pool");
            return self.evict_overflow();
        }

        self.stats.misses += 1;
        if !self.arena.insert(BlockRecord::new(address, seq)) {
            return Err(self.inconsistent(address, "untracked address already has a block record"));
        }
        self.window.push_back(address);
        self.ram.push_back(address);
        self.candidates.insert(address, 1);
        self.enforce_ram_capacity()?;
        self.evict_overflow()
    }

    /// Write-invalidate: a tracked block is forgotten entirely
    fn write(&mut self, address: Address) -> PolicyResult<()> {
        self.stats.writes += 1;

        let tracked = self.window.remove(address) || self.pool.remove(address);
        if !tracked {
            self.stats.misses += 1;
            return Ok(());
        }

        let Some(record) = self.arena.remove(address) else {
            return Err(self.inconsistent(address, "invalidated address has no block record"));
        };
        self.candidates.remove(address);
        match record.tier {
            Tier::Ram => {
                self.stats.hits += 1;
                self.stats.ram_hits += 1;
                self.ram.remove(address);
            }
            Tier::Ssd => {
                self.stats.hits += 1;
                self.stats.ssd_hits += 1;
                self.ssd.remove(&address);
            }
            Tier::Hdd => self.stats.misses += 1,
        }
        tracing::trace!(address, tier = %record.tier, "write invalidated block");
        Ok(())
    }

    /// Demote the oldest RAM blocks to HDD until RAM fits its capacity
    fn enforce_ram_capacity(&mut self) -> PolicyResult<()> {
        while self.ram.len() > self.capacities.ram {
            let Some(address) = self.ram.pop_front() else {
                break;
            };
            self.set_tier(address, Tier::Hdd)?;
        }
        Ok(())
    }

    /// Evict from the front of the window until it fits the window size.
    ///
    /// SSD blocks move to the second-chance pool, HDD blocks are dropped. A
    /// RAM block at the front leaves RAM first, then is dropped like an HDD
    /// block.
    fn evict_overflow(&mut self) -> PolicyResult<()> {
        while self.window.len() > self.window_size {
            let Some(address) = self.window.front() else {
                break;
            };

            if self.tier_of(address)? == Tier::Ram {
                self.enforce_ram_capacity()?;
                if self.tier_of(address)? == Tier::Ram {
                    self.ram.remove(address);
                    self.set_tier(address, Tier::Hdd)?;
                }
            }

            if self.tier_of(address)? == Tier::Ssd {
                let idle_time = (self.window.len() - 1) as u64;
                self.window.remove(address);
                let Some(record) = self.arena.get_mut(address) else {
                    return Err(self.inconsistent(address, "evicted SSD block has no record"));
                };
                record.idle_time = idle_time;
                self.pool.push_back(address);
                tracing::trace!(address, idle_time, "moved block to second-chance pool");
            } else {
                self.window.remove(address);
                self.candidates.remove(address);
                self.arena.remove(address);
                tracing::trace!(address, "evicted block from admission window");
            }
        }
        Ok(())
    }

    /// Age every pooled block by one tick and purge those past the quit
    /// threshold. Returns the number of purged blocks.
    fn age_pool(&mut self) -> PolicyResult<usize> {
        let quit_threshold = self.capacities.quit_threshold;
        let pooled: Vec<Address> = self.pool.iter().collect();
        let mut expired = Vec::new();

        for address in pooled {
            let Some(record) = self.arena.get_mut(address) else {
                return Err(self.inconsistent(address, "pooled address has no block record"));
            };
            record.idle_time += 1;
            if record.idle_time > quit_threshold {
                expired.push(address);
            }
        }

        for &address in &expired {
            self.pool.remove(address);
            self.ssd.remove(&address);
            self.arena.remove(address);
            tracing::trace!(address, "purged idle block from second-chance pool");
        }
        Ok(expired.len())
    }

    fn promote(&mut self, address: Address) -> PolicyResult<()> {
        if self.tier_of(address)? == Tier::Ram {
            self.ram.remove(address);
        }
        self.set_tier(address, Tier::Ssd)?;
        self.ssd.insert(address);
        self.candidates.remove(address);
        self.stats.ssd_writes += 1;
        Ok(())
    }

    /// Periodic SSD reconfiguration.
    ///
    /// Ages the second-chance pool, selects the coldest
    /// `ceil(promotion_threshold * candidates)` blocks, promotes as many as
    /// SSD free space allows and resizes the window by the difference between
    /// selected blocks and free space. Free space is measured after the pool
    /// purge.
    pub fn reconfigure(&mut self) -> PolicyResult<Reconfiguration> {
        self.cycles += 1;
        let purged = self.age_pool()?;

        let free = self.capacities.ssd.saturating_sub(self.ssd.len());
        let wanted =
            (self.config.promotion_threshold * self.candidates.len() as f64).ceil() as usize;
        let selected = self.candidates.coldest(wanted);

        let previous_window = self.window_size;
        let resized = if selected.len() > free {
            previous_window
                .saturating_sub(selected.len() - free)
                .max(self.capacities.ram)
        } else {
            previous_window.saturating_add(free - selected.len())
        };

        let mut promoted = 0;
        for &address in selected.iter().take(free) {
            self.promote(address)?;
            promoted += 1;
        }

        self.window_size = resized;
        self.evict_overflow()?;

        tracing::debug!(
            cycle = self.cycles,
            free,
            selected = selected.len(),
            promoted,
            purged,
            previous_window,
            window = resized,
            "SSD reconfiguration"
        );
        Ok(Reconfiguration {
            purged,
            free,
            selected: selected.len(),
            promoted,
            window_size: resized,
        })
    }

    /// Verify that every index agrees with the arena
    pub fn check_invariants(&self) -> PolicyResult<()> {
        for address in self.window.iter() {
            if self.pool.contains(address) {
                return Err(self.inconsistent(address, "present in both window and pool"));
            }
            self.tier_of(address)?;
        }

        for address in self.pool.iter() {
            if self.tier_of(address)? != Tier::Ssd {
                return Err(self.inconsistent(address, "pooled block is not SSD-resident"));
            }
        }

        if self.arena.len() != self.window.len() + self.pool.len() {
            return Err(self.violated(
                format!(
                    "arena holds {} records for {} window and {} pool entries",
                    self.arena.len(),
                    self.window.len(),
                    self.pool.len()
                ),
            ));
        }

        for address in self.ram.iter() {
            if !self.window.contains(address) {
                return Err(self.inconsistent(address, "RAM block outside the window"));
            }
            if self.tier_of(address)? != Tier::Ram {
                return Err(self.inconsistent(address, "RAM view holds a non-RAM block"));
            }
        }

        for &address in &self.ssd {
            if self.tier_of(address)? != Tier::Ssd {
                return Err(self.inconsistent(address, "SSD set holds a non-SSD block"));
            }
        }

        for record in self.arena.iter() {
            let address = record.address;
            match record.tier {
                Tier::Ram if !self.ram.contains(address) => {
                    return Err(self.inconsistent(address, "RAM block missing from RAM view"));
                }
                Tier::Ssd if !self.ssd.contains(&address) => {
                    return Err(self.inconsistent(address, "SSD block missing from SSD set"));
                }
                _ => {}
            }
            let indexed = self.candidates.frequency_of(address);
            match (record.tier, indexed) {
                (Tier::Ssd, Some(_)) => {
                    return Err(self.inconsistent(address, "SSD block still a promotion candidate"));
                }
                (Tier::Ram | Tier::Hdd, None) => {
                    return Err(self.inconsistent(address, "tracked block missing from candidates"));
                }
                (Tier::Ram | Tier::Hdd, Some(count)) if count != record.access_count => {
                    return Err(self.inconsistent(
                        address,
                        format!("filed under count {} but accessed {} times", count, record.access_count),
                    ));
                }
                _ => {}
            }
        }

        if self.window_size < self.capacities.ram {
            return Err(self.violated("window size below RAM capacity"));
        }
        if self.window.len() > self.window_size {
            return Err(self.violated("window longer than window size"));
        }
        if self.ram.len() > self.capacities.ram {
            return Err(self.violated("RAM view over capacity"));
        }
        if self.ssd.len() > self.capacities.ssd {
            return Err(self.violated("SSD set over capacity"));
        }
        Ok(())
    }
}

impl Policy for WecEngine {
    fn name(&self) -> &'static str {
        "WEC"
    }

    fn ingest(&mut self, record: &TraceRecord) -> PolicyResult<()> {
        self.stats.requests += 1;
        let seq = self.stats.requests;

        if seq % self.config.update_period == 0 {
            self.reconfigure()?;
        }

        match record.op {
            Op::Read => self.read(record.address, seq),
            Op::Write => self.write(record.address),
        }
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn report(&self, elapsed: Duration) -> Report {
        let sizes = ReportSizes {
            cache: self.capacities.cache,
            ram: self.capacities.ram,
            ssd: self.capacities.ssd,
            hdd: self.capacities.hdd,
            window: Some(self.window_size),
            quit_threshold: Some(self.capacities.quit_threshold),
        };
        Report::new(self.name(), sizes, self.stats, elapsed)
    }
}
