use super::*;
use crate::config::AgingCurve;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine(config: WecConfig) -> WecEngine {
    WecEngine::new(config).unwrap()
}

fn read(engine: &mut WecEngine, address: Address) {
    engine.ingest(&TraceRecord::read(address)).unwrap();
}

fn write(engine: &mut WecEngine, address: Address) {
    engine.ingest(&TraceRecord::write(address)).unwrap();
}

/// 10 blocks of cache: RAM 2, SSD 8, window 2, quit threshold 10
fn small_engine() -> WecEngine {
    engine(
        WecConfig::new(10)
            .with_cache_ratio(1.0)
            .with_ram_ratio(0.2)
            .with_window_size(2)
            .with_promotion_threshold(1.0)
            .with_update_period(1_000_000),
    )
}

/// Promote block 1 to SSD, then push it out of the window into the pool
fn engine_with_pooled_block() -> WecEngine {
    let mut wec = small_engine();
    read(&mut wec, 1);
    wec.reconfigure().unwrap();
    assert_eq!(wec.window_size(), 9);
    for address in 2..=10 {
        read(&mut wec, address);
    }
    wec
}

#[test]
fn test_sequential_first_touch_reads_all_miss() {
    let mut wec = engine(
        WecConfig::new(100)
            .with_cache_ratio(1.0)
            .with_ram_ratio(0.5)
            .with_window_size(60)
            .with_update_period(1000),
    );
    assert_eq!(wec.capacities().ram, 50);
    assert_eq!(wec.capacities().ssd, 50);

    for address in 0..200 {
        read(&mut wec, address);
        assert!(wec.window_len() <= wec.window_size());
    }

    let stats = wec.stats();
    assert_eq!(stats.misses, 200);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.requests, 200);
    assert_eq!(wec.window_len(), 60);
    assert_eq!(wec.ram_len(), 50);
    assert_eq!(wec.candidate_len(), 60);
    wec.check_invariants().unwrap();
}

#[test]
fn test_repeated_read_is_ram_hit() {
    let mut wec = engine(WecConfig::default());

    read(&mut wec, 5);
    assert_eq!(wec.stats().misses, 1);
    let record = wec.record(5).unwrap();
    assert_eq!(record.tier, Tier::Ram);
    assert_eq!(record.access_count, 1);

    read(&mut wec, 5);
    let stats = wec.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.ram_hits, 1);
    assert_eq!(stats.misses, 1);
    let record = wec.record(5).unwrap();
    assert_eq!(record.tier, Tier::Ram);
    assert_eq!(record.access_count, 2);
    assert_eq!(record.last_access, 2);
    wec.check_invariants().unwrap();
}

#[test]
fn test_write_to_unknown_address_is_miss() {
    let mut wec = engine(WecConfig::default());

    write(&mut wec, 77);

    let stats = wec.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.writes, 1);
    assert!(wec.record(77).is_none());
    assert_eq!(wec.window_len(), 0);
}

#[test]
fn test_promoted_block_read_is_ssd_hit() {
    let mut wec = engine(WecConfig::new(100).with_cache_ratio(1.0).with_ram_ratio(0.5));
    read(&mut wec, 1);

    wec.reconfigure().unwrap();
    assert_eq!(wec.record(1).unwrap().tier, Tier::Ssd);
    assert!(wec.in_ssd(1));
    assert_eq!(wec.ram_len(), 0);
    assert_eq!(wec.candidate_len(), 0);
    assert_eq!(wec.stats().ssd_writes, 1);
    // 50 free SSD blocks, 1 selected: the window grows by the shortfall
    assert_eq!(wec.window_size(), 110 + 49);

    read(&mut wec, 1);
    let stats = wec.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.ssd_hits, 1);
    assert_eq!(wec.record(1).unwrap().idle_time, 0);
    wec.check_invariants().unwrap();
}

#[test]
fn test_ssd_block_falls_into_pool() {
    let wec = engine_with_pooled_block();

    assert!(wec.in_pool(1));
    assert!(!wec.in_window(1));
    assert!(wec.in_ssd(1));
    let record = wec.record(1).unwrap();
    assert_eq!(record.tier, Tier::Ssd);
    assert_eq!(record.idle_time, 9);
    assert_eq!(wec.window_len(), 9);
    wec.check_invariants().unwrap();
}

#[test]
fn test_pool_read_readmits_as_ssd_hit() {
    let mut wec = engine_with_pooled_block();

    read(&mut wec, 1);

    let stats = wec.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.ssd_hits, 1);
    assert_eq!(stats.misses, 10);
    assert!(wec.in_window(1));
    assert!(!wec.in_pool(1));
    assert_eq!(wec.record(1).unwrap().idle_time, 0);
    assert_eq!(wec.record(1).unwrap().access_count, 2);
    // Re-admission overflowed the window; the oldest HDD block is gone
    assert!(wec.record(2).is_none());
    assert_eq!(wec.window_len(), 9);
    wec.check_invariants().unwrap();
}

#[test]
fn test_pool_aging_purges_after_quit_threshold() {
    let mut wec = engine_with_pooled_block();
    assert_eq!(wec.capacities().quit_threshold, 10);

    // 9 -> 10: not past the threshold yet
    wec.reconfigure().unwrap();
    assert!(wec.in_pool(1));
    assert_eq!(wec.record(1).unwrap().idle_time, 10);
    assert_eq!(wec.stats().ssd_writes, 8);
    wec.check_invariants().unwrap();

    // 10 -> 11: purged from pool, SSD set and arena
    wec.reconfigure().unwrap();
    assert!(!wec.in_pool(1));
    assert!(!wec.in_ssd(1));
    assert!(wec.record(1).is_none());
    assert_eq!(wec.stats().ssd_writes, 9);
    wec.check_invariants().unwrap();

    // A purged block comes back cold
    read(&mut wec, 1);
    assert_eq!(wec.record(1).unwrap().tier, Tier::Ram);
    assert_eq!(wec.record(1).unwrap().access_count, 1);
}

#[test]
fn test_hdd_block_read_is_miss_and_returns_to_ram() {
    let mut wec = engine(WecConfig::new(10).with_cache_ratio(1.0).with_ram_ratio(0.2));
    for address in 1..=3 {
        read(&mut wec, address);
    }
    assert_eq!(wec.record(1).unwrap().tier, Tier::Hdd);
    assert_eq!(wec.ram_len(), 2);

    read(&mut wec, 1);

    assert_eq!(wec.stats().misses, 4);
    assert_eq!(wec.stats().hits, 0);
    let record = wec.record(1).unwrap();
    assert_eq!(record.tier, Tier::Ram);
    assert_eq!(record.access_count, 2);
    // Block 2 was the oldest RAM block and made room
    assert_eq!(wec.record(2).unwrap().tier, Tier::Hdd);
    assert_eq!(wec.ram_len(), 2);
    wec.check_invariants().unwrap();
}

#[test]
fn test_write_invalidates_ram_and_hdd_blocks() {
    let mut wec = engine(WecConfig::new(10).with_cache_ratio(1.0).with_ram_ratio(0.2));
    for address in 1..=3 {
        read(&mut wec, address);
    }

    write(&mut wec, 3);
    assert_eq!(wec.stats().hits, 1);
    assert_eq!(wec.stats().ram_hits, 1);
    assert!(wec.record(3).is_none());
    assert_eq!(wec.ram_len(), 1);

    write(&mut wec, 1);
    assert_eq!(wec.stats().misses, 4);
    assert!(wec.record(1).is_none());
    assert_eq!(wec.window_len(), 1);
    assert_eq!(wec.candidate_len(), 1);
    wec.check_invariants().unwrap();
}

#[test]
fn test_write_invalidates_ssd_blocks() {
    let mut wec = engine(WecConfig::new(100).with_cache_ratio(1.0));
    read(&mut wec, 1);
    wec.reconfigure().unwrap();

    write(&mut wec, 1);
    assert_eq!(wec.stats().ssd_hits, 1);
    assert!(!wec.in_ssd(1));
    assert!(wec.record(1).is_none());
    wec.check_invariants().unwrap();

    let mut wec = engine_with_pooled_block();
    write(&mut wec, 1);
    assert_eq!(wec.stats().hits, 1);
    assert_eq!(wec.stats().ssd_hits, 1);
    assert!(!wec.in_pool(1));
    assert!(!wec.in_ssd(1));
    assert!(wec.record(1).is_none());
    wec.check_invariants().unwrap();
}

#[test]
fn test_window_shrink_is_floored_at_ram_capacity() {
    let mut wec = engine(
        WecConfig::new(10)
            .with_cache_ratio(1.0)
            .with_ram_ratio(0.5)
            .with_promotion_threshold(1.0)
            .with_update_period(1_000_000),
    );
    assert_eq!(wec.window_size(), 11);
    for address in 1..=11 {
        read(&mut wec, address);
    }

    // 11 candidates for 5 free SSD blocks: shrink by 6, floor at RAM (5)
    wec.reconfigure().unwrap();
    assert_eq!(wec.window_size(), 5);
    assert_eq!(wec.stats().ssd_writes, 5);
    assert_eq!(wec.ssd_len(), 5);
    assert_eq!(wec.pool_len(), 5);
    assert_eq!(wec.window_len(), 5);
    assert!(wec.record(6).is_none());
    wec.check_invariants().unwrap();

    // Surplus again: the window cannot drop below RAM capacity
    wec.reconfigure().unwrap();
    assert_eq!(wec.window_size(), 5);
    assert!(wec.record(1).is_none());
    assert_eq!(wec.stats().ssd_writes, 6);
    wec.check_invariants().unwrap();
}

#[test]
fn test_reconfiguration_runs_every_update_period() {
    let mut wec = engine(WecConfig::default().with_update_period(4));
    for address in 0..9 {
        read(&mut wec, address);
    }
    assert_eq!(wec.cycles(), 2);
    // Two cycles promoted ceil(0.1 * 3) and ceil(0.1 * 6) blocks
    assert_eq!(wec.stats().ssd_writes, 2);
}

#[test]
fn test_reconfiguration_with_empty_candidates() {
    let mut wec = engine(WecConfig::default());
    wec.reconfigure().unwrap();
    assert_eq!(wec.stats().ssd_writes, 0);
    assert_eq!(wec.window_size(), 110 + 50);
    wec.check_invariants().unwrap();
}

fn random_trace(seed: u64, len: usize, addresses: u64) -> Vec<TraceRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            // Skew towards low addresses so some blocks get hot
            let address = if rng.gen_bool(0.7) {
                rng.gen_range(0..addresses / 10)
            } else {
                rng.gen_range(0..addresses)
            };
            if rng.gen_bool(0.2) {
                TraceRecord::write(address)
            } else {
                TraceRecord::read(address)
            }
        })
        .collect()
}

fn random_config(aging: AgingCurve) -> WecConfig {
    WecConfig::new(1000)
        .with_cache_ratio(0.1)
        .with_ram_ratio(0.4)
        .with_update_period(97)
        .with_promotion_threshold(0.2)
        .with_aging(aging)
}

#[test]
fn test_invariants_hold_on_random_trace() {
    let curves = [
        AgingCurve::Linear,
        AgingCurve::SquareRoot,
        AgingCurve::CubeRoot,
        AgingCurve::Quadratic,
        AgingCurve::Cubic,
    ];
    for (seed, aging) in curves.into_iter().enumerate() {
        let mut wec = engine(random_config(aging));
        let trace = random_trace(seed as u64, 5_000, 400);

        for record in &trace {
            wec.ingest(record).unwrap();
            wec.check_invariants().unwrap();
        }

        let stats = wec.stats();
        assert_eq!(stats.hits + stats.misses, stats.requests);
        assert_eq!(stats.requests, trace.len() as u64);
        assert_eq!(stats.reads + stats.writes, stats.requests);
        assert_eq!(stats.ram_hits + stats.ssd_hits, stats.hits);
    }
}

#[test]
fn test_promotions_never_exceed_free_ssd_space() {
    let mut wec = engine(random_config(AgingCurve::Quadratic).with_update_period(1_000_000));
    let trace = random_trace(7, 4_000, 300);

    for (i, record) in trace.iter().enumerate() {
        wec.ingest(record).unwrap();
        if i % 50 == 0 {
            let free_before = wec.capacities().ssd - wec.ssd_len();
            let pool_before = wec.pool_len();
            let writes_before = wec.stats().ssd_writes;

            let cycle = wec.reconfigure().unwrap();

            // Purged pool blocks release their SSD slots for this cycle
            assert!(cycle.purged <= pool_before);
            assert_eq!(cycle.free, free_before + cycle.purged);
            assert!(cycle.promoted <= cycle.free);
            assert!(cycle.promoted <= cycle.selected);
            assert_eq!(wec.stats().ssd_writes - writes_before, cycle.promoted as u64);
            assert!(wec.ssd_len() <= wec.capacities().ssd);
        }
    }
    wec.check_invariants().unwrap();
}

#[test]
fn test_purged_pool_space_is_reused_in_same_cycle() {
    // RAM 2, SSD 2, window 2, quit threshold 4
    let mut wec = engine(
        WecConfig::new(4)
            .with_cache_ratio(1.0)
            .with_ram_ratio(0.5)
            .with_window_size(2)
            .with_promotion_threshold(1.0)
            .with_update_period(1_000_000),
    );
    assert_eq!(wec.capacities().quit_threshold, 4);

    read(&mut wec, 1);
    read(&mut wec, 2);
    let cycle = wec.reconfigure().unwrap();
    assert_eq!(cycle.promoted, 2);
    assert_eq!(wec.ssd_len(), 2);

    // Both SSD blocks fall into the pool with idle time 2
    read(&mut wec, 3);
    read(&mut wec, 4);
    assert_eq!(wec.pool_len(), 2);

    for _ in 0..2 {
        let cycle = wec.reconfigure().unwrap();
        assert_eq!(cycle.purged, 0);
        assert_eq!(cycle.free, 0);
        assert_eq!(cycle.selected, 2);
        assert_eq!(cycle.promoted, 0);
        assert_eq!(cycle.window_size, 2);
    }

    let writes_before = wec.stats().ssd_writes;
    let cycle = wec.reconfigure().unwrap();
    assert_eq!(cycle.purged, 2);
    assert_eq!(cycle.free, 2);
    assert_eq!(cycle.promoted, 2);
    assert_eq!(wec.stats().ssd_writes - writes_before, 2);
    assert_eq!(wec.pool_len(), 0);
    assert!(wec.record(1).is_none());
    assert!(wec.in_ssd(3));
    assert!(wec.in_ssd(4));
    assert_eq!(wec.ssd_len(), 2);
    assert_eq!(wec.ram_len(), 0);
    wec.check_invariants().unwrap();
}

#[test]
fn test_replay_is_deterministic() {
    let trace = random_trace(99, 10_000, 500);
    let run = || {
        let mut wec = engine(random_config(AgingCurve::SquareRoot));
        for record in &trace {
            wec.ingest(record).unwrap();
        }
        (*wec.stats(), wec.window_size(), wec.pool_len(), wec.ssd_len())
    };

    assert_eq!(run(), run());
}

#[test]
fn test_report_carries_capacities() {
    let mut wec = engine(WecConfig::default());
    read(&mut wec, 1);
    read(&mut wec, 1);

    let report = wec.report(Duration::from_millis(5));
    assert_eq!(report.policy, "WEC");
    assert_eq!(report.sizes.cache, 100);
    assert_eq!(report.sizes.window, Some(110));
    assert_eq!(report.sizes.quit_threshold, Some(100));
    assert_eq!(report.hit_ratio, 50.0);
    assert_eq!(report.summary_line(), "!WEC|100|1|2");
}
