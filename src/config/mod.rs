//! WEC configuration
//!
//! Holds the tunables of one WEC run and derives the tier capacities from
//! them. Validation happens once, before the engine is built.

pub mod error;

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Curve applied to the cache ratio when deriving the quit threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgingCurve {
    #[default]
    Linear,
    #[serde(alias = "square_root")]
    SquareRoot,
    #[serde(alias = "cube_root")]
    CubeRoot,
    Quadratic,
    Cubic,
}

impl AgingCurve {
    /// Applies the curve to a ratio in (0, 1]
    pub fn apply(self, ratio: f64) -> f64 {
        match self {
            AgingCurve::Linear => ratio,
            AgingCurve::SquareRoot => ratio.sqrt(),
            AgingCurve::CubeRoot => ratio.cbrt(),
            AgingCurve::Quadratic => ratio.powi(2),
            AgingCurve::Cubic => ratio.powi(3),
        }
    }
}

impl FromStr for AgingCurve {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(AgingCurve::Linear),
            "square-root" => Ok(AgingCurve::SquareRoot),
            "cube-root" => Ok(AgingCurve::CubeRoot),
            "quadratic" => Ok(AgingCurve::Quadratic),
            "cubic" => Ok(AgingCurve::Cubic),
            _ => Err(ConfigError::UnknownAgingCurve(s.to_string())),
        }
    }
}

impl fmt::Display for AgingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgingCurve::Linear => "linear",
            AgingCurve::SquareRoot => "square-root",
            AgingCurve::CubeRoot => "cube-root",
            AgingCurve::Quadratic => "quadratic",
            AgingCurve::Cubic => "cubic",
        };
        f.write_str(name)
    }
}

/// Tier sizes derived from a validated configuration, in blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacities {
    /// Backing store size
    pub hdd: usize,
    /// RAM + SSD
    pub cache: usize,
    pub ram: usize,
    pub ssd: usize,
    /// Initial admission window size
    pub window: usize,
    /// Idle-time limit for the second-chance pool
    pub quit_threshold: u64,
}

/// Tunables of a WEC run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WecConfig {
    /// Backing store capacity in blocks
    pub capacity: usize,
    /// Share of the cache given to RAM
    pub ram_ratio: f64,
    /// Cache size relative to the backing store
    pub cache_ratio: f64,
    /// Requests between two SSD reconfigurations
    pub update_period: u64,
    pub aging: AgingCurve,
    /// Fraction of the candidate index considered for promotion per cycle
    pub promotion_threshold: f64,
    /// Overrides the derived admission window size
    pub window_size: Option<usize>,
}

impl Default for WecConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ram_ratio: 0.5,
            cache_ratio: 0.1,
            update_period: 1000,
            aging: AgingCurve::Linear,
            promotion_threshold: 0.1,
            window_size: None,
        }
    }
}

impl WecConfig {
    /// Extra admission window room on top of the cache size, as a divisor
    const WINDOW_SLACK_DIVISOR: usize = 10;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ram_ratio(mut self, ratio: f64) -> Self {
        self.ram_ratio = ratio;
        self
    }

    pub fn with_cache_ratio(mut self, ratio: f64) -> Self {
        self.cache_ratio = ratio;
        self
    }

    pub fn with_update_period(mut self, period: u64) -> Self {
        self.update_period = period;
        self
    }

    pub fn with_aging(mut self, aging: AgingCurve) -> Self {
        self.aging = aging;
        self
    }

    pub fn with_promotion_threshold(mut self, threshold: f64) -> Self {
        self.promotion_threshold = threshold;
        self
    }

    pub fn with_window_size(mut self, window: usize) -> Self {
        self.window_size = Some(window);
        self
    }

    /// Loads a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Rejects configurations that cannot produce a meaningful run
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidArgument(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if !(self.cache_ratio.is_finite() && self.cache_ratio > 0.0 && self.cache_ratio <= 1.0) {
            return Err(ConfigError::InvalidRatio {
                name: "cache ratio",
                value: self.cache_ratio,
            });
        }
        if !(self.ram_ratio.is_finite() && (0.0..=1.0).contains(&self.ram_ratio)) {
            return Err(ConfigError::InvalidRatio {
                name: "RAM ratio",
                value: self.ram_ratio,
            });
        }
        if !(self.promotion_threshold.is_finite()
            && self.promotion_threshold > 0.0
            && self.promotion_threshold <= 1.0)
        {
            return Err(ConfigError::InvalidRatio {
                name: "promotion threshold",
                value: self.promotion_threshold,
            });
        }
        if self.update_period == 0 {
            return Err(ConfigError::InvalidArgument(
                "update period must be greater than zero".to_string(),
            ));
        }
        if self.cache_size() == 0 {
            return Err(ConfigError::InvalidArgument(format!(
                "cache size rounds to zero (capacity {} x ratio {})",
                self.capacity, self.cache_ratio
            )));
        }
        Ok(())
    }

    fn cache_size(&self) -> usize {
        (self.capacity as f64 * self.cache_ratio) as usize
    }

    /// Derives the tier sizes. Call after `validate`.
    pub fn capacities(&self) -> Capacities {
        let cache = self.cache_size();
        let ram = (cache as f64 * self.ram_ratio) as usize;
        let ssd = cache - ram;
        let window = match self.window_size {
            Some(window) => window.max(ram),
            None => cache + cache / Self::WINDOW_SLACK_DIVISOR,
        };
        let quit_threshold = (self.capacity as f64 * self.aging.apply(self.cache_ratio)) as u64;

        Capacities {
            hdd: self.capacity,
            cache,
            ram,
            ssd,
            window,
            quit_threshold,
        }
    }
}
