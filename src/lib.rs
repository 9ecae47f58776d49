//! wecsim: trace-driven simulator for multi-tier (RAM/SSD/HDD) cache policies

// Global type definitions
pub mod types;

// Import various modules
pub mod config;
pub mod infrastructure;
pub mod policy;
pub mod sim;
pub mod trace;
pub mod wec;

// Re-export the common entry points
pub use config::{AgingCurve, WecConfig};
pub use policy::{Policy, PolicyKind};
pub use types::{SimError, SimResult, TraceRecord};
pub use wec::WecEngine;
