// Shared address-keyed data structures

pub mod frequency;
pub mod hash;
pub mod recency;
