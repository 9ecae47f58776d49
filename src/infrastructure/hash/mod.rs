// Deterministic hashing for address-keyed maps

use crate::types::Address;
use std::collections::{HashMap, HashSet};
use xxhash_rust::xxh64::Xxh64Builder;

/// Seed shared by every address map so iteration never depends on the process
pub const ADDRESS_HASH_SEED: u64 = 0;

/// Hash builder for address keys (XXH64 with a fixed seed)
pub type AddressHashBuilder = Xxh64Builder;

/// Hash map keyed by block address
pub type AddressMap<V> = HashMap<Address, V, AddressHashBuilder>;

/// Hash set of block addresses
pub type AddressSet = HashSet<Address, AddressHashBuilder>;

/// Returns the fixed-seed hash builder
#[inline]
pub fn address_hash_builder() -> AddressHashBuilder {
    Xxh64Builder::new(ADDRESS_HASH_SEED)
}

/// Creates an empty address map
#[inline]
pub fn address_map<V>() -> AddressMap<V> {
    HashMap::with_hasher(address_hash_builder())
}

/// Creates an empty address set
#[inline]
pub fn address_set() -> AddressSet {
    HashSet::with_hasher(address_hash_builder())
}
