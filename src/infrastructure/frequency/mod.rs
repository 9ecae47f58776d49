// Frequency-bucketed address index
//
// Addresses are grouped into buckets keyed by their access count. Buckets are
// kept in a BTreeMap so the coldest bucket is always first, and each bucket is
// a linked hash map so entries keep the order in which they entered it.

use crate::infrastructure::hash::{AddressHashBuilder, AddressMap, address_hash_builder, address_map};
use crate::types::Address;
use linked_hash_map::LinkedHashMap;
use std::collections::BTreeMap;

type Bucket = LinkedHashMap<Address, (), AddressHashBuilder>;

/// Access-count ordered index answering "coldest K" queries
///
/// Every address lives in exactly one bucket, the one matching the count it
/// was last inserted or relocated with.
pub struct FrequencyIndex {
    /// Access count -> addresses in arrival order
    buckets: BTreeMap<u64, Bucket>,
    /// Address -> access count of its bucket
    positions: AddressMap<u64>,
}

impl FrequencyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        FrequencyIndex {
            buckets: BTreeMap::new(),
            positions: address_map(),
        }
    }

    /// Number of indexed addresses
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn contains(&self, address: Address) -> bool {
        self.positions.contains_key(&address)
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Access count the address is filed under
    pub fn frequency_of(&self, address: Address) -> Option<u64> {
        self.positions.get(&address).copied()
    }

    /// File an address under `frequency`, at the back of that bucket.
    /// An address already indexed is moved out of its old bucket first.
    pub fn insert(&mut self, address: Address, frequency: u64) {
        if let Some(old) = self.positions.insert(address, frequency) {
            self.detach(address, old);
        }
        self.buckets
            .entry(frequency)
            .or_insert_with(|| LinkedHashMap::with_hasher(address_hash_builder()))
            .insert(address, ());
    }

    /// Move an indexed address to the bucket for `frequency`.
    /// Returns false, and does nothing, if the address is not indexed.
    pub fn relocate(&mut self, address: Address, frequency: u64) -> bool {
        if !self.contains(address) {
            return false;
        }
        self.insert(address, frequency);
        true
    }

    /// Remove an address, returning the count it was filed under
    pub fn remove(&mut self, address: Address) -> Option<u64> {
        let frequency = self.positions.remove(&address)?;
        self.detach(address, frequency);
        Some(frequency)
    }

    /// Up to `count` addresses, lowest access count first and arrival order
    /// within a bucket
    pub fn coldest(&self, count: usize) -> Vec<Address> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.keys().copied())
            .take(count)
            .collect()
    }

    /// Remove and return the coldest address with its count
    pub fn pop_coldest(&mut self) -> Option<(Address, u64)> {
        let mut entry = self.buckets.first_entry()?;
        let frequency = *entry.key();
        let (address, _) = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.positions.remove(&address);
        Some((address, frequency))
    }

    fn detach(&mut self, address: Address, frequency: u64) {
        if let Some(bucket) = self.buckets.get_mut(&frequency) {
            bucket.remove(&address);
            if bucket.is_empty() {
                self.buckets.remove(&frequency);
            }
        }
    }
}

impl Default for FrequencyIndex {
    fn default() -> Self {
        Self::new()
    }
}
