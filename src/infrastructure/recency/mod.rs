// Recency-ordered address queue backed by a linked hash map

use crate::infrastructure::hash::{AddressHashBuilder, address_hash_builder};
use crate::types::Address;
use linked_hash_map::LinkedHashMap;

/// Insertion/recency ordered set of addresses
///
/// The front holds the oldest entry, the back the most recent one. Every
/// operation is O(1).
pub struct RecencyQueue {
    entries: LinkedHashMap<Address, (), AddressHashBuilder>,
}

impl RecencyQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        RecencyQueue {
            entries: LinkedHashMap::with_hasher(address_hash_builder()),
        }
    }

    /// Number of queued addresses
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, address: Address) -> bool {
        self.entries.contains_key(&address)
    }

    /// Append an address at the back, moving it there if already queued.
    /// Returns true if the address was not queued before.
    pub fn push_back(&mut self, address: Address) -> bool {
        self.entries.insert(address, ()).is_none()
    }

    /// Move a queued address to the back. Returns false if it is not queued.
    pub fn touch(&mut self, address: Address) -> bool {
        self.entries.get_refresh(&address).is_some()
    }

    /// Remove an address. Returns false if it was not queued.
    pub fn remove(&mut self, address: Address) -> bool {
        self.entries.remove(&address).is_some()
    }

    /// Oldest address
    pub fn front(&self) -> Option<Address> {
        self.entries.front().map(|(address, _)| *address)
    }

    /// Remove and return the oldest address
    pub fn pop_front(&mut self) -> Option<Address> {
        self.entries.pop_front().map(|(address, _)| address)
    }

    /// Addresses from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for RecencyQueue {
    fn default() -> Self {
        Self::new()
    }
}
