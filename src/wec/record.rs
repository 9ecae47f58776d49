// Block records and the arena that owns them

use crate::infrastructure::hash::{AddressMap, address_map};
use crate::types::{Address, Sequence, Tier};

/// Per-address cache metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRecord {
    pub address: Address,
    pub tier: Tier,
    pub access_count: u64,
    /// Request sequence number of the latest access
    pub last_access: Sequence,
    /// Periodic ticks spent in the second-chance pool
    pub idle_time: u64,
}

impl BlockRecord {
    /// Record for a block seen for the first time; it starts in RAM
    pub fn new(address: Address, seq: Sequence) -> Self {
        BlockRecord {
            address,
            tier: Tier::Ram,
            access_count: 1,
            last_access: seq,
            idle_time: 0,
        }
    }

    /// Register an access and return the new access count
    #[inline]
    pub fn touch(&mut self, seq: Sequence) -> u64 {
        self.access_count += 1;
        self.last_access = seq;
        self.access_count
    }
}

/// Single owner of every block record, keyed by address
///
/// The window, pool, views and candidate index only store addresses; all
/// record state lives here.
pub struct BlockArena {
    records: AddressMap<BlockRecord>,
}

impl BlockArena {
    pub fn new() -> Self {
        BlockArena {
            records: address_map(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn get(&self, address: Address) -> Option<&BlockRecord> {
        self.records.get(&address)
    }

    #[inline]
    pub fn get_mut(&mut self, address: Address) -> Option<&mut BlockRecord> {
        self.records.get_mut(&address)
    }

    /// Insert a record. Returns false, leaving the arena untouched, if the
    /// address already has one.
    pub fn insert(&mut self, record: BlockRecord) -> bool {
        if self.records.contains_key(&record.address) {
            return false;
        }
        self.records.insert(record.address, record);
        true
    }

    pub fn remove(&mut self, address: Address) -> Option<BlockRecord> {
        self.records.remove(&address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockRecord> + '_ {
        self.records.values()
    }
}

impl Default for BlockArena {
    fn default() -> Self {
        Self::new()
    }
}
