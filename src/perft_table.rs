//! A hash table of subtree node counts for [`perft_cached()`](crate::perft::perft_cached).

use tracing::debug;

use crate::zobrist::Zobrist64;

const DEPTH_SHIFT: u32 = 56;
const NODES_MASK: u64 = (1 << DEPTH_SHIFT) - 1;

/// Settings for a [`PerftTable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PerftTableConfig {
    /// Memory for the table in megabytes.
    pub size_mb: usize,
}

impl Default for PerftTableConfig {
    fn default() -> PerftTableConfig {
        PerftTableConfig { size_mb: 32 }
    }
}

/// One slot: the full key plus depth in the top 8 bits and node count in
/// the low 56 bits of `data`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct Entry {
    hash: u64,
    data: u64,
}

impl Entry {
    fn new(hash: Zobrist64, depth: u32, nodes: u64) -> Entry {
        Entry {
            hash: hash.0,
            data: (u64::from(depth.min(0xff)) << DEPTH_SHIFT) | (nodes & NODES_MASK),
        }
    }

    #[inline]
    fn depth(self) -> u32 {
        (self.data >> DEPTH_SHIFT) as u32
    }

    #[inline]
    fn nodes(self) -> u64 {
        self.data & NODES_MASK
    }
}

/// Fixed size, always-replace-if-deeper cache keyed by Zobrist hash.
///
/// A hit requires the full 64 bit key and the exact depth to match.
#[derive(Clone)]
pub struct PerftTable {
    entries: Vec<Entry>,
}

impl PerftTable {
    pub fn new(config: PerftTableConfig) -> PerftTable {
        let len = slots_for(config.size_mb);
        debug!(size_mb = config.size_mb, slots = len, "allocated perft table");
        PerftTable {
            entries: vec![Entry::default(); len],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`, the table has at least one slot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn slot(&self, hash: Zobrist64) -> usize {
        (hash.0 % self.entries.len() as u64) as usize
    }

    /// Looks up the node count stored for `hash` at `depth`.
    pub fn try_load(&self, hash: Zobrist64, depth: u32) -> Option<u64> {
        let entry = self.entries[self.slot(hash)];
        (entry.hash == hash.0 && entry.depth() == depth).then(|| entry.nodes())
    }

    /// Stores a node count unless the slot holds a deeper result.
    pub fn save(&mut self, hash: Zobrist64, depth: u32, nodes: u64) {
        let slot = self.slot(hash);
        if self.entries[slot].depth() <= depth {
            self.entries[slot] = Entry::new(hash, depth, nodes);
        }
    }

    /// Reallocates the table, dropping all entries.
    pub fn resize(&mut self, size_mb: usize) {
        let len = slots_for(size_mb);
        debug!(size_mb, slots = len, "resized perft table");
        self.entries = vec![Entry::default(); len];
    }

    pub fn clear(&mut self) {
        self.entries.fill(Entry::default());
    }
}

impl Default for PerftTable {
    fn default() -> PerftTable {
        PerftTable::new(PerftTableConfig::default())
    }
}

impl std::fmt::Debug for PerftTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerftTable")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

fn slots_for(size_mb: usize) -> usize {
    (size_mb * 1024 * 1024 / size_of::<Entry>()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_layout() {
        assert_eq!(size_of::<Entry>(), 16);
        let entry = Entry::new(Zobrist64(42), 7, 119_060_324);
        assert_eq!(entry.depth(), 7);
        assert_eq!(entry.nodes(), 119_060_324);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(PerftTable::new(PerftTableConfig { size_mb: 1 }).len(), 65536);
        assert_eq!(PerftTable::new(PerftTableConfig { size_mb: 0 }).len(), 1);
    }

    #[test]
    fn test_load_and_save() {
        let mut table = PerftTable::new(PerftTableConfig { size_mb: 0 });
        let a = Zobrist64(0x1234);
        let b = Zobrist64(0x5678);

        assert_eq!(table.try_load(a, 3), None);
        table.save(a, 3, 8902);
        assert_eq!(table.try_load(a, 3), Some(8902));
        assert_eq!(table.try_load(a, 2), None);
        assert_eq!(table.try_load(b, 3), None);

        // Shallower results do not evict deeper ones.
        table.save(b, 2, 400);
        assert_eq!(table.try_load(a, 3), Some(8902));
        assert_eq!(table.try_load(b, 2), None);

        table.save(b, 4, 197_281);
        assert_eq!(table.try_load(b, 4), Some(197_281));
        assert_eq!(table.try_load(a, 3), None);

        table.clear();
        assert_eq!(table.try_load(b, 4), None);
    }
}
