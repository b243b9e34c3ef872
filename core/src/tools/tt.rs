//! Module for the `TranspositionTable`, a hash table mapping Zobrist keys to
//! previously-searched position information.
//!
//! A Transposition Table lets the searcher recognize a position it has already analyzed
//! (reached via a different move order) and reuse the score, best move, and depth found
//! last time instead of re-searching the subtree.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem;
use std::ptr::NonNull;

use core::piece_move::BitMove;

/// Value used to retrieve and store Entries.
pub type Key = u64;

/// BitMask for a [`NodeTypeTimeBound`]'s time data.
pub const TIME_MASK: u8 = 0b1111_1100;

/// BitMask for retrieving a [`NodeTypeTimeBound`]'s [`NodeBound`].
pub const NODE_TYPE_MASK: u8 = 0b0000_0011;

/// Number of Entries per Cluster.
pub const CLUSTER_SIZE: usize = 3;

const BYTES_PER_KB: usize = 1000;
const BYTES_PER_MB: usize = BYTES_PER_KB * 1000;
const BYTES_PER_GB: usize = BYTES_PER_MB * 1000;

/// Designates the type of Node in the search tree, i.e. whether its score is
/// exact or only a bound. See the chess programming wiki for more on PV node types.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum NodeBound {
    NoBound = 0,
    LowerBound = 1,
    UpperBound = 2,
    Exact = 3,
}

/// Packs the `NodeBound` of an entry alongside the search generation it was written in.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct NodeTypeTimeBound {
    data: u8,
}

impl NodeTypeTimeBound {
    /// Creates a `NodeTypeTimeBound` with the designated node_type and time.
    ///
    /// `time_bound` must be divisible by 4, or the node type bits will be clobbered.
    pub fn create(node_type: NodeBound, time_bound: u8) -> Self {
        NodeTypeTimeBound {
            data: time_bound + (node_type as u8),
        }
    }

    pub fn update_bound(&mut self, node_type: NodeBound) {
        self.data = (self.data & TIME_MASK) | node_type as u8;
    }

    pub fn update_time(&mut self, time_bound: u8) {
        self.data = (self.data & NODE_TYPE_MASK) | time_bound;
    }
}

/// A single slot in a `Cluster`: the best move found for a position, its score and
/// static evaluation, the depth that score was found at, and a partial Zobrist key
/// used to recognize the position without storing the full 64-bit key.
#[derive(Clone, PartialEq)]
pub struct Entry {
    pub partial_key: u16,
    pub best_move: BitMove,
    pub score: i16,
    pub eval: i16,
    pub depth: u8,
    pub time_node_bound: NodeTypeTimeBound,
}

impl Entry {
    pub fn is_empty(&self) -> bool {
        self.node_type() == NodeBound::NoBound
    }

    /// Overwrites this entry, keeping the previous best move if the new write is not
    /// for the same position and isn't an exact score.
    pub fn place(
        &mut self,
        key: Key,
        best_move: BitMove,
        score: i16,
        eval: i16,
        depth: u8,
        node_type: NodeBound,
    ) {
        let partial_key = key.wrapping_shr(48) as u16;

        if partial_key != self.partial_key {
            self.best_move = best_move;
        }

        if partial_key != self.partial_key || node_type == NodeBound::Exact {
            self.partial_key = partial_key;
            self.score = score;
            self.eval = eval;
            self.depth = depth;
            self.time_node_bound.update_bound(node_type);
        }
    }

    pub fn time(&self) -> u8 {
        self.time_node_bound.data & TIME_MASK
    }

    pub fn node_type(&self) -> NodeBound {
        match self.time_node_bound.data & NODE_TYPE_MASK {
            0 => NodeBound::NoBound,
            1 => NodeBound::LowerBound,
            2 => NodeBound::UpperBound,
            _ => NodeBound::Exact,
        }
    }

    /// A replacement-worthiness score: older, shallower entries are more replaceable.
    pub fn time_value(&self, curr_time: u8) -> u16 {
        let inner: u16 = ((259u16).wrapping_add(curr_time as u16))
            .wrapping_sub(self.time_node_bound.data as u16)
            & 0b1111_1100;
        (self.depth as u16).wrapping_sub(inner.wrapping_mul(2u16))
    }
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            partial_key: 0,
            best_move: BitMove::null(),
            score: 0,
            eval: 0,
            depth: 0,
            time_node_bound: NodeTypeTimeBound::create(NodeBound::NoBound, 0),
        }
    }
}

/// A bucket of entries all mapped to by the same index into the table; probing checks
/// every entry in the cluster before settling on a replacement victim.
pub struct Cluster {
    pub entry: [Entry; CLUSTER_SIZE],
}

/// Hash table mapping Zobrist keys to cached search results.
///
/// Not thread-safe by construction: the searcher this crate pairs with is single-worker
/// (see the crate's concurrency model), so the table is only ever accessed from one thread
/// at a time and carries no internal locking.
pub struct TT {
    clusters: NonNull<Cluster>,
    cap: usize,
    time_age: u8,
}

impl TT {
    /// Creates a table sized to roughly `mb_size` megabytes, rounded to the nearest power
    /// of two number of clusters.
    ///
    /// # Panics
    ///
    /// `mb_size` must be greater than 0.
    pub fn new(mb_size: usize) -> Self {
        TT::new_num_clusters((mb_size * BYTES_PER_MB) / mem::size_of::<Cluster>())
    }

    pub fn new_num_entries(num_entries: usize) -> Self {
        TT::new_num_clusters(num_entries * CLUSTER_SIZE)
    }

    pub fn new_num_clusters(num_clusters: usize) -> Self {
        TT::create(num_clusters.next_power_of_two().max(1))
    }

    fn create(size: usize) -> Self {
        assert_eq!(size.count_ones(), 1);
        assert!(size > 0);
        TT {
            clusters: alloc_room(size),
            cap: size,
            time_age: 0,
        }
    }

    pub fn size_kilobytes(&self) -> usize {
        (mem::size_of::<Cluster>() * self.cap) / BYTES_PER_KB
    }

    pub fn size_megabytes(&self) -> usize {
        (mem::size_of::<Cluster>() * self.cap) / BYTES_PER_MB
    }

    pub fn size_gigabytes(&self) -> usize {
        (mem::size_of::<Cluster>() * self.cap) / BYTES_PER_GB
    }

    pub fn num_clusters(&self) -> usize {
        self.cap
    }

    pub fn num_entries(&self) -> usize {
        self.cap * CLUSTER_SIZE
    }

    /// Re-sizes to `size` clusters (rounded up to a power of two) and discards all data.
    pub fn resize_round_up(&mut self, size: usize) {
        self.resize(size.next_power_of_two());
    }

    /// Re-sizes to roughly `mb_size` megabytes and discards all data. Returns the actual
    /// size in megabytes after rounding.
    pub fn resize_to_megabytes(&mut self, mb_size: usize) -> usize {
        let mut num_clusters: usize = (mb_size * BYTES_PER_MB) / mem::size_of::<Cluster>();
        num_clusters = num_clusters.next_power_of_two().max(1);
        self.resize(num_clusters);
        self.size_megabytes()
    }

    fn resize(&mut self, size: usize) {
        assert_eq!(size.count_ones(), 1);
        assert!(size > 0);
        self.de_alloc();
        self.cap = size;
        self.clusters = alloc_room(size);
    }

    /// Clears the entire table, keeping its current size.
    pub fn clear(&mut self) {
        let size = self.cap;
        self.resize(size);
    }

    /// Call at the start of each new search so stale entries become preferred
    /// replacement victims.
    pub fn new_search(&mut self) {
        self.time_age = self.time_age.wrapping_add(4);
    }

    pub fn time_age(&self) -> u8 {
        self.time_age
    }

    /// Probes the table for `key`. Returns `(true, entry)` if an entry for this exact
    /// position was found, or `(false, entry)` naming the best replacement victim in
    /// the relevant cluster (the shallowest / oldest entry).
    pub fn probe(&self, key: Key) -> (bool, &mut Entry) {
        let partial_key: u16 = key.wrapping_shr(48) as u16;

        unsafe {
            let cluster: *mut Cluster = self.cluster(key);
            let entries: *mut Entry = (*cluster).entry.as_mut_ptr();

            for i in 0..CLUSTER_SIZE {
                let entry_ptr: *mut Entry = entries.add(i);
                let entry: &mut Entry = &mut *entry_ptr;

                if entry.partial_key == 0 || entry.partial_key == partial_key {
                    if entry.time() != self.time_age && entry.partial_key != 0 {
                        entry.time_node_bound.update_time(self.time_age);
                    }
                    return (true, entry);
                }
            }

            let mut replacement: *mut Entry = entries;
            let mut replacement_score: u16 = (&*replacement).time_value(self.time_age);

            for i in 1..CLUSTER_SIZE {
                let entry_ptr: *mut Entry = entries.add(i);
                let entry_score: u16 = (&*entry_ptr).time_value(self.time_age);
                if entry_score < replacement_score {
                    replacement = entry_ptr;
                    replacement_score = entry_score;
                }
            }
            (false, &mut *replacement)
        }
    }

    fn cluster(&self, key: Key) -> *mut Cluster {
        let index: usize = ((self.num_clusters() - 1) as u64 & key) as usize;
        unsafe { self.clusters.as_ptr().add(index) }
    }

    fn de_alloc(&self) {
        unsafe {
            dealloc(
                self.clusters.as_ptr() as *mut u8,
                Layout::array::<Cluster>(self.cap).unwrap(),
            );
        }
    }
}

unsafe impl Send for TT {}
unsafe impl Sync for TT {}

impl Drop for TT {
    fn drop(&mut self) {
        self.de_alloc();
    }
}

fn alloc_room(size: usize) -> NonNull<Cluster> {
    let layout = Layout::array::<Cluster>(size).unwrap();
    unsafe {
        let ptr = alloc_zeroed(layout);
        match NonNull::new(ptr as *mut Cluster) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIRTY_MB: usize = 2 << 20;

    #[test]
    fn tt_alloc_realloc() {
        let size: usize = 8;
        let tt = TT::create(size);
        assert_eq!(tt.num_clusters(), size);

        let key = create_key(32, 44);
        let (_found, _entry) = tt.probe(key);
    }

    #[test]
    fn tt_test_sizes() {
        let tt = TT::new_num_clusters(100);
        assert_eq!(tt.num_clusters(), (100usize).next_power_of_two());
        assert_eq!(tt.num_entries(), (100usize).next_power_of_two() * CLUSTER_SIZE);
    }

    #[test]
    fn tt_basic_insert() {
        let tt = TT::new_num_clusters(THIRTY_MB);
        let partial_key_1: u16 = 17773;
        let key_index: u64 = 0x5556;

        let key_1 = create_key(partial_key_1, key_index);
        let (found, entry) = tt.probe(key_1);
        assert!(found);
        entry.partial_key = partial_key_1;
        entry.depth = 2;

        let (found, entry) = tt.probe(key_1);
        assert!(found);
        assert_eq!(entry.partial_key, partial_key_1);
        assert_eq!(entry.depth, 2);

        let partial_key_2: u16 = 8091;
        let partial_key_3: u16 = 12;
        let key_2: u64 = create_key(partial_key_2, key_index);
        let key_3: u64 = create_key(partial_key_3, key_index);

        let (found, entry) = tt.probe(key_2);
        assert!(found);
        assert!(entry.is_empty());
        entry.partial_key = partial_key_2;
        entry.depth = 3;

        let (found, entry) = tt.probe(key_3);
        assert!(found);
        assert!(entry.is_empty());
        entry.partial_key = partial_key_3;
        entry.depth = 6;

        let partial_key_4: u16 = 18;
        let key_4: u64 = create_key(partial_key_4, key_index);

        let (found, entry) = tt.probe(key_4);
        assert!(!found);
        assert_eq!(entry.partial_key, partial_key_1);
        assert_eq!(entry.depth, 2);
    }

    fn create_key(partial_key: u16, full_key: u64) -> u64 {
        (partial_key as u64).wrapping_shl(48) | (full_key & 0x0000_FFFF_FFFF_FFFF)
    }
}
