//! LIFO ring buffers of HID shared memory.
//!
//! Every input device publishes its state history to the guest as a ring buffer of
//! [`LIFO_ENTRY_COUNT`] entries preceded by a [`CommonLifoHeader`]. The service appends
//! entries with [`push_state`]; the guest walks the ring backwards from `tail` with the
//! algorithm implemented by [`get_states`].
//!
//! The guest relies on two properties of each entry to detect torn or stale reads:
//! - `sampling_number` grows by exactly one per appended entry
//! - Entries that carry a second sampling number keep both numbers equal

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, little_endian::U64};

/// Number of entries in every HID LIFO.
pub const LIFO_ENTRY_COUNT: usize = 17;

/// Maximum number of valid entries the `count` field reports.
pub const LIFO_MAX_VALID_ENTRIES: u64 = LIFO_ENTRY_COUNT as u64 - 1;

/// Common LIFO header for all HID input types.
///
/// This structure is at the start of each LIFO buffer in shared memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CommonLifoHeader {
    /// System counter value at the last append
    pub timestamp: U64,
    /// Capacity of the ring
    pub buffer_count: U64,
    /// Index of the newest entry
    pub tail: U64,
    /// Number of valid entries
    pub count: U64,
}

impl CommonLifoHeader {
    /// Advance the ring by one slot without touching entry storage.
    ///
    /// Returns the index of the slot that just became the newest entry.
    pub fn advance(&mut self, timestamp: u64, buffer_count: usize) -> usize {
        let tail = (self.tail.get() + 1) % buffer_count as u64;
        self.timestamp.set(timestamp);
        self.buffer_count.set(buffer_count as u64);
        self.tail.set(tail);
        self.count
            .set((self.count.get() + 1).min(buffer_count as u64 - 1));
        tail as usize
    }

    /// Mark the ring as holding no valid entries.
    pub fn clear(&mut self, timestamp: u64, buffer_count: usize) {
        self.timestamp.set(timestamp);
        self.buffer_count.set(buffer_count as u64);
        self.tail.set(0);
        self.count.set(0);
    }
}

/// Entry types that can be stored in a HID LIFO.
pub trait LifoState: Copy {
    /// Extract the sampling number from the state for consistency checking.
    fn sampling_number(&self) -> u64;

    /// Stamp the state with its sampling number.
    fn set_sampling_number(&mut self, sampling_number: u64);
}

/// Append `state` to the ring described by `header` and `storage`.
///
/// The new entry's sampling number is the previous newest entry's plus one.
pub fn push_state<T: LifoState>(
    header: &mut CommonLifoHeader,
    storage: &mut [T],
    timestamp: u64,
    mut state: T,
) {
    let previous = storage[header.tail.get() as usize % storage.len()].sampling_number();
    let tail = header.advance(timestamp, storage.len());

    state.set_sampling_number(previous.wrapping_add(1));
    storage[tail] = state;
}

/// Read states from a LIFO ring buffer snapshot.
///
/// This function implements the reading algorithm used by libnx:
/// 1. Load tail and count
/// 2. Calculate position: (tail + max_states + 1 - count + i) % max_states
/// 3. Read from oldest to newest, output in reverse (newest first)
/// 4. Check sampling numbers for sequential order
///
/// # Arguments
///
/// * `header` - LIFO header containing tail and count
/// * `storage` - Ring buffer storage array
/// * `out` - Output buffer for states (most recent first)
///
/// # Returns
///
/// Number of states read (may be less than `out.len()`), or zero if the snapshot is not
/// consistent.
pub fn get_states<T: LifoState>(header: &CommonLifoHeader, storage: &[T], out: &mut [T]) -> usize {
    let max_states = storage.len() as u64;
    let tail = header.tail.get();
    let count = header.count.get().min(header.buffer_count.get());

    let total_entries = count.min(out.len() as u64).min(max_states);
    if total_entries == 0 || tail >= max_states {
        return 0;
    }

    let mut prev_sampling = 0u64;

    // Read from oldest to newest
    for i in 0..total_entries {
        let entrypos = ((tail + max_states + 1 - total_entries) + i) % max_states;
        let state = storage[entrypos as usize];
        let curr_sampling = state.sampling_number();

        if i > 0 && curr_sampling.wrapping_sub(prev_sampling) != 1 {
            return 0;
        }

        // Output in reverse order (newest first)
        out[(total_entries - 1 - i) as usize] = state;
        prev_sampling = curr_sampling;
    }

    total_entries as usize
}
