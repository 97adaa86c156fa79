use cfs_types::RecordId;

use crate::error::StoreResult;
use crate::record::RecordRef;

/// Allocator and owner of content records.
///
/// All implementations must satisfy these invariants:
/// - A record handed out by `allocate` or `register_static` lives as long as
///   the store; there is no deallocation.
/// - Concurrent `allocate` calls never return the same slot.
/// - `allocated()` never exceeds `capacity()`.
pub trait RecordStore: Send + Sync {
    /// Hand out the next free slot, initialized to counter mode with the
    /// current creation seed as its counter.
    ///
    /// Returns `Err(StoreError::CapacityExceeded)` once every slot is used.
    fn allocate(&self) -> StoreResult<RecordRef>;

    /// Register a record outside the slot array, starting at zero.
    fn register_static(&self) -> StoreResult<RecordRef>;

    /// Look up a record previously handed out.
    fn get(&self, id: RecordId) -> Option<RecordRef>;

    /// Total number of slots.
    fn capacity(&self) -> usize;

    /// Number of slots handed out so far.
    fn allocated(&self) -> usize;

    /// Counter value that newly allocated records start from.
    fn creation_seed(&self) -> i64;

    /// Replace the creation seed. Records already allocated keep their own
    /// counters.
    fn reset_creation_seed(&self, seed: i64);

    /// Number of slots still free.
    fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.allocated())
    }
}
