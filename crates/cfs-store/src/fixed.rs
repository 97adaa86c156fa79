use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use cfs_types::{RecordId, DEFAULT_CAPACITY, MAX_CAPACITY};

use crate::error::{StoreError, StoreResult};
use crate::record::{ContentRecord, RecordRef};
use crate::traits::RecordStore;

/// Most static records a store accepts.
const STATIC_LIMIT: usize = u16::MAX as usize;

/// Preallocated, fixed-capacity content store.
///
/// All `capacity` records are created up front; `allocate` hands them out in
/// slot order behind a bump cursor. Slots are never returned.
pub struct FixedContentStore {
    slots: Box<[RecordRef]>,
    next_free: Mutex<usize>,
    statics: RwLock<Vec<RecordRef>>,
    creation_seed: AtomicI64,
}

impl FixedContentStore {
    /// Create a store with `capacity` slots, at most [`MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        if capacity > MAX_CAPACITY {
            warn!(capacity, max = MAX_CAPACITY, "store capacity clamped");
        }
        let slots = (0..capacity.min(MAX_CAPACITY))
            .map_while(|i| u32::try_from(i).ok())
            .map(|i| Arc::new(ContentRecord::new(RecordId::Slot(i), 0)))
            .collect();
        Self {
            slots,
            next_free: Mutex::new(0),
            statics: RwLock::new(Vec::new()),
            creation_seed: AtomicI64::new(0),
        }
    }

    /// Number of static records registered.
    pub fn static_count(&self) -> usize {
        self.statics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Records handed out so far, statics first, then slots in order.
    pub fn records(&self) -> Vec<RecordRef> {
        let mut all = self
            .statics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        all.extend(self.slots[..self.allocated()].iter().cloned());
        all
    }
}

impl Default for FixedContentStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecordStore for FixedContentStore {
    fn allocate(&self) -> StoreResult<RecordRef> {
        let mut next_free = self.next_free.lock().unwrap_or_else(PoisonError::into_inner);
        let capacity = self.slots.len();
        if *next_free >= capacity {
            warn!(capacity, "content store exhausted");
            return Err(StoreError::CapacityExceeded { capacity });
        }

        let record = Arc::clone(&self.slots[*next_free]);
        let seed = self.creation_seed();
        record.reset(seed);
        *next_free += 1;

        debug!(record = %record.id(), seed, remaining = capacity - *next_free, "allocated record");
        Ok(record)
    }

    fn register_static(&self) -> StoreResult<RecordRef> {
        let mut statics = self.statics.write().unwrap_or_else(PoisonError::into_inner);
        if statics.len() >= STATIC_LIMIT {
            return Err(StoreError::StaticLimit {
                limit: STATIC_LIMIT,
            });
        }
        let record = Arc::new(ContentRecord::new(RecordId::Static(statics.len() as u16), 0));
        statics.push(Arc::clone(&record));

        debug!(record = %record.id(), "registered static record");
        Ok(record)
    }

    fn get(&self, id: RecordId) -> Option<RecordRef> {
        match id {
            RecordId::Static(i) => self
                .statics
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(i as usize)
                .cloned(),
            RecordId::Slot(i) => {
                let i = i as usize;
                (i < self.allocated()).then(|| Arc::clone(&self.slots[i]))
            }
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn allocated(&self) -> usize {
        *self.next_free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn creation_seed(&self) -> i64 {
        self.creation_seed.load(Ordering::SeqCst)
    }

    fn reset_creation_seed(&self, seed: i64) {
        self.creation_seed.store(seed, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FixedContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedContentStore")
            .field("capacity", &self.capacity())
            .field("allocated", &self.allocated())
            .field("statics", &self.static_count())
            .finish()
    }
}
