use std::cmp::Ordering;

use bytes::Bytes;

use crate::search::partitioner::{partition_token, PartitionToken};

/// Slot state: either the raw partition key of a collected candidate (with
/// its token memoized) or the absent sentinel for documents that never had
/// the key field indexed
#[derive(Debug, Clone)]
enum Slot {
    Missing,
    Key { raw: Bytes, token: PartitionToken },
}

/// Reorders search candidates into the row store's partition-token order
/// during a bounded top-N collection pass.
///
/// Comparison is by token only, never by column-level type order; the absent
/// sentinel sorts before every present key in all comparisons. One instance
/// serves exactly one collection pass: the slot array is per-query state.
#[derive(Debug)]
pub struct TokenOrderComparator {
    slots: Vec<Slot>,
    bottom: Slot,
}

impl TokenOrderComparator {
    /// num_hits bounds the collector; one slot per retained candidate
    pub fn new(num_hits: usize) -> Self {
        TokenOrderComparator {
            slots: vec![Slot::Missing; num_hits],
            bottom: Slot::Missing,
        }
    }

    /// Record the candidate occupying a slot. None means the document has
    /// no partition key field.
    pub fn copy(&mut self, slot: usize, key: Option<&[u8]>) {
        self.slots[slot] = Self::slot_of(key);
    }

    /// Compare two retained candidates
    pub fn compare(&self, slot1: usize, slot2: usize) -> Ordering {
        Self::compare_slots(&self.slots[slot1], &self.slots[slot2])
    }

    /// Mark the slot currently holding the collection threshold
    pub fn set_bottom(&mut self, slot: usize) {
        self.bottom = self.slots[slot].clone();
    }

    /// Compare the threshold against an incoming candidate's key
    pub fn compare_bottom(&self, key: Option<&[u8]>) -> Ordering {
        Self::compare_slots(&self.bottom, &Self::slot_of(key))
    }

    /// Raw partition key retained in a slot, if any
    pub fn value(&self, slot: usize) -> Option<&Bytes> {
        match &self.slots[slot] {
            Slot::Missing => None,
            Slot::Key { raw, .. } => Some(raw),
        }
    }

    fn slot_of(key: Option<&[u8]>) -> Slot {
        match key {
            None => Slot::Missing,
            Some(raw) => Slot::Key {
                raw: Bytes::copy_from_slice(raw),
                token: partition_token(raw),
            },
        }
    }

    fn compare_slots(a: &Slot, b: &Slot) -> Ordering {
        match (a, b) {
            (Slot::Missing, Slot::Missing) => Ordering::Equal,
            (Slot::Missing, Slot::Key { .. }) => Ordering::Less,
            (Slot::Key { .. }, Slot::Missing) => Ordering::Greater,
            (Slot::Key { token: t1, .. }, Slot::Key { token: t2, .. }) => t1.cmp(t2),
        }
    }
}
