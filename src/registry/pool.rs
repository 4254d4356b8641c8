// src/registry/pool.rs

//! Bounded reuse pool for hint records.
//!
//! Pre-filled to capacity with inert records at construction. Under sustained
//! hint churn the pool amortizes allocation at the cost of a fixed memory
//! floor. A record is exactly one of idle-in-pool or live-in-one-store at any
//! instant; reset happens atomically with the release enqueue so no caller
//! can observe a half-reset record.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::stats::HintCounters;
use crate::hint::HintRecord;

pub struct RecordPool {
    records: Mutex<VecDeque<HintRecord>>,
    capacity: usize,
    counters: Arc<HintCounters>,
}

impl RecordPool {
    /// Creates a pool pre-filled with `capacity` inert records.
    pub fn new(capacity: usize, counters: Arc<HintCounters>) -> Self {
        let mut records = VecDeque::with_capacity(capacity);
        for _ in 0..capacity {
            records.push_back(HintRecord::inert());
        }
        Self {
            records: Mutex::new(records),
            capacity,
            counters,
        }
    }

    /// Dequeues an idle record if one is available. Never blocks; `None`
    /// is a normal outcome and the caller constructs a fresh record.
    pub fn acquire(&self) -> Option<HintRecord> {
        let taken = self.records.lock().pop_front();
        match taken {
            Some(record) => {
                self.counters.record_pool_hit();
                Some(record)
            }
            None => {
                self.counters.record_pool_miss();
                None
            }
        }
    }

    /// Returns a record to the pool, resetting it to the inert state first.
    /// Discarded outright if the pool is already at capacity.
    pub fn release(&self, mut record: HintRecord) {
        let mut records = self.records.lock();
        if records.len() < self.capacity {
            record.reset();
            records.push_back(record);
        }
        // At capacity: drop on the floor, the pool never grows.
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
