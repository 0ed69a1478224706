//! Shared last-known state for presentation collaborators.
//!
//! The polling loop is the only writer; dashboards and other readers may
//! sit on other threads.  The whole snapshot and the per-slot history are
//! guarded by one lock, and both reads and writes take it for the entire
//! snapshot, so a reader never sees slot 1 from one tick and slot 2 from
//! the next.

use std::sync::Arc;

use heapless::HistoryBuffer;
use parking_lot::Mutex;
use serde::Serialize;

use crate::app::decision::{ActuatorOutputs, SlotState};
use crate::sensors::ultrasonic::DistanceReading;

/// Readings kept per slot.
pub const HISTORY_LEN: usize = 20;

/// One slot's outcome for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotSnapshot {
    pub slot_id: u8,
    /// Monotonic uptime at the start of the tick.
    pub timestamp_ms: u64,
    pub reading: DistanceReading,
    pub state: SlotState,
    pub too_close: bool,
    pub outputs: ActuatorOutputs,
}

/// Every slot's outcome for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub tick: u64,
    pub slots: Vec<SlotSnapshot>,
}

impl MonitorSnapshot {
    pub fn slot(&self, slot_id: u8) -> Option<&SlotSnapshot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }
}

/// Entry in a slot's reading history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingRecord {
    pub timestamp_ms: u64,
    pub reading: DistanceReading,
    pub state: SlotState,
}

struct CacheInner {
    latest: MonitorSnapshot,
    history: Vec<(u8, HistoryBuffer<ReadingRecord, HISTORY_LEN>)>,
}

/// Cloneable handle to the shared snapshot.
#[derive(Clone)]
pub struct SnapshotCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                latest: MonitorSnapshot::default(),
                history: Vec::new(),
            })),
        }
    }

    /// Replace the latest snapshot and append to each slot's history in one
    /// critical section.
    pub fn publish(&self, snapshot: MonitorSnapshot) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        for slot in &snapshot.slots {
            let record = ReadingRecord {
                timestamp_ms: slot.timestamp_ms,
                reading: slot.reading,
                state: slot.state,
            };
            match inner.history.iter_mut().find(|(id, _)| *id == slot.slot_id) {
                Some((_, ring)) => ring.write(record),
                None => {
                    let mut ring = HistoryBuffer::new();
                    ring.write(record);
                    inner.history.push((slot.slot_id, ring));
                }
            }
        }
        inner.latest = snapshot;
    }

    /// Copy of the whole latest snapshot.
    pub fn latest(&self) -> MonitorSnapshot {
        self.inner.lock().latest.clone()
    }

    /// A slot's recent readings, oldest first.
    pub fn history(&self, slot_id: u8) -> Vec<ReadingRecord> {
        let inner = self.inner.lock();
        inner
            .history
            .iter()
            .find(|(id, _)| *id == slot_id)
            .map(|(_, ring)| ring.oldest_ordered().copied().collect())
            .unwrap_or_default()
    }

    /// Latest snapshot as JSON, for dashboards.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let snapshot = self.latest();
        serde_json::to_string(&snapshot)
    }
}
