//! Monitor service: the hexagonal core and polling driver.
//!
//! [`MonitorService`] owns every monitored slot and the thresholds.  Each
//! tick it runs measure → decide → actuate for slot 1, then slot 2, and so
//! on, never interleaving slots.  Only after every slot is done does it
//! publish one [`MonitorSnapshot`] to the shared cache, so the served state
//! always describes a single tick.
//!
//! ```text
//!  RangingPort  ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                   │    MonitorService    │
//! IndicatorPort ◀── │  decide() per slot   │ ──▶ SnapshotCache
//!                   └──────────────────────┘
//! ```

use log::{error, info};

use crate::app::decision::{OutputPolarity, SlotState, SlotThresholds, decide};
use crate::config::MonitorConfig;
use crate::error::{Error, Result};

use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, RangingPort};
use super::snapshot::{MonitorSnapshot, SlotSnapshot, SnapshotCache};

/// One slot's hardware plus the bookkeeping the service needs for it.
pub struct MonitoredSlot<H> {
    pub id: u8,
    pub polarity: OutputPolarity,
    pub hw: H,
    last_state: SlotState,
}

impl<H> MonitoredSlot<H> {
    pub fn new(id: u8, polarity: OutputPolarity, hw: H) -> Self {
        Self {
            id,
            polarity,
            hw,
            last_state: SlotState::Unknown,
        }
    }

    /// State derived on the previous tick (`Unknown` before the first).
    pub fn last_state(&self) -> SlotState {
        self.last_state
    }
}

/// The application service orchestrates all domain logic.
pub struct MonitorService<H> {
    slots: Vec<MonitoredSlot<H>>,
    thresholds: SlotThresholds,
    cache: SnapshotCache,
    tick_count: u64,
}

impl<H: RangingPort + IndicatorPort> MonitorService<H> {
    /// Pair each configured slot with its hardware, in configuration order.
    ///
    /// `hardware` must yield exactly one item per `config.slots` entry.
    pub fn new(
        config: &MonitorConfig,
        hardware: impl IntoIterator<Item = H>,
        cache: SnapshotCache,
    ) -> Result<Self> {
        let hardware: Vec<H> = hardware.into_iter().collect();
        if hardware.len() != config.slots.len() {
            error!(
                "MonitorService: {} backend(s) for {} configured slot(s)",
                hardware.len(),
                config.slots.len()
            );
            return Err(Error::Init("backend count does not match slots"));
        }

        let slots = config
            .slots
            .iter()
            .zip(hardware)
            .map(|(slot, hw)| MonitoredSlot::new(slot.id, slot.polarity, hw))
            .collect();

        Ok(Self {
            slots,
            thresholds: config.thresholds,
            cache,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every output in a known "off" state before the first tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        for slot in &mut self.slots {
            slot.hw.all_off();
        }
        sink.emit(&AppEvent::Started {
            slots: self.slots.len(),
        });
        info!(
            "MonitorService started: {} slot(s), occupied<{:.1}cm, too_close<{:.1}cm",
            self.slots.len(),
            self.thresholds.occupied_below,
            self.thresholds.too_close_below
        );
    }

    /// Switch everything off on the way out.
    pub fn shutdown(&mut self, sink: &mut impl EventSink) {
        for slot in &mut self.slots {
            slot.hw.all_off();
        }
        sink.emit(&AppEvent::Stopped {
            ticks: self.tick_count,
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Measure, decide and actuate every slot in order, then publish.
    ///
    /// `now_ms` is the monotonic uptime stamped on this tick's snapshots.
    pub fn tick(&mut self, now_ms: u64, sink: &mut impl EventSink) -> MonitorSnapshot {
        self.tick_count += 1;

        let mut snapshot = MonitorSnapshot {
            tick: self.tick_count,
            slots: Vec::with_capacity(self.slots.len()),
        };
        let mut changes = Vec::new();

        for slot in &mut self.slots {
            let reading = slot.hw.measure();
            let (state, outputs) = decide(reading, &self.thresholds, slot.polarity);
            slot.hw.apply(&outputs);

            if state != slot.last_state {
                changes.push(AppEvent::StateChanged {
                    slot_id: slot.id,
                    from: slot.last_state,
                    to: state,
                });
                slot.last_state = state;
            }

            snapshot.slots.push(SlotSnapshot {
                slot_id: slot.id,
                timestamp_ms: now_ms,
                reading,
                state,
                too_close: outputs.buzzer,
                outputs,
            });
        }

        self.cache.publish(snapshot.clone());

        for slot in &snapshot.slots {
            sink.emit(&AppEvent::SlotReading(*slot));
        }
        for change in &changes {
            sink.emit(change);
        }

        snapshot
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn slots(&self) -> &[MonitoredSlot<H>] {
        &self.slots
    }

    /// Handle to the shared snapshot for concurrent readers.
    pub fn cache(&self) -> SnapshotCache {
        self.cache.clone()
    }
}
