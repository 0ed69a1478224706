//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! `log` facade (stderr via `env_logger` in the binary).  A CSV or MQTT
//! logger would implement the same trait.

use log::{info, warn};

use crate::app::decision::SlotState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::ultrasonic::DistanceReading;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Console line for one slot reading.
pub fn reading_line(
    slot_id: u8,
    reading: DistanceReading,
    state: SlotState,
    too_close: bool,
) -> String {
    match reading {
        DistanceReading::Distance(cm) => format!(
            "slot {}: {:.2} cm -> {}{}",
            slot_id,
            cm,
            state.label(),
            if too_close { " (too close)" } else { "" }
        ),
        DistanceReading::NoReading => format!("slot {}: reading failed", slot_id),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { slots } => {
                info!("START | monitoring {} slot(s)", slots);
            }
            AppEvent::SlotReading(s) => {
                info!("READ  | {}", reading_line(s.slot_id, s.reading, s.state, s.too_close));
            }
            AppEvent::StateChanged { slot_id, from, to } if *to == SlotState::Fault => {
                warn!("STATE | slot {}: {} -> {}", slot_id, from.label(), to.label());
            }
            AppEvent::StateChanged { slot_id, from, to } => {
                info!("STATE | slot {}: {} -> {}", slot_id, from.label(), to.label());
            }
            AppEvent::Stopped { ticks } => {
                info!("STOP  | outputs off after {} tick(s)", ticks);
            }
        }
    }
}
