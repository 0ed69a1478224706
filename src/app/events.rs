//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (console log today, a CSV or MQTT
//! logger later).

use crate::app::decision::SlotState;
use crate::app::snapshot::SlotSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started monitoring `slots` slots.
    Started { slots: usize },

    /// One slot was measured and actuated this tick.
    SlotReading(SlotSnapshot),

    /// A slot's derived state differs from its previous tick.
    StateChanged { slot_id: u8, from: SlotState, to: SlotState },

    /// Outputs were switched off and the loop is exiting.
    Stopped { ticks: u64 },
}
