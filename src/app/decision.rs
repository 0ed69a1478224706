//! Threshold decision and output mapping for one slot.
//!
//! Purely combinational: the same reading always yields the same state and
//! outputs, with no hysteresis and no memory of earlier ticks.  A reading
//! that oscillates around a threshold makes the LEDs flicker; that is a known
//! limitation, not something this module smooths over.
//!
//! The decision works on logical booleans.  Translation to electrical levels
//! through each output's [`Polarity`] is a separate, pure final step
//! ([`ActuatorOutputs::pin_levels`]).

use serde::{Deserialize, Serialize};

use crate::sensors::ultrasonic::DistanceReading;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Per-installation distance cutoffs in centimetres.
///
/// Invariant: `too_close_below < occupied_below` (checked by
/// [`MonitorConfig::validate`](crate::config::MonitorConfig::validate)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotThresholds {
    /// Anything strictly closer than this counts as a parked vehicle.
    pub occupied_below: f32,
    /// Anything strictly closer than this sounds the buzzer.
    pub too_close_below: f32,
}

impl Default for SlotThresholds {
    fn default() -> Self {
        Self {
            occupied_below: 40.0,
            too_close_below: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Slot state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Not yet measured.
    #[default]
    Unknown,
    Occupied,
    Free,
    /// The last ranging attempt timed out.
    Fault,
}

impl SlotState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Occupied => "occupied",
            Self::Free => "free",
            Self::Fault => "fault",
        }
    }
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// Whether a logical "on" is an electrical HIGH or LOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Electrical level (`true` = HIGH) for a logical state.
    pub const fn level(self, on: bool) -> bool {
        match self {
            Self::ActiveHigh => on,
            Self::ActiveLow => !on,
        }
    }

    /// Logical state for an electrical level.  Inverse of [`level`](Self::level).
    pub const fn is_on(self, level: bool) -> bool {
        match self {
            Self::ActiveHigh => level,
            Self::ActiveLow => !level,
        }
    }
}

/// One polarity per output of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputPolarity {
    pub red: Polarity,
    pub green: Polarity,
    pub buzzer: Polarity,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Logical output commands for one slot, carrying the polarity needed to
/// drive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActuatorOutputs {
    pub red_led: bool,
    pub green_led: bool,
    pub buzzer: bool,
    pub polarity: OutputPolarity,
}

/// Electrical levels (`true` = HIGH) ready to be written to the pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinLevels {
    pub red: bool,
    pub green: bool,
    pub buzzer: bool,
}

impl ActuatorOutputs {
    /// Everything de-energised.
    pub const fn all_off(polarity: OutputPolarity) -> Self {
        Self {
            red_led: false,
            green_led: false,
            buzzer: false,
            polarity,
        }
    }

    pub const fn pin_levels(&self) -> PinLevels {
        PinLevels {
            red: self.polarity.red.level(self.red_led),
            green: self.polarity.green.level(self.green_led),
            buzzer: self.polarity.buzzer.level(self.buzzer),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Derive the slot state and output commands from one reading.
///
/// A failed reading is a fail-safe `Fault` with every output off, never the
/// last known good state.  Comparisons are strict, so a distance equal to a
/// threshold is "not occupied" / "not too close".
pub fn decide(
    reading: DistanceReading,
    thresholds: &SlotThresholds,
    polarity: OutputPolarity,
) -> (SlotState, ActuatorOutputs) {
    let DistanceReading::Distance(cm) = reading else {
        return (SlotState::Fault, ActuatorOutputs::all_off(polarity));
    };

    let occupied = cm < thresholds.occupied_below;
    let too_close = cm < thresholds.too_close_below;
    let state = if occupied {
        SlotState::Occupied
    } else {
        SlotState::Free
    };

    (
        state,
        ActuatorOutputs {
            red_led: occupied,
            green_led: !occupied,
            buzzer: too_close,
            polarity,
        },
    )
}
