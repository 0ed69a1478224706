//! Simulated slot backend.
//!
//! Stands in for a sensor + indicator set when no GPIO is available.  The
//! distance drifts by a fixed step plus ±1 cm of jitter each tick and bounces
//! between the configured bounds, so over a few dozen ticks every slot passes
//! through free, occupied and too-close.  Indicator writes are kept in memory.
//!
//! Chosen explicitly with `backend = "simulated"`; nothing falls back to it
//! when hardware init fails.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::decision::{ActuatorOutputs, OutputPolarity, PinLevels};
use crate::app::ports::{IndicatorPort, RangingPort};
use crate::config::{MonitorConfig, SlotConfig};
use crate::sensors::ultrasonic::DistanceReading;

pub struct SimulatedSlot {
    slot_id: u8,
    value_cm: f32,
    direction: f32,
    min_cm: f32,
    max_cm: f32,
    step_cm: f32,
    rng: StdRng,
    polarity: OutputPolarity,
    levels: Option<PinLevels>,
}

impl SimulatedSlot {
    pub fn new(slot: &SlotConfig, config: &MonitorConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let value_cm = rng.gen_range(config.sim_min_cm..config.sim_max_cm);
        Self {
            slot_id: slot.id,
            value_cm,
            direction: 1.0,
            min_cm: config.sim_min_cm,
            max_cm: config.sim_max_cm,
            step_cm: config.sim_step_cm,
            rng,
            polarity: slot.polarity,
            levels: None,
        }
    }

    /// One simulated backend per configured slot, each with its own seed.
    pub fn for_config(config: &MonitorConfig, seed: u64) -> Vec<Self> {
        config
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| Self::new(slot, config, seed.wrapping_add(i as u64)))
            .collect()
    }

    /// Pin levels from the most recent indicator write.
    pub fn levels(&self) -> Option<PinLevels> {
        self.levels
    }

    fn advance(&mut self) -> f32 {
        let jitter: f32 = self.rng.gen_range(-1.0..=1.0);
        self.value_cm += self.step_cm * self.direction + jitter;
        if self.value_cm >= self.max_cm {
            self.value_cm = self.max_cm;
            self.direction = -1.0;
        } else if self.value_cm <= self.min_cm {
            self.value_cm = self.min_cm;
            self.direction = 1.0;
        }
        (self.value_cm * 100.0).round() / 100.0
    }
}

impl RangingPort for SimulatedSlot {
    fn measure(&mut self) -> DistanceReading {
        let cm = self.advance();
        debug!("sim: slot {} -> {:.2} cm", self.slot_id, cm);
        DistanceReading::Distance(cm)
    }
}

impl IndicatorPort for SimulatedSlot {
    fn apply(&mut self, outputs: &ActuatorOutputs) {
        self.levels = Some(outputs.pin_levels());
    }

    fn all_off(&mut self) {
        self.levels = Some(ActuatorOutputs::all_off(self.polarity).pin_levels());
    }
}
