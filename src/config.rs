//! System configuration parameters
//!
//! All tunable parameters for the slot monitor.  Loaded once at startup
//! through [`ConfigPort`](crate::app::ports::ConfigPort); nothing here
//! changes while the polling loop runs.

use serde::{Deserialize, Serialize};

use crate::app::decision::{OutputPolarity, SlotThresholds};
use crate::app::ports::ConfigError;
use crate::pins;
use crate::sensors::ultrasonic::RangingTiming;

/// Upper bound on monitored slots per process.
pub const MAX_SLOTS: usize = 4;

/// Which slot backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Raspberry Pi GPIO (needs the `rpi` feature).
    Hardware,
    /// Synthetic drifting distances; no GPIO access.
    #[default]
    Simulated,
}

/// Wiring of one monitored slot (BCM pin numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub id: u8,
    pub trigger_pin: u8,
    pub echo_pin: u8,
    pub red_led_pin: u8,
    pub green_led_pin: u8,
    pub buzzer_pin: u8,
    #[serde(default)]
    pub polarity: OutputPolarity,
}

impl SlotConfig {
    pub fn pins(&self) -> [u8; 5] {
        [
            self.trigger_pin,
            self.echo_pin,
            self.red_led_pin,
            self.green_led_pin,
            self.buzzer_pin,
        ]
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub backend: Backend,
    pub slots: Vec<SlotConfig>,

    // --- Thresholds ---
    pub thresholds: SlotThresholds,

    // --- Ranging ---
    /// Trigger-low settle pause before each ping (milliseconds)
    pub settle_ms: u32,
    /// Trigger pulse width (microseconds)
    pub trigger_pulse_us: u32,
    /// Bound on each echo wait phase (milliseconds)
    pub echo_timeout_ms: u32,

    // --- Timing ---
    /// Pause between polling ticks (milliseconds)
    pub poll_interval_ms: u32,

    // --- Simulation ---
    pub sim_min_cm: f32,
    pub sim_max_cm: f32,
    /// Drift per tick before jitter (cm)
    pub sim_step_cm: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            slots: vec![
                SlotConfig {
                    id: 1,
                    trigger_pin: pins::SLOT1_TRIGGER_GPIO,
                    echo_pin: pins::SLOT1_ECHO_GPIO,
                    red_led_pin: pins::SLOT1_RED_LED_GPIO,
                    green_led_pin: pins::SLOT1_GREEN_LED_GPIO,
                    buzzer_pin: pins::SLOT1_BUZZER_GPIO,
                    polarity: OutputPolarity::default(),
                },
                SlotConfig {
                    id: 2,
                    trigger_pin: pins::SLOT2_TRIGGER_GPIO,
                    echo_pin: pins::SLOT2_ECHO_GPIO,
                    red_led_pin: pins::SLOT2_RED_LED_GPIO,
                    green_led_pin: pins::SLOT2_GREEN_LED_GPIO,
                    buzzer_pin: pins::SLOT2_BUZZER_GPIO,
                    polarity: OutputPolarity::default(),
                },
            ],

            thresholds: SlotThresholds::default(),

            settle_ms: 200,
            trigger_pulse_us: 10,
            echo_timeout_ms: 100,

            poll_interval_ms: 500,

            sim_min_cm: 5.0,
            sim_max_cm: 60.0,
            sim_step_cm: 2.5,
        }
    }
}

impl MonitorConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !(t.too_close_below.is_finite() && t.occupied_below.is_finite()) {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if t.too_close_below <= 0.0 {
            return Err(ConfigError::ValidationFailed("too_close_below must be positive"));
        }
        if t.too_close_below >= t.occupied_below {
            return Err(ConfigError::ValidationFailed(
                "too_close_below must be below occupied_below",
            ));
        }

        if self.slots.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one slot is required"));
        }
        if self.slots.len() > MAX_SLOTS {
            return Err(ConfigError::ValidationFailed("too many slots"));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if self.slots[..i].iter().any(|s| s.id == slot.id) {
                return Err(ConfigError::ValidationFailed("duplicate slot id"));
            }
        }
        let mut all_pins: Vec<u8> = self.slots.iter().flat_map(SlotConfig::pins).collect();
        let total = all_pins.len();
        all_pins.sort_unstable();
        all_pins.dedup();
        if all_pins.len() != total {
            return Err(ConfigError::ValidationFailed("a GPIO pin is assigned twice"));
        }

        if self.echo_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("echo_timeout_ms must be non-zero"));
        }
        if self.trigger_pulse_us == 0 {
            return Err(ConfigError::ValidationFailed("trigger_pulse_us must be non-zero"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be non-zero"));
        }

        if !(self.sim_min_cm.is_finite() && self.sim_max_cm.is_finite()) {
            return Err(ConfigError::ValidationFailed("simulation bounds must be finite"));
        }
        if self.sim_min_cm < 0.0 || self.sim_min_cm >= self.sim_max_cm {
            return Err(ConfigError::ValidationFailed(
                "sim_min_cm must be in [0, sim_max_cm)",
            ));
        }
        if !self.sim_step_cm.is_finite() || self.sim_step_cm <= 0.0 {
            return Err(ConfigError::ValidationFailed("sim_step_cm must be positive"));
        }
        Ok(())
    }

    pub fn ranging_timing(&self) -> RangingTiming {
        RangingTiming {
            settle_ms: self.settle_ms,
            trigger_pulse_us: self.trigger_pulse_us,
            echo_timeout_us: u64::from(self.echo_timeout_ms) * 1_000,
        }
    }
}
