//! HC-SR04 ultrasonic ranging driver.
//!
//! Time-of-flight measurement over a trigger/echo GPIO pair:
//!
//! 1. Trigger LOW, then a 200 ms settle pause.  Much longer than the
//!    datasheet's 2 µs; two sensors on one supply rail cross-talk otherwise.
//! 2. Trigger HIGH for 10 µs, then LOW.
//! 3. Spin while echo is LOW, remembering the time of the last LOW sample.
//! 4. Spin while echo is HIGH, remembering the time of the last HIGH sample.
//! 5. `distance = Δt · 34300 cm/s / 2`, rounded to 0.01 cm.
//!
//! Both timestamps are the last sample taken *before* the edge, so the
//! result carries up to one poll interval of quantisation error.  Either
//! spin reaching `echo_timeout_us` aborts with [`DistanceReading::NoReading`];
//! the caller cannot tell "echo never rose" from "echo never fell".
//!
//! No retries happen here.  Retry policy, if any, belongs to the polling
//! driver.
//!
//! ## Dual-target design
//!
//! The driver is generic over embedded-hal pins and a [`Clock`], so the same
//! code runs against `rppal` pins on the Pi and scripted pins in tests.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{Clock, RangingPort};
use crate::error::{ActuatorError, Error, SensorError};

/// Speed of sound at ~20 °C.
pub const SPEED_OF_SOUND_CM_PER_S: f64 = 34_300.0;

/// Result of one ranging attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cm", rename_all = "snake_case")]
pub enum DistanceReading {
    /// Distance in centimetres, rounded to two decimals.
    Distance(f32),
    /// Ranging timed out (the failure sentinel).
    NoReading,
}

impl DistanceReading {
    pub fn cm(self) -> Option<f32> {
        match self {
            Self::Distance(cm) => Some(cm),
            Self::NoReading => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Distance(_))
    }
}

/// Timing parameters of the ranging protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangingTiming {
    /// Trigger-low settle pause before each ping.
    pub settle_ms: u32,
    /// Width of the trigger pulse.
    pub trigger_pulse_us: u32,
    /// Bound on each echo spin.  Reaching it (inclusive) is a timeout.
    pub echo_timeout_us: u64,
}

impl Default for RangingTiming {
    fn default() -> Self {
        Self {
            settle_ms: 200,
            trigger_pulse_us: 10,
            echo_timeout_us: 100_000,
        }
    }
}

/// Convert an echo pulse width to centimetres, rounded to 0.01 cm.
pub fn echo_width_to_cm(width_us: u64) -> f32 {
    let secs = width_us as f64 / 1_000_000.0;
    let cm = secs * SPEED_OF_SOUND_CM_PER_S / 2.0;
    ((cm * 100.0).round() / 100.0) as f32
}

/// HC-SR04 driver over one trigger/echo pair.
pub struct RangeSensor<T, E, C> {
    trigger: T,
    echo: E,
    clock: C,
    timing: RangingTiming,
}

impl<T, E, C> RangeSensor<T, E, C>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
{
    pub fn new(trigger: T, echo: E, clock: C, timing: RangingTiming) -> Self {
        Self {
            trigger,
            echo,
            clock,
            timing,
        }
    }

    /// Run one ranging attempt.  Never fails: every failure mode is folded
    /// into [`DistanceReading::NoReading`].
    pub fn measure(&mut self) -> DistanceReading {
        match self.try_measure() {
            Ok(cm) => DistanceReading::Distance(cm),
            Err(Error::Sensor(SensorError::RangingTimeout)) => {
                debug!("ultrasonic: echo wait timed out");
                DistanceReading::NoReading
            }
            Err(e) => {
                warn!("ultrasonic: ranging aborted: {}", e);
                DistanceReading::NoReading
            }
        }
    }

    fn try_measure(&mut self) -> crate::error::Result<f32> {
        self.fire_trigger()?;

        let entry = self.clock.now_us();
        let start = self.spin_while(false, entry)?;
        let end = self.spin_while(true, start)?;

        Ok(echo_width_to_cm(end.saturating_sub(start)))
    }

    fn fire_trigger(&mut self) -> Result<(), ActuatorError> {
        self.trigger
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.clock.delay_ms(self.timing.settle_ms);

        self.trigger
            .set_high()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.clock.delay_us(self.timing.trigger_pulse_us);
        self.trigger
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)
    }

    /// Spin while echo reads `high`.  Returns the time of the last sample
    /// taken at that level, or `anchor_us` if the first sample already
    /// differed.
    fn spin_while(&mut self, high: bool, anchor_us: u64) -> Result<u64, SensorError> {
        let mut last = anchor_us;
        while self.echo_is(high)? {
            last = self.clock.now_us();
            if last.saturating_sub(anchor_us) >= self.timing.echo_timeout_us {
                return Err(SensorError::RangingTimeout);
            }
        }
        Ok(last)
    }

    fn echo_is(&mut self, high: bool) -> Result<bool, SensorError> {
        self.echo
            .is_high()
            .map(|level| level == high)
            .map_err(|_| SensorError::GpioReadFailed)
    }
}

impl<T, E, C> RangingPort for RangeSensor<T, E, C>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
{
    fn measure(&mut self) -> DistanceReading {
        RangeSensor::measure(self)
    }
}
