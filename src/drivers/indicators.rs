//! Red/green LED pair and buzzer of one slot.
//!
//! A dumb actuator: it writes whatever [`ActuatorOutputs`] it is handed,
//! translating through the outputs' polarity.  All three pins are rewritten
//! on every call; there is no diffing against the previous levels.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::decision::{ActuatorOutputs, OutputPolarity, PinLevels};
use crate::app::ports::IndicatorPort;
use crate::error::ActuatorError;

pub struct SlotIndicators<O> {
    red: O,
    green: O,
    buzzer: O,
    polarity: OutputPolarity,
    last: Option<PinLevels>,
}

impl<O: OutputPin> SlotIndicators<O> {
    pub fn new(red: O, green: O, buzzer: O, polarity: OutputPolarity) -> Self {
        Self {
            red,
            green,
            buzzer,
            polarity,
            last: None,
        }
    }

    pub fn set(&mut self, outputs: &ActuatorOutputs) {
        let levels = outputs.pin_levels();
        let results = [
            write(&mut self.red, levels.red),
            write(&mut self.green, levels.green),
            write(&mut self.buzzer, levels.buzzer),
        ];
        for (name, result) in ["red", "green", "buzzer"].into_iter().zip(results) {
            if let Err(e) = result {
                warn!("indicators: {} pin: {}", name, e);
            }
        }
        self.last = Some(levels);
    }

    pub fn off(&mut self) {
        self.set(&ActuatorOutputs::all_off(self.polarity));
    }

    /// Levels from the most recent write, if any.
    pub fn last_levels(&self) -> Option<PinLevels> {
        self.last
    }
}

fn write<O: OutputPin>(pin: &mut O, high: bool) -> Result<(), ActuatorError> {
    pin.set_state(PinState::from(high))
        .map_err(|_| ActuatorError::GpioWriteFailed)
}

impl<O: OutputPin> IndicatorPort for SlotIndicators<O> {
    fn apply(&mut self, outputs: &ActuatorOutputs) {
        self.set(outputs);
    }

    fn all_off(&mut self) {
        self.off();
    }
}
