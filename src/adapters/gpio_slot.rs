//! GPIO-backed slot adapter.
//!
//! Bundles one slot's [`RangeSensor`] and [`SlotIndicators`] behind
//! [`RangingPort`] and [`IndicatorPort`].  Generic over embedded-hal pins,
//! so the Raspberry Pi build plugs in `rppal` pins and tests plug in mocks.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::decision::ActuatorOutputs;
use crate::app::ports::{Clock, IndicatorPort, RangingPort};
use crate::drivers::indicators::SlotIndicators;
use crate::sensors::ultrasonic::{DistanceReading, RangeSensor};

pub struct GpioSlot<O, I, C> {
    sensor: RangeSensor<O, I, C>,
    indicators: SlotIndicators<O>,
}

impl<O, I, C> GpioSlot<O, I, C>
where
    O: OutputPin,
    I: InputPin,
    C: Clock,
{
    pub fn new(sensor: RangeSensor<O, I, C>, indicators: SlotIndicators<O>) -> Self {
        Self { sensor, indicators }
    }

    pub fn indicators(&self) -> &SlotIndicators<O> {
        &self.indicators
    }
}

impl<O, I, C> RangingPort for GpioSlot<O, I, C>
where
    O: OutputPin,
    I: InputPin,
    C: Clock,
{
    fn measure(&mut self) -> DistanceReading {
        self.sensor.measure()
    }
}

impl<O, I, C> IndicatorPort for GpioSlot<O, I, C>
where
    O: OutputPin,
    I: InputPin,
    C: Clock,
{
    fn apply(&mut self, outputs: &ActuatorOutputs) {
        self.indicators.set(outputs);
    }

    fn all_off(&mut self) {
        self.indicators.off();
    }
}
