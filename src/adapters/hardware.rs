//! Raspberry Pi hardware adapter.
//!
//! Claims each slot's five BCM pins through `rppal` and wires them into a
//! [`GpioSlot`].  This is the only module that touches real GPIO.  Pins
//! are claimed once at startup; `rppal` resets them to their previous mode
//! when dropped.

use log::{error, info};
use rppal::gpio::{Gpio, InputPin, OutputPin};

use crate::adapters::gpio_slot::GpioSlot;
use crate::adapters::time::SystemClock;
use crate::config::{MonitorConfig, SlotConfig};
use crate::drivers::indicators::SlotIndicators;
use crate::error::{Error, Result};
use crate::sensors::ultrasonic::{RangeSensor, RangingTiming};

pub type PiSlot = GpioSlot<OutputPin, InputPin, SystemClock>;

/// Claim the pins of every configured slot, in configuration order.
pub fn open_slots(config: &MonitorConfig, clock: SystemClock) -> Result<Vec<PiSlot>> {
    let gpio = Gpio::new().map_err(|e| {
        error!("hardware: GPIO controller unavailable: {}", e);
        Error::Init("GPIO controller unavailable")
    })?;

    let timing = config.ranging_timing();
    config
        .slots
        .iter()
        .map(|slot| open_slot(&gpio, slot, timing, clock))
        .collect()
}

fn open_slot(
    gpio: &Gpio,
    slot: &SlotConfig,
    timing: RangingTiming,
    clock: SystemClock,
) -> Result<PiSlot> {
    let output = |pin: u8| -> Result<OutputPin> {
        gpio.get(pin).map(|p| p.into_output_low()).map_err(|e| {
            error!("hardware: slot {} GPIO{}: {}", slot.id, pin, e);
            Error::Init("output pin unavailable")
        })
    };

    let trigger = output(slot.trigger_pin)?;
    let echo = gpio.get(slot.echo_pin).map(|p| p.into_input()).map_err(|e| {
        error!("hardware: slot {} GPIO{}: {}", slot.id, slot.echo_pin, e);
        Error::Init("echo pin unavailable")
    })?;

    let indicators = SlotIndicators::new(
        output(slot.red_led_pin)?,
        output(slot.green_led_pin)?,
        output(slot.buzzer_pin)?,
        slot.polarity,
    );

    info!(
        "hardware: slot {} trig=GPIO{} echo=GPIO{} red=GPIO{} green=GPIO{} buzzer=GPIO{}",
        slot.id,
        slot.trigger_pin,
        slot.echo_pin,
        slot.red_led_pin,
        slot.green_led_pin,
        slot.buzzer_pin
    );

    Ok(GpioSlot::new(
        RangeSensor::new(trigger, echo, clock, timing),
        indicators,
    ))
}
