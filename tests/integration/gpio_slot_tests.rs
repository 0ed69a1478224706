//! Integration tests for `GpioSlot`: the real ranging driver and indicator
//! driver running against mock pins on a fake clock.

use std::cell::Cell;
use std::rc::Rc;

use slotwatch::adapters::gpio_slot::GpioSlot;
use slotwatch::app::decision::{OutputPolarity, PinLevels, Polarity, SlotState};
use slotwatch::app::service::MonitorService;
use slotwatch::app::snapshot::SnapshotCache;
use slotwatch::config::MonitorConfig;
use slotwatch::drivers::indicators::SlotIndicators;
use slotwatch::sensors::ultrasonic::{DistanceReading, RangeSensor};

use super::mock_hw::{EchoResponder, FakeClock, MockOutput, RecordingSink};

struct Rig {
    width_us: Rc<Cell<Option<u64>>>,
    red: MockOutput,
    green: MockOutput,
    buzzer: MockOutput,
}

impl Rig {
    fn levels(&self) -> (Option<bool>, Option<bool>, Option<bool>) {
        (self.red.level(), self.green.level(), self.buzzer.level())
    }
}

type TestSlot = GpioSlot<MockOutput, EchoResponder, FakeClock>;

fn make_slot(polarity: OutputPolarity) -> (TestSlot, Rig) {
    let config = MonitorConfig::default();
    let clock = FakeClock::default();
    let width_us = Rc::new(Cell::new(None));
    let rig = Rig {
        width_us: Rc::clone(&width_us),
        red: MockOutput::default(),
        green: MockOutput::default(),
        buzzer: MockOutput::default(),
    };

    let echo = EchoResponder::new(clock.clone(), width_us);
    let sensor = RangeSensor::new(MockOutput::default(), echo, clock, config.ranging_timing());
    let indicators = SlotIndicators::new(
        rig.red.clone(),
        rig.green.clone(),
        rig.buzzer.clone(),
        polarity,
    );
    (GpioSlot::new(sensor, indicators), rig)
}

fn make_service(polarity: OutputPolarity) -> (MonitorService<TestSlot>, Rig) {
    let mut config = MonitorConfig::default();
    config.slots.truncate(1);
    config.slots[0].polarity = polarity;
    let (slot, rig) = make_slot(polarity);
    let svc = MonitorService::new(&config, [slot], SnapshotCache::new()).unwrap();
    (svc, rig)
}

// ── Ranging through the adapter ───────────────────────────────

#[test]
fn echo_width_becomes_distance() {
    use slotwatch::app::ports::RangingPort;

    let (mut slot, rig) = make_slot(OutputPolarity::default());

    rig.width_us.set(Some(2_000));
    assert_eq!(slot.measure(), DistanceReading::Distance(34.3));

    rig.width_us.set(Some(4_000));
    assert_eq!(slot.measure(), DistanceReading::Distance(68.6));

    rig.width_us.set(None);
    assert_eq!(slot.measure(), DistanceReading::NoReading);

    // A timeout does not poison the next ping.
    rig.width_us.set(Some(400));
    assert_eq!(slot.measure(), DistanceReading::Distance(6.86));
}

// ── Full pipeline: echo → decision → pins ─────────────────────

#[test]
fn occupied_slot_lights_red() {
    let (mut svc, rig) = make_service(OutputPolarity::default());
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);
    assert_eq!(rig.levels(), (Some(false), Some(false), Some(false)));

    rig.width_us.set(Some(2_000));
    let snap = svc.tick(0, &mut sink);

    assert_eq!(snap.slots[0].state, SlotState::Occupied);
    assert_eq!(rig.levels(), (Some(true), Some(false), Some(false)));
}

#[test]
fn free_slot_lights_green_and_too_close_sounds_buzzer() {
    let (mut svc, rig) = make_service(OutputPolarity::default());
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);

    rig.width_us.set(Some(4_000));
    assert_eq!(svc.tick(0, &mut sink).slots[0].state, SlotState::Free);
    assert_eq!(rig.levels(), (Some(false), Some(true), Some(false)));

    rig.width_us.set(Some(400));
    let snap = svc.tick(500, &mut sink);
    assert_eq!(snap.slots[0].state, SlotState::Occupied);
    assert!(snap.slots[0].too_close);
    assert_eq!(rig.levels(), (Some(true), Some(false), Some(true)));
}

#[test]
fn missing_echo_faults_and_switches_off() {
    let (mut svc, rig) = make_service(OutputPolarity::default());
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);

    rig.width_us.set(Some(2_000));
    svc.tick(0, &mut sink);
    assert_eq!(rig.red.level(), Some(true));

    rig.width_us.set(None);
    let snap = svc.tick(500, &mut sink);
    assert_eq!(snap.slots[0].state, SlotState::Fault);
    assert_eq!(snap.slots[0].reading, DistanceReading::NoReading);
    assert_eq!(rig.levels(), (Some(false), Some(false), Some(false)));
}

#[test]
fn active_low_outputs_are_inverted_on_the_wire() {
    let polarity = OutputPolarity {
        red: Polarity::ActiveLow,
        green: Polarity::ActiveLow,
        buzzer: Polarity::ActiveHigh,
    };
    let (mut svc, rig) = make_service(polarity);
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);
    // Off means HIGH for the active-low LEDs.
    assert_eq!(rig.levels(), (Some(true), Some(true), Some(false)));

    rig.width_us.set(Some(2_000));
    svc.tick(0, &mut sink);
    assert_eq!(rig.levels(), (Some(false), Some(true), Some(false)));

    rig.width_us.set(None);
    svc.tick(500, &mut sink);
    assert_eq!(rig.levels(), (Some(true), Some(true), Some(false)));
    assert_eq!(
        svc.slots()[0].hw.indicators().last_levels(),
        Some(PinLevels { red: true, green: true, buzzer: false })
    );
}
