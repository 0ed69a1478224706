//! Integration tests for the MonitorService → decide → indicators pipeline.
//!
//! Two scripted slots share one call log, so ordering across slots is
//! observable as well as the per-slot outcome.

use std::cell::RefCell;
use std::rc::Rc;

use slotwatch::app::decision::{ActuatorOutputs, OutputPolarity, SlotState};
use slotwatch::app::events::AppEvent;
use slotwatch::app::service::MonitorService;
use slotwatch::app::snapshot::{HISTORY_LEN, SnapshotCache};
use slotwatch::config::MonitorConfig;
use slotwatch::error::Error;
use slotwatch::sensors::ultrasonic::DistanceReading;

use super::mock_hw::{Call, CallLog, MockSlot, RecordingSink};

fn make_service(
    slot1: &[f32],
    slot2: &[f32],
) -> (MonitorService<MockSlot>, CallLog, RecordingSink) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let config = MonitorConfig::default();
    let hw = vec![MockSlot::cm(1, slot1, &log), MockSlot::cm(2, slot2, &log)];
    let mut svc = MonitorService::new(&config, hw, SnapshotCache::new()).unwrap();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);
    (svc, log, sink)
}

fn outputs(red: bool, green: bool, buzzer: bool) -> ActuatorOutputs {
    ActuatorOutputs {
        red_led: red,
        green_led: green,
        buzzer,
        polarity: OutputPolarity::default(),
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_switches_every_slot_off() {
    let (_svc, log, sink) = make_service(&[], &[]);
    assert_eq!(*log.borrow(), vec![Call::AllOff(1), Call::AllOff(2)]);
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started { slots: 2 }]));
}

#[test]
fn shutdown_switches_every_slot_off_and_reports_ticks() {
    let (mut svc, log, mut sink) = make_service(&[35.0, 35.0], &[55.0, 55.0]);
    svc.tick(0, &mut sink);
    svc.tick(500, &mut sink);
    log.borrow_mut().clear();

    svc.shutdown(&mut sink);
    assert_eq!(*log.borrow(), vec![Call::AllOff(1), Call::AllOff(2)]);
    assert!(matches!(sink.events.last(), Some(AppEvent::Stopped { ticks: 2 })));
}

// ── Per-tick pipeline ─────────────────────────────────────────

#[test]
fn slots_are_processed_one_after_another() {
    let (mut svc, log, mut sink) = make_service(&[35.0], &[55.0]);
    log.borrow_mut().clear();

    svc.tick(0, &mut sink);

    assert_eq!(
        *log.borrow(),
        vec![
            Call::Measure(1),
            Call::Apply(1, outputs(true, false, false)),
            Call::Measure(2),
            Call::Apply(2, outputs(false, true, false)),
        ]
    );
}

#[test]
fn occupied_free_and_too_close_drive_the_right_outputs() {
    let (mut svc, log, mut sink) = make_service(&[5.0], &[40.0]);
    log.borrow_mut().clear();

    let snap = svc.tick(1_000, &mut sink);

    let s1 = snap.slot(1).unwrap();
    assert_eq!(s1.state, SlotState::Occupied);
    assert!(s1.too_close);
    assert_eq!(s1.outputs, outputs(true, false, true));

    // Exactly at the occupied threshold counts as free.
    let s2 = snap.slot(2).unwrap();
    assert_eq!(s2.state, SlotState::Free);
    assert!(!s2.too_close);
    assert_eq!(s2.outputs, outputs(false, true, false));

    assert_eq!(s1.timestamp_ms, 1_000);
    assert_eq!(s2.timestamp_ms, 1_000);
}

#[test]
fn failed_reading_faults_only_that_slot() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let config = MonitorConfig::default();
    let hw = vec![
        MockSlot::new(1, &[DistanceReading::NoReading], &log),
        MockSlot::cm(2, &[20.0], &log),
    ];
    let mut svc = MonitorService::new(&config, hw, SnapshotCache::new()).unwrap();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);

    let snap = svc.tick(0, &mut sink);

    assert_eq!(snap.slot(1).unwrap().state, SlotState::Fault);
    assert_eq!(snap.slot(1).unwrap().outputs, ActuatorOutputs::all_off(OutputPolarity::default()));
    assert_eq!(snap.slot(2).unwrap().state, SlotState::Occupied);
}

#[test]
fn fault_does_not_keep_last_good_state() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let config = MonitorConfig::default();
    let hw = vec![
        MockSlot::new(
            1,
            &[
                DistanceReading::Distance(25.0),
                DistanceReading::NoReading,
                DistanceReading::Distance(50.0),
            ],
            &log,
        ),
        MockSlot::cm(2, &[50.0, 50.0, 50.0], &log),
    ];
    let mut svc = MonitorService::new(&config, hw, SnapshotCache::new()).unwrap();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink);

    let states: Vec<SlotState> = (0..3)
        .map(|t| svc.tick(t * 500, &mut sink).slots[0].state)
        .collect();
    assert_eq!(states, vec![SlotState::Occupied, SlotState::Fault, SlotState::Free]);
    assert_eq!(svc.slots()[0].last_state(), SlotState::Free);
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn state_changes_are_reported_once() {
    let (mut svc, _log, mut sink) = make_service(&[35.0, 30.0, 50.0], &[55.0, 55.0, 55.0]);
    sink.events.clear();

    svc.tick(0, &mut sink);
    svc.tick(500, &mut sink);
    svc.tick(1_000, &mut sink);

    let changes: Vec<(u8, SlotState, SlotState)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { slot_id, from, to } => Some((*slot_id, *from, *to)),
            _ => None,
        })
        .collect();

    assert_eq!(
        changes,
        vec![
            (1, SlotState::Unknown, SlotState::Occupied),
            (2, SlotState::Unknown, SlotState::Free),
            (1, SlotState::Occupied, SlotState::Free),
        ]
    );

    let readings = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::SlotReading(_)))
        .count();
    assert_eq!(readings, 6, "one reading event per slot per tick");
}

// ── Snapshot cache ────────────────────────────────────────────

#[test]
fn cache_holds_the_latest_complete_tick() {
    let (mut svc, _log, mut sink) = make_service(&[35.0, 12.0], &[55.0, 8.0]);
    let cache = svc.cache();

    svc.tick(0, &mut sink);
    let second = svc.tick(500, &mut sink);

    let latest = cache.latest();
    assert_eq!(latest, second);
    assert_eq!(latest.tick, 2);
    assert_eq!(latest.slot(2).unwrap().reading, DistanceReading::Distance(8.0));
    assert!(latest.slot(2).unwrap().too_close);
}

#[test]
fn history_is_bounded_and_oldest_first() {
    let script: Vec<f32> = (0..HISTORY_LEN + 5).map(|i| 20.0 + i as f32).collect();
    let (mut svc, _log, mut sink) = make_service(&script, &script);
    let cache = svc.cache();

    for t in 0..script.len() as u64 {
        svc.tick(t, &mut sink);
    }

    let history = cache.history(1);
    assert_eq!(history.len(), HISTORY_LEN);
    assert_eq!(history[0].timestamp_ms, 5);
    assert_eq!(history[HISTORY_LEN - 1].timestamp_ms, script.len() as u64 - 1);
    assert_eq!(
        history[HISTORY_LEN - 1].reading,
        DistanceReading::Distance(*script.last().unwrap())
    );
}

#[test]
fn snapshot_json_names_states_and_readings() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let config = MonitorConfig::default();
    let hw = vec![
        MockSlot::cm(1, &[35.0], &log),
        MockSlot::new(2, &[DistanceReading::NoReading], &log),
    ];
    let mut svc = MonitorService::new(&config, hw, SnapshotCache::new()).unwrap();
    let mut sink = RecordingSink::default();
    svc.tick(0, &mut sink);

    let json: serde_json::Value = serde_json::from_str(&svc.cache().to_json().unwrap()).unwrap();
    assert_eq!(json["tick"], 1);
    assert_eq!(json["slots"][0]["state"], "occupied");
    assert_eq!(json["slots"][0]["reading"]["kind"], "distance");
    assert_eq!(json["slots"][1]["state"], "fault");
    assert_eq!(json["slots"][1]["reading"]["kind"], "no_reading");
}

#[test]
fn missing_backend_is_rejected_not_dropped() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let config = MonitorConfig::default();
    let hw = vec![MockSlot::cm(1, &[35.0], &log)];

    let result = MonitorService::new(&config, hw, SnapshotCache::new());
    assert!(matches!(result, Err(Error::Init(_))));
    assert!(log.borrow().is_empty(), "no hardware touched");
}
