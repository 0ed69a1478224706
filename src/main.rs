//! Slotwatch: Main Entry Point
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  GpioSlot / SimulatedSlot   LogEventSink   JsonConfigFile     │
//! │  (Ranging + Indicator)      (EventSink)    (ConfigPort)       │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ──────────────────      │
//! │                                                               │
//! │  ┌─────────────────────────────────────────────────────────┐  │
//! │  │          MonitorService (pure logic)                    │  │
//! │  │  measure → decide → actuate, slot by slot               │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! │                                                               │
//! │  SnapshotCache (shared with presentation readers)             │
//! └───────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use slotwatch::adapters::config_file::JsonConfigFile;
use slotwatch::adapters::log_sink::LogEventSink;
use slotwatch::adapters::simulated::SimulatedSlot;
use slotwatch::adapters::time::SystemClock;
use slotwatch::app::ports::{ConfigPort, IndicatorPort, RangingPort};
use slotwatch::app::service::MonitorService;
use slotwatch::app::snapshot::SnapshotCache;
use slotwatch::config::{Backend, MonitorConfig};

const CONFIG_ENV: &str = "SLOTWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "slotwatch.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("slotwatch v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config ─────────────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let store = JsonConfigFile::new(path);
    let first_run = !store.path().exists();
    let config = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;
    if first_run {
        // Leave an editable copy of the defaults behind.
        if let Err(e) = store.save(&config) {
            warn!("could not write default config: {}", e);
        }
    }

    // ── 2. Ctrl-C → leave the loop, outputs off ───────────────
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing Ctrl-C handler")?;
    }

    // ── 3. Backend selection (once, by config) ────────────────
    let clock = SystemClock::new();
    let cache = SnapshotCache::new();
    match config.backend {
        Backend::Simulated => {
            info!("backend: simulated ({} slot(s))", config.slots.len());
            let slots = SimulatedSlot::for_config(&config, rand::random());
            run(&config, slots, cache, clock, &running)
        }
        Backend::Hardware => run_hardware(&config, cache, clock, &running),
    }
}

#[cfg(feature = "rpi")]
fn run_hardware(
    config: &MonitorConfig,
    cache: SnapshotCache,
    clock: SystemClock,
    running: &AtomicBool,
) -> Result<()> {
    info!("backend: Raspberry Pi GPIO ({} slot(s))", config.slots.len());
    let slots = slotwatch::adapters::hardware::open_slots(config, clock)
        .context("claiming GPIO pins")?;
    run(config, slots, cache, clock, running)
}

#[cfg(not(feature = "rpi"))]
fn run_hardware(_: &MonitorConfig, _: SnapshotCache, _: SystemClock, _: &AtomicBool) -> Result<()> {
    anyhow::bail!("backend \"hardware\" requires a build with `--features rpi`")
}

// ── Polling loop ──────────────────────────────────────────────

fn run<H: RangingPort + IndicatorPort>(
    config: &MonitorConfig,
    slots: Vec<H>,
    cache: SnapshotCache,
    clock: SystemClock,
    running: &AtomicBool,
) -> Result<()> {
    let mut sink = LogEventSink::new();
    let mut svc =
        MonitorService::new(config, slots, cache.clone()).context("wiring slot backends")?;
    svc.start(&mut sink);

    let pause = Duration::from_millis(u64::from(config.poll_interval_ms));
    while running.load(Ordering::SeqCst) {
        svc.tick(clock.uptime_ms(), &mut sink);
        debug!("snapshot {}", cache.to_json()?);
        std::thread::sleep(pause);
    }

    svc.shutdown(&mut sink);
    Ok(())
}
