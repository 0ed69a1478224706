//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (slot hardware, clocks, event sinks, config storage)
//! implement these traits.  The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches GPIO directly.

use embedded_hal::delay::DelayNs;

use crate::app::decision::ActuatorOutputs;
use crate::config::MonitorConfig;
use crate::sensors::ultrasonic::DistanceReading;

// ───────────────────────────────────────────────────────────────
// Ranging port (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one distance measurement per call.
pub trait RangingPort {
    /// Run one ranging attempt.  Timeouts come back as
    /// [`DistanceReading::NoReading`], never as a panic or `Err`.
    fn measure(&mut self) -> DistanceReading;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs / buzzer)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive a slot's outputs.
pub trait IndicatorPort {
    /// Write all three outputs.  Every call rewrites every pin.
    fn apply(&mut self, outputs: &ActuatorOutputs);

    /// Drive every output to its "off" level.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port (monotonic time + blocking delay)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source used by the echo busy-wait.
///
/// The delay half is the embedded-hal [`DelayNs`] trait so that any HAL
/// delay provider can back it.
pub trait Clock: DelayNs {
    /// Microseconds since an arbitrary fixed origin.  Never goes backwards.
    fn now_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists monitor configuration.
///
/// Implementations MUST validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`MonitorConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
