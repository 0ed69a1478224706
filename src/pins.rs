//! Default GPIO pin assignments (BCM numbering) for the two-slot board.
//!
//! Single source of truth for [`MonitorConfig::default`](crate::config::MonitorConfig).
//! Deployments with a different wiring override these in the config file.

// ---------------------------------------------------------------------------
// Slot 1
// ---------------------------------------------------------------------------

/// HC-SR04 trigger, slot 1.
pub const SLOT1_TRIGGER_GPIO: u8 = 23;
/// HC-SR04 echo, slot 1 (through a 5 V → 3.3 V divider).
pub const SLOT1_ECHO_GPIO: u8 = 24;
pub const SLOT1_RED_LED_GPIO: u8 = 25;
pub const SLOT1_GREEN_LED_GPIO: u8 = 8;
pub const SLOT1_BUZZER_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// Slot 2
// ---------------------------------------------------------------------------

pub const SLOT2_TRIGGER_GPIO: u8 = 14;
pub const SLOT2_ECHO_GPIO: u8 = 15;
pub const SLOT2_RED_LED_GPIO: u8 = 7;
/// GPIO 1 is the ID EEPROM clock on some boards; move it if the HAT uses it.
pub const SLOT2_GREEN_LED_GPIO: u8 = 1;
pub const SLOT2_BUZZER_GPIO: u8 = 13;
