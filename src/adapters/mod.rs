//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements                 | Connects to               |
//! |----------------|----------------------------|---------------------------|
//! | `config_file`  | ConfigPort                 | JSON file on disk         |
//! | `gpio_slot`    | RangingPort, IndicatorPort | any embedded-hal pins     |
//! | `hardware`     | (builds `GpioSlot`s)       | Raspberry Pi GPIO (rppal) |
//! | `log_sink`     | EventSink                  | `log` facade              |
//! | `simulated`    | RangingPort, IndicatorPort | synthetic distances       |
//! | `time`         | Clock                      | `std::time::Instant`      |

pub mod config_file;
pub mod gpio_slot;
#[cfg(feature = "rpi")]
pub mod hardware;
pub mod log_sink;
pub mod simulated;
pub mod time;
