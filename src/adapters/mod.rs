//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements  | Connects to                 |
//! |------------|-------------|-----------------------------|
//! | `log_sink` | EventSink   | Serial log output           |
//! | `time`     | Clock       | ESP32 high-resolution timer |
//! | `uart`     | Transport   | Command UART (ESP-IDF only) |

pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
