//! ESP32 time adapter.
//!
//! Implements the [`Clock`] port that every timing loop spins on.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side runs.

use crate::app::ports::Clock;

/// Time adapter for the ESP32-S3 platform.
#[derive(Debug, Clone, Copy)]
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    #[inline(always)]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the systimer counter; no state.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for Esp32TimeAdapter {
    #[inline(always)]
    fn now_us(&self) -> u64 {
        self.uptime_us()
    }
}
