//! Task Watchdog Timer (TWDT) driver.
//!
//! Reports a stalled main loop.
//!
//! The loop is fed once per `poll()`, but a single poll can legitimately
//! run far longer than the timeout: `r` / `s` block inside the receiver
//! until the first IR edge arrives, which only happens when someone
//! presses a button on the remote being captured.  Expiry therefore only
//! prints the TWDT backtrace instead of panicking, so an operator
//! waiting at the remote does not reboot the board.  The idle-task check
//! is disabled: the loop never yields.
//!
//! The main loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// TWDT timeout for the polling loop.
pub const WATCHDOG_TIMEOUT_MS: u32 = 30_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: WATCHDOG_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: false,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({}ms timeout)", WATCHDOG_TIMEOUT_MS);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self {}
        }
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
