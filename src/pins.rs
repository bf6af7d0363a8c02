//! GPIO / peripheral pin assignments for the RemoSquash board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Infrared
// ---------------------------------------------------------------------------

/// Digital input from the IR demodulator module (TSOP-style).
/// Idles HIGH; a carrier burst pulls it LOW.
pub const IR_IN_GPIO: i32 = 8;
/// Digital output driving the IR LED transistor (active HIGH).
pub const IR_OUT_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Generic LED: blinks on `i` and after every transmit/receive.
pub const GENERIC_LED_GPIO: i32 = 13;
/// Activity LED: driven by the `a` / `b` commands.
pub const ACTIVE_LED_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Proximity sensor (ADC1)
// ---------------------------------------------------------------------------

/// Analog ranging sensor (Sharp GP2Y0A-style) output.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const RANGE_ADC_GPIO: i32 = 1;
/// ADC1 channel number for [`RANGE_ADC_GPIO`].
pub const RANGE_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Command UART (host relay link)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
