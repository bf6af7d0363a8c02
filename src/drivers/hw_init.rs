//! One-shot hardware peripheral initialization.
//!
//! Configures the range-sensor ADC channel and the GPIO directions using
//! raw ESP-IDF sys calls. Called once from `main()` before the loop starts.
//! The command UART is brought up separately by the `uart` adapter.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::{Error, Result};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::AdcInitFailed(_) => Error::Init("ADC1"),
            HwInitError::GpioConfigFailed(_) => Error::Init("GPIO"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> core::result::Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> core::result::Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// The range sensor threshold is expressed on a 10-bit scale; ADC1 reads
/// 12 bits.
const ADC_SCALE_SHIFT: u32 = 2;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> core::result::Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), pins::RANGE_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!(
        "hw_init: ADC1 configured (CH{}=range on GPIO{})",
        pins::RANGE_ADC_CHANNEL,
        pins::RANGE_ADC_GPIO
    );
    Ok(())
}

/// One reading from an ADC1 channel, scaled to 10 bits.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(crate::error::SensorError::AdcReadFailed.into());
    }
    Ok(scale_to_10_bit(raw))
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> Result<u16> {
    Ok(0)
}

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn scale_to_10_bit(raw_12: i32) -> u16 {
    (raw_12.clamp(0, 4095) as u16) >> ADC_SCALE_SHIFT
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> core::result::Result<(), HwInitError> {
    // Demodulator output idles high; pull-up keeps it there when unplugged.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::IR_IN_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> core::result::Result<(), HwInitError> {
    let output_pins = [
        pins::IR_OUT_GPIO,
        pins::GENERIC_LED_GPIO,
        pins::ACTIVE_LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
#[inline(always)]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}
