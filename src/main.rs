//! RemoSquash Firmware: main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  UartTransport   LogEventSink   Esp32Time   GpioPin ×4   │
//! │  (Transport)     (EventSink)    (Clock)     RangeSensor  │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │           Controller (pure logic)                  │  │
//! │  │  CommandProtocol · IR tx/rx · ProximityDetector    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop never sleeps: each iteration handles at most one command byte
//! and one proximity sample, and the timing-critical IR work busy-waits
//! inside the controller.

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info};

use remosquash::adapters::log_sink::LogEventSink;
use remosquash::adapters::time::Esp32TimeAdapter;
use remosquash::adapters::uart::UartTransport;
use remosquash::app::service::{Board, Controller};
use remosquash::config::FirmwareConfig;
use remosquash::drivers::gpio::GpioPin;
use remosquash::drivers::hw_init;
use remosquash::drivers::watchdog::Watchdog;
use remosquash::pins;
use remosquash::sensors::RangeSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RemoSquash v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = FirmwareConfig::default();
    config.validate().context("invalid firmware config")?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("config: {}", json),
        Err(e) => error!("config: could not serialise ({})", e),
    }

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()
        .map_err(remosquash::error::Error::from)
        .context("HAL init failed")?;

    // UartDriver wants the typed pin peripherals; keep them in step with
    // the numbers in `pins`.
    const _: () = assert!(pins::UART_TX_GPIO == 17 && pins::UART_RX_GPIO == 18);
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let uart_config = UartConfig::default().baudrate(Hertz(config.uart_baud));
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )
    .context("command UART init failed")?;
    info!(
        "UART1: TX=GPIO{} RX=GPIO{} @ {} baud",
        pins::UART_TX_GPIO,
        pins::UART_RX_GPIO,
        config.uart_baud
    );

    let board = Board {
        ir_out: GpioPin::new(pins::IR_OUT_GPIO),
        ir_in: GpioPin::new(pins::IR_IN_GPIO),
        range: RangeSensor::new(pins::RANGE_ADC_CHANNEL),
        generic_led: GpioPin::new(pins::GENERIC_LED_GPIO),
        active_led: GpioPin::new(pins::ACTIVE_LED_GPIO),
        clock: Esp32TimeAdapter::new(),
    };

    let mut controller = Controller::new(board, UartTransport::new(uart), config)
        .context("controller init failed")?;
    let mut sink = LogEventSink::new();
    let watchdog = Watchdog::new();

    // ── 4. Main loop ──────────────────────────────────────────
    controller.start(&mut sink);
    loop {
        if let Err(e) = controller.poll(&mut sink) {
            error!("poll: {}", e);
        }
        watchdog.feed();
    }
}
