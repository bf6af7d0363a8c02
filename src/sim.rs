//! Host-side simulated hardware.
//!
//! Stand-ins for every port the controller touches, all driven from one
//! shared [`SimClock`].  Each clock read (and each simulated pin access)
//! advances simulated time by a fixed step, so the busy-wait loops
//! terminate and produce a deterministic timeline that tests can inspect.
//!
//! Compiled on non-ESP targets only.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::app::events::ControllerEvent;
use crate::app::ports::{AnalogInput, Clock, EventSink};
use crate::app::service::{Board, Controller};
use crate::config::FirmwareConfig;
use crate::error::{Result, SensorError};
use crate::transport::Transport;

// ── Clock ─────────────────────────────────────────────────────

struct ClockState {
    now: Cell<u64>,
    step: u64,
}

/// Simulated monotonic clock.  Clones share the same timeline.
#[derive(Clone)]
pub struct SimClock(Rc<ClockState>);

impl SimClock {
    /// `step_us` is added after every read.  Use 0 for a clock that only
    /// moves through [`advance`](Self::advance).
    pub fn new(step_us: u64) -> Self {
        Self(Rc::new(ClockState {
            now: Cell::new(0),
            step: step_us,
        }))
    }

    /// Current time without advancing.
    pub fn peek(&self) -> u64 {
        self.0.now.get()
    }

    pub fn advance(&self, us: u64) {
        self.0.now.set(self.0.now.get() + us);
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        let t = self.0.now.get();
        self.0.now.set(t + self.0.step);
        t
    }
}

// ── Output pin ────────────────────────────────────────────────

/// Output pin that records every level change with its timestamp.
#[derive(Clone)]
pub struct SimOutputPin {
    clock: SimClock,
    level: Rc<Cell<bool>>,
    transitions: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl SimOutputPin {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            level: Rc::new(Cell::new(false)),
            transitions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn is_high(&self) -> bool {
        self.level.get()
    }

    /// `(timestamp, new_level)` for every change since the last clear.
    pub fn transitions(&self) -> Vec<(u64, bool)> {
        self.transitions.borrow().clone()
    }

    /// Timestamps at which the pin went high.
    pub fn rising_edges(&self) -> Vec<u64> {
        self.transitions
            .borrow()
            .iter()
            .filter(|(_, high)| *high)
            .map(|(t, _)| *t)
            .collect()
    }

    pub fn clear(&self) {
        self.transitions.borrow_mut().clear();
    }

    fn drive(&mut self, high: bool) {
        let t = self.clock.now_us();
        if self.level.get() != high {
            self.level.set(high);
            self.transitions.borrow_mut().push((t, high));
        }
    }
}

impl ErrorType for SimOutputPin {
    type Error = Infallible;
}

impl OutputPin for SimOutputPin {
    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }

    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }
}

// ── Input pin ─────────────────────────────────────────────────

type Waveform = Box<dyn Fn(u64) -> bool>;

/// Input pin whose level is a function of simulated time.
#[derive(Clone)]
pub struct SimInputPin {
    clock: SimClock,
    waveform: Rc<RefCell<Waveform>>,
}

impl SimInputPin {
    /// Idles high, like an IR demodulator output with no carrier.
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            waveform: Rc::new(RefCell::new(Box::new(|_| true))),
        }
    }

    pub fn set_waveform(&self, f: impl Fn(u64) -> bool + 'static) {
        *self.waveform.borrow_mut() = Box::new(f);
    }

    /// Demodulator output for a slot sequence starting at `start_us`:
    /// low for a mark slot, high otherwise (and outside the frame).
    pub fn play_slots(&self, start_us: u64, slot_us: u64, marks: Vec<bool>) {
        self.set_waveform(move |t| {
            if t < start_us {
                return true;
            }
            let idx = ((t - start_us) / slot_us) as usize;
            marks.get(idx).map_or(true, |mark| !mark)
        });
    }
}

impl ErrorType for SimInputPin {
    type Error = Infallible;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        let t = self.clock.now_us();
        Ok((self.waveform.borrow())(t))
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

// ── ADC ───────────────────────────────────────────────────────

/// Analog channel with an injectable reading.
#[derive(Clone, Default)]
pub struct SimAdc {
    raw: Rc<Cell<u16>>,
    fail: Rc<Cell<bool>>,
}

impl SimAdc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, raw: u16) {
        self.raw.set(raw);
    }

    /// Make subsequent reads fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl AnalogInput for SimAdc {
    fn read_raw(&mut self) -> Result<u16> {
        if self.fail.get() {
            return Err(SensorError::AdcReadFailed.into());
        }
        Ok(self.raw.get())
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Default)]
struct Link {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    unflushed: usize,
}

/// In-memory command link.  Clones share both directions, so a test keeps
/// one handle as the "host" while the controller owns another.
#[derive(Clone, Default)]
pub struct SimTransport(Rc<RefCell<Link>>);

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the host had sent them.
    pub fn feed(&self, bytes: &[u8]) {
        self.0.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    /// Bytes not yet consumed by the controller.
    pub fn pending_input(&self) -> usize {
        self.0.borrow().inbound.len()
    }

    /// Bytes written since the controller last flushed.
    pub fn unflushed(&self) -> usize {
        self.0.borrow().unflushed
    }

    /// Drain everything the controller has written.
    pub fn take_output(&self) -> Vec<u8> {
        core::mem::take(&mut self.0.borrow_mut().outbound)
    }
}

impl Transport for SimTransport {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Infallible> {
        let mut link = self.0.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match link.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> core::result::Result<usize, Infallible> {
        let mut link = self.0.borrow_mut();
        link.outbound.extend_from_slice(data);
        link.unflushed += data.len();
        Ok(data.len())
    }

    fn flush(&mut self) -> core::result::Result<(), Infallible> {
        self.0.borrow_mut().unflushed = 0;
        Ok(())
    }

    fn available(&self) -> bool {
        !self.0.borrow().inbound.is_empty()
    }
}

// ── Event recorder ────────────────────────────────────────────

/// Sink that keeps every event for later assertions.
#[derive(Default)]
pub struct EventRecorder {
    pub events: Vec<ControllerEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for EventRecorder {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(event.clone());
    }
}

// ── Complete rig ──────────────────────────────────────────────

pub type SimController =
    Controller<SimOutputPin, SimInputPin, SimAdc, SimOutputPin, SimClock, SimTransport>;

/// One simulated board plus host-side handles to every peripheral.
pub struct SimRig {
    pub clock: SimClock,
    pub ir_out: SimOutputPin,
    pub ir_in: SimInputPin,
    pub range: SimAdc,
    pub generic_led: SimOutputPin,
    pub active_led: SimOutputPin,
    pub link: SimTransport,
}

impl SimRig {
    pub fn new(step_us: u64) -> Self {
        let clock = SimClock::new(step_us);
        Self {
            ir_out: SimOutputPin::new(&clock),
            ir_in: SimInputPin::new(&clock),
            range: SimAdc::new(),
            generic_led: SimOutputPin::new(&clock),
            active_led: SimOutputPin::new(&clock),
            link: SimTransport::new(),
            clock,
        }
    }

    /// Build a controller wired to clones of this rig's peripherals.
    pub fn controller(&self, config: FirmwareConfig) -> Result<SimController> {
        let board = Board {
            ir_out: self.ir_out.clone(),
            ir_in: self.ir_in.clone(),
            range: self.range.clone(),
            generic_led: self.generic_led.clone(),
            active_led: self.active_led.clone(),
            clock: self.clock.clone(),
        };
        Controller::new(board, self.link.clone(), config)
    }
}
