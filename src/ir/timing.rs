//! Elapsed-time-gated scheduling for the busy-wait loops.
//!
//! Every timed operation captures one origin timestamp and expresses each
//! deadline as `origin + offset`, where the offset is computed from how many
//! slots / sub-cycles have elapsed.  A late wake-up therefore shortens the
//! next wait instead of pushing every later edge back, and error stays
//! bounded by a single loop iteration for the whole frame.

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

/// Absolute time base for one timed operation.
pub struct Timebase<'a, C: Clock> {
    clock: &'a C,
    origin: u64,
}

impl<'a, C: Clock> Timebase<'a, C> {
    /// Capture the origin now.
    pub fn start(clock: &'a C) -> Self {
        let origin = clock.now_us();
        Self { clock, origin }
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Microseconds since the origin.
    pub fn elapsed_us(&self) -> u64 {
        self.clock.now_us().saturating_sub(self.origin)
    }

    /// Spin until `origin + offset_us`.  Returns immediately if that
    /// instant has already passed.
    #[inline(always)]
    pub fn wait_until(&self, offset_us: u64) {
        let deadline = self.origin + offset_us;
        while self.clock.now_us() < deadline {
            core::hint::spin_loop();
        }
    }
}

/// `DelayNs` that spins on a [`Clock`].
///
/// Used for the indicator blinks so that the whole firmware runs off a
/// single time source, on the device and in simulation alike.
#[derive(Clone)]
pub struct BusyDelay<C: Clock> {
    clock: C,
}

impl<C: Clock> BusyDelay<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn spin_us(&self, us: u64) {
        Timebase::start(&self.clock).wait_until(us);
    }
}

impl<C: Clock> DelayNs for BusyDelay<C> {
    fn delay_ns(&mut self, ns: u32) {
        self.spin_us(u64::from(ns.div_ceil(1000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.spin_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.spin_us(u64::from(ms) * 1000);
    }
}
