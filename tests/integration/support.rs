//! Shared helpers for the controller integration tests.

use remosquash::app::commands::FRAME_LEN;
use remosquash::config::FirmwareConfig;
use remosquash::ir::frame_slots;
use remosquash::sim::{EventRecorder, SimController, SimRig};

/// A started controller plus the rig and an event recorder.
pub struct Harness {
    pub rig: SimRig,
    pub ctl: SimController,
    pub events: EventRecorder,
}

impl Harness {
    pub fn new(config: FirmwareConfig) -> Self {
        let rig = SimRig::new(1);
        let mut ctl = rig.controller(config).expect("valid config");
        let mut events = EventRecorder::new();
        ctl.start(&mut events);
        Self { rig, ctl, events }
    }

    pub fn canonical() -> Self {
        Self::new(FirmwareConfig::default())
    }

    /// Send bytes from the host and poll until all are consumed.
    pub fn send(&mut self, bytes: &[u8]) {
        self.rig.link.feed(bytes);
        while self.rig.link.pending_input() > 0 {
            self.ctl.poll(&mut self.events).expect("poll");
        }
    }

    pub fn output(&self) -> Vec<u8> {
        self.rig.link.take_output()
    }

    /// Poll `iterations` times, advancing the clock by `period_us` after each.
    pub fn idle_for(&mut self, iterations: usize, period_us: u64) {
        for _ in 0..iterations {
            self.ctl.poll(&mut self.events).expect("poll");
            self.rig.clock.advance(period_us);
        }
    }

    /// Queue a demodulated frame on the IR input, starting `lead_us` from now.
    pub fn play_ir(&self, frame: &[u8], lead_us: u64) {
        let start = self.rig.clock.peek() + lead_us;
        self.rig
            .ir_in
            .play_slots(start, 100, frame_slots(frame).collect());
    }
}

/// A deterministic full-length frame whose first slot is a mark.
pub fn sample_frame() -> Vec<u8> {
    let mut frame: Vec<u8> = (0..FRAME_LEN).map(|i| (i * 37 + 11) as u8).collect();
    frame[0] |= 0x01;
    frame
}

/// Mark slots recovered from the IR LED's rising edges, measured from the
/// first edge.  Requires the first slot to be a mark.
pub fn transmitted_slots(edges: &[u64], slots: usize) -> Vec<bool> {
    let mut marks = vec![false; slots];
    let Some(&first) = edges.first() else {
        return marks;
    };
    for &t in edges {
        let idx = ((t - first) / 100) as usize;
        if idx < slots {
            marks[idx] = true;
        }
    }
    marks
}
