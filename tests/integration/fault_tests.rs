//! Hardware faults.  Command-path faults put the protocol back in Idle;
//! sensor faults are reported and leave it alone.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use remosquash::app::events::ControllerEvent;
use remosquash::app::service::{Board, Controller};
use remosquash::config::FirmwareConfig;
use remosquash::error::{Error, SensorError, TransportError};
use remosquash::fsm::ProtocolState;
use remosquash::sim::{EventRecorder, SimAdc, SimClock, SimInputPin, SimOutputPin};
use remosquash::transport::Transport;

/// Link whose writes can be made to fail.
#[derive(Clone, Default)]
struct FlakyLink {
    inbound: Rc<RefCell<VecDeque<u8>>>,
    fail_writes: Rc<Cell<bool>>,
    written: Rc<RefCell<Vec<u8>>>,
}

impl Transport for FlakyLink {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut inbound = self.inbound.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            let Some(b) = inbound.pop_front() else { break };
            buf[n] = b;
            n += 1;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        if self.fail_writes.get() {
            return Err(());
        }
        self.written.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.inbound.borrow().is_empty()
    }
}

type FlakyController =
    Controller<SimOutputPin, SimInputPin, SimAdc, SimOutputPin, SimClock, FlakyLink>;

fn build() -> (FlakyController, FlakyLink, SimAdc) {
    let clock = SimClock::new(1);
    let link = FlakyLink::default();
    let adc = SimAdc::new();
    let board = Board {
        ir_out: SimOutputPin::new(&clock),
        ir_in: SimInputPin::new(&clock),
        range: adc.clone(),
        generic_led: SimOutputPin::new(&clock),
        active_led: SimOutputPin::new(&clock),
        clock,
    };
    let ctl = Controller::new(board, link.clone(), FirmwareConfig::default()).unwrap();
    (ctl, link, adc)
}

#[test]
fn failed_reply_resets_protocol() {
    let (mut ctl, link, _) = build();
    let mut rec = EventRecorder::new();
    link.fail_writes.set(true);
    link.inbound.borrow_mut().push_back(b't');

    let err = ctl.poll(&mut rec).unwrap_err();
    assert_eq!(err, Error::Transport(TransportError::WriteFailed));
    assert_eq!(ctl.protocol_state(), ProtocolState::Idle);
    assert!(rec.events.contains(&ControllerEvent::Fault(err)));
}

#[test]
fn controller_keeps_working_after_fault() {
    let (mut ctl, link, _) = build();
    let mut rec = EventRecorder::new();
    link.fail_writes.set(true);
    link.inbound.borrow_mut().push_back(b'i');
    assert!(ctl.poll(&mut rec).is_err());

    link.fail_writes.set(false);
    link.inbound.borrow_mut().push_back(b'i');
    ctl.poll(&mut rec).unwrap();
    assert_eq!(link.written.borrow().as_slice(), b"O");
}

#[test]
fn command_letters_inside_payload_are_data() {
    let (mut ctl, link, _) = build();
    let mut rec = EventRecorder::new();
    for &b in b"t1qi?" {
        link.inbound.borrow_mut().push_back(b);
        ctl.poll(&mut rec).unwrap();
    }
    assert_eq!(
        ctl.protocol_state(),
        ProtocolState::Transmitting {
            length: 240,
            filled: 3
        }
    );
    assert!(!ctl.sensor_armed());
    assert_eq!(ctl.buffered(), b"qi?");
    assert_eq!(link.written.borrow().as_slice(), b"YY");
}

#[test]
fn sensor_fault_mid_fill_keeps_frame() {
    let (mut ctl, link, adc) = build();
    let mut rec = EventRecorder::new();
    for &b in b"qt1\x10\x20" {
        link.inbound.borrow_mut().push_back(b);
        ctl.poll(&mut rec).unwrap();
    }

    adc.set_failing(true);
    let err = ctl.poll(&mut rec).unwrap_err();
    assert_eq!(err, Error::Sensor(SensorError::AdcReadFailed));
    assert_eq!(rec.events.last(), Some(&ControllerEvent::Fault(err)));
    assert_eq!(
        ctl.protocol_state(),
        ProtocolState::Transmitting {
            length: 240,
            filled: 2
        }
    );

    // The rest of the payload is still data, even while the sensor fails.
    for &b in b"ixa" {
        link.inbound.borrow_mut().push_back(b);
        assert!(ctl.poll(&mut rec).is_err());
    }
    assert_eq!(ctl.buffered(), b"\x10\x20ixa");
    assert!(!ctl.activity_on());
    assert_eq!(link.written.borrow().as_slice(), b"YY");
}
