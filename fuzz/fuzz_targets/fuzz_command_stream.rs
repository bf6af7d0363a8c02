//! Fuzz target: `CommandProtocol::step`
//!
//! Drives arbitrary byte streams through the command state machine under
//! both protocol variants and asserts that it never panics, never fills a
//! frame past its length, and always answers a rejected byte from Idle.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use remosquash::app::commands::FRAME_LEN;
use remosquash::config::ProtocolVariant;
use remosquash::fsm::{Action, CommandProtocol, ProtocolState};

fuzz_target!(|data: &[u8]| {
    for variant in [ProtocolVariant::Canonical, ProtocolVariant::Sized] {
        let mut protocol = CommandProtocol::new(variant);
        let mut payload = 0usize;

        for &byte in data {
            let action = protocol.step(byte);
            match action {
                Action::Reject => assert_eq!(protocol.state(), ProtocolState::Idle),
                Action::OpenFrame { length, .. } => {
                    assert!(length > 0 && length <= FRAME_LEN);
                    payload = 0;
                }
                Action::Append(_) => payload += 1,
                Action::AppendAndTransmit { length, .. } => {
                    assert_eq!(payload + 1, FRAME_LEN, "frame closed early or late");
                    assert!(length > 0 && length <= FRAME_LEN);
                    assert_eq!(protocol.state(), ProtocolState::Idle);
                }
                Action::Receive { length } => assert!(length > 0),
                _ => {}
            }
            if let ProtocolState::Transmitting { length, filled } = protocol.state() {
                assert!(filled < FRAME_LEN && length <= FRAME_LEN);
            }
        }
    }
});
