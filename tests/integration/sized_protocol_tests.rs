//! The sized protocol variant: `u` / `s` carry a frame size byte.

use remosquash::app::commands::{FRAME_LEN, SIZE_UNIT};
use remosquash::config::{FirmwareConfig, ProtocolVariant};
use remosquash::fsm::ProtocolState;
use remosquash::ir::frame_slots;

use super::support::{Harness, transmitted_slots};

fn sized() -> Harness {
    Harness::new(FirmwareConfig {
        protocol_variant: ProtocolVariant::Sized,
        ..FirmwareConfig::default()
    })
}

#[test]
fn sized_transmit_sends_prefix_of_full_frame() {
    let mut h = sized();
    let frame: Vec<u8> = (0..2 * SIZE_UNIT).map(|i| (i as u8) | 0x01).collect();

    h.send(&[b'u', 2, b'3']);
    assert_eq!(h.output(), b"YYY");
    assert_eq!(
        h.ctl.protocol_state(),
        ProtocolState::Transmitting {
            length: 32,
            filled: 0
        }
    );

    // The host still sends a whole frame; bytes past the size are data.
    h.send(&frame);
    assert!(h.output().is_empty());
    let tail: Vec<u8> = b"ixra?\x00".iter().copied().cycle().take(FRAME_LEN - frame.len()).collect();
    h.send(&tail);
    assert_eq!(h.output(), b"E");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
    assert!(!h.ctl.activity_on());

    let expected: Vec<bool> = frame_slots(&frame).collect();
    let edges = h.rig.ir_out.rising_edges();
    assert_eq!(transmitted_slots(&edges, expected.len()), expected);
    let last_slot = (edges[edges.len() - 1] - edges[0]) / 100;
    assert!((last_slot as usize) < expected.len(), "tail bytes went out over IR");
}

#[test]
fn largest_sized_transmit_fills_whole_buffer() {
    let mut h = sized();
    h.send(&[b'u', 15, b'1']);
    h.send(&[0x00; 240]);
    assert_eq!(h.output(), b"YYYE");
}

#[test]
fn sized_transmit_rejects_out_of_range_sizes() {
    let mut h = sized();
    h.send(&[b'u', 0]);
    assert_eq!(h.output(), b"Y?");
    h.send(&[b'u', 16]);
    assert_eq!(h.output(), b"Y?");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
}

#[test]
fn sized_receive_returns_to_idle() {
    let mut h = sized();
    let frame: Vec<u8> = (0..SIZE_UNIT as u8).map(|i| i.wrapping_mul(29) | 0x01).collect();
    h.play_ir(&frame, 5_000);

    h.send(&[b's', 1]);

    let out = h.output();
    assert_eq!(&out[..3], b"YYS");
    assert_eq!(&out[3..3 + SIZE_UNIT], frame.as_slice());
    assert_eq!(out[3 + SIZE_UNIT], b'E');
    assert_eq!(out.len(), 3 + SIZE_UNIT + 1);
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);

    h.send(b"i");
    assert_eq!(h.output(), b"O");
}

#[test]
fn sized_receive_rejects_zero() {
    let mut h = sized();
    h.send(&[b's', 0]);
    assert_eq!(h.output(), b"Y?");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
}

#[test]
fn canonical_commands_still_work() {
    let mut h = sized();
    h.send(b"t1");
    h.send(&[0x00; 240]);
    assert_eq!(h.output(), b"YYE");
    h.send(b"x");
    assert_eq!(h.output(), b"?");
}
