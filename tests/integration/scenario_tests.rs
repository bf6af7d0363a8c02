//! End-to-end command scenarios over the simulated command link.

use remosquash::app::commands::FRAME_LEN;
use remosquash::app::events::ControllerEvent;
use remosquash::fsm::ProtocolState;
use remosquash::ir::frame_slots;

use super::support::{Harness, sample_frame, transmitted_slots};

// ── Identify ──────────────────────────────────────────────────

#[test]
fn identify_blinks_once_and_replies_o() {
    let mut h = Harness::canonical();
    h.send(b"i");

    assert_eq!(h.output(), b"O");
    let levels: Vec<bool> = h
        .rig
        .generic_led
        .transitions()
        .iter()
        .map(|(_, l)| *l)
        .collect();
    assert_eq!(levels, [true, false]);

    let t = h.rig.generic_led.transitions();
    let on_for = t[1].0 - t[0].0;
    assert!((100_000..100_010).contains(&on_for), "on for {on_for}us");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
    assert!(h.events.events.contains(&ControllerEvent::Identified));
}

// ── Transmit ──────────────────────────────────────────────────

#[test]
fn transmit_full_frame() {
    let mut h = Harness::canonical();
    let frame = sample_frame();

    h.send(b"t");
    assert_eq!(h.output(), b"Y");
    h.send(b"2");
    assert_eq!(h.output(), b"Y");
    h.send(&frame[..FRAME_LEN - 1]);
    assert!(h.output().is_empty(), "no reply while filling");
    assert!(h.rig.ir_out.rising_edges().is_empty(), "nothing sent early");

    h.send(&frame[FRAME_LEN - 1..]);
    assert_eq!(h.output(), b"E");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);

    let edges = h.rig.ir_out.rising_edges();
    let expected: Vec<bool> = frame_slots(&frame).collect();
    assert_eq!(transmitted_slots(&edges, expected.len()), expected);
    assert!(!h.rig.ir_out.is_high(), "LED left off");

    let blinks = h.rig.generic_led.rising_edges().len();
    assert_eq!(blinks, 2, "two completion blinks");

    let tx = h.events.events.iter().find_map(|e| match e {
        ControllerEvent::FrameTransmitted { length, elapsed_us } => Some((*length, *elapsed_us)),
        _ => None,
    });
    let (length, elapsed_us) = tx.expect("FrameTransmitted emitted");
    assert_eq!(length, FRAME_LEN);
    assert!((192_000..192_030).contains(&elapsed_us), "took {elapsed_us}us");
}

#[test]
fn transmit_reply_comes_after_the_waveform() {
    let mut h = Harness::canonical();
    h.send(b"t1");
    h.output();
    h.send(&[0x01; FRAME_LEN]);
    assert_eq!(h.output(), b"E");
    // Every pulse happened before the completion blinks started.
    let last_pulse = *h.rig.ir_out.rising_edges().last().unwrap();
    let first_blink = h.rig.generic_led.rising_edges()[0];
    assert!(last_pulse < first_blink);
}

#[test]
fn each_channel_is_accepted() {
    let mut h = Harness::canonical();
    for ch in b'1'..=b'4' {
        h.send(&[b't', ch]);
        assert_eq!(h.output(), b"YY");
        assert_eq!(
            h.ctl.protocol_state(),
            ProtocolState::Transmitting {
                length: FRAME_LEN,
                filled: 0
            }
        );
        // Complete the frame with spaces.
        h.send(&[0x00; FRAME_LEN]);
        assert_eq!(h.output(), b"E");
    }
}

#[test]
fn new_frame_does_not_carry_old_bytes() {
    let mut h = Harness::canonical();
    h.send(b"t1");
    h.send(&[0xFF; FRAME_LEN]);
    h.output();
    h.rig.ir_out.clear();

    h.send(b"t1");
    h.send(&[0x00; FRAME_LEN]);
    assert_eq!(h.output(), b"YYE");
    assert!(h.rig.ir_out.rising_edges().is_empty());
}

// ── Receive ───────────────────────────────────────────────────

#[test]
fn receive_full_frame() {
    let mut h = Harness::canonical();
    let frame = sample_frame();
    h.play_ir(&frame, 10_000);

    h.send(b"r");

    let out = h.output();
    assert_eq!(out.len(), 2 + FRAME_LEN + 1);
    assert_eq!(&out[..2], b"YS");
    assert_eq!(&out[2..2 + FRAME_LEN], frame.as_slice());
    assert_eq!(out[2 + FRAME_LEN], b'E');
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
    assert_eq!(h.rig.generic_led.rising_edges().len(), 2);
}

#[test]
fn receive_waits_for_the_frame() {
    let mut h = Harness::canonical();
    let frame = sample_frame();
    h.play_ir(&frame, 500_000);
    let before = h.rig.clock.peek();

    h.send(b"r");

    assert!(h.rig.clock.peek() - before >= 500_000 + 192_000);
    let out = h.output();
    assert_eq!(&out[2..2 + FRAME_LEN], frame.as_slice());
}

// ── Proximity ─────────────────────────────────────────────────

#[test]
fn short_presence_does_not_report() {
    let mut h = Harness::canonical();
    h.send(b"q");
    assert!(h.ctl.sensor_armed());

    h.rig.range.set(500);
    h.idle_for(650, 1_000);
    h.rig.range.set(100);
    h.idle_for(100, 1_000);

    assert!(h.output().is_empty());
    assert!(h.ctl.sensor_armed());
}

#[test]
fn sustained_presence_reports_once() {
    let mut h = Harness::canonical();
    h.send(b"q");
    h.rig.range.set(500);
    h.idle_for(750, 1_000);

    assert_eq!(h.output(), b"P");
    assert_eq!(h.rig.link.unflushed(), 0);
    assert!(!h.ctl.sensor_armed());

    h.idle_for(1_000, 1_000);
    assert!(h.output().is_empty(), "needs re-arm");

    h.send(b"q");
    h.idle_for(750, 1_000);
    assert_eq!(h.output(), b"P");
}

#[test]
fn unarmed_sensor_is_silent() {
    let mut h = Harness::canonical();
    h.rig.range.set(1_000);
    h.idle_for(2_000, 1_000);
    assert!(h.output().is_empty());
}

#[test]
fn detection_still_fires_between_commands() {
    let mut h = Harness::canonical();
    h.send(b"q");
    h.rig.range.set(900);
    h.idle_for(300, 1_000);
    h.send(b"a");
    h.idle_for(450, 1_000);
    assert_eq!(h.output(), b"P");
    assert!(h.ctl.activity_on());
}

// ── Activity indicator ────────────────────────────────────────

#[test]
fn activity_commands_are_silent() {
    let mut h = Harness::canonical();
    h.send(b"a");
    assert!(h.rig.active_led.is_high());
    h.send(b"b");
    assert!(!h.rig.active_led.is_high());
    assert!(h.output().is_empty());
}

// ── Protocol errors ───────────────────────────────────────────

#[test]
fn unknown_byte_then_recovery() {
    let mut h = Harness::canonical();
    h.send(b"x");
    assert_eq!(h.output(), b"?");
    h.send(b"i");
    assert_eq!(h.output(), b"O");
}

#[test]
fn bad_channel_returns_to_idle() {
    let mut h = Harness::canonical();
    h.send(b"t5");
    assert_eq!(h.output(), b"Y?");
    assert_eq!(h.ctl.protocol_state(), ProtocolState::Idle);
    assert!(h.rig.ir_out.rising_edges().is_empty());
}

#[test]
fn sized_commands_are_errors_in_canonical_mode() {
    let mut h = Harness::canonical();
    h.send(b"u");
    h.send(b"s");
    assert_eq!(h.output(), b"??");
}
