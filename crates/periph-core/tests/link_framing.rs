//! Framing-engine coverage: frame completion, command dispatch, reply
//! construction, and robustness over arbitrary transport input.

use periph_core::{
    build_frame, ByteSink, CommandHandler, FramedLinkCore, CMD_SCAN, COMMAND_INDEX, COMMAND_TABLE,
    FRAME_HEADER, FRAME_OVERHEAD, LENGTH_INDEX,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[derive(Default)]
struct Capture {
    bytes: Vec<u8>,
}

impl ByteSink for Capture {
    fn emit(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

const SCAN_REPLY: [u8; 7] = [0xBC, 0xCF, 0x20, 0x01, 0x00, 0x21, 0x62];

fn feed(link: &mut FramedLinkCore, bytes: &[u8]) -> Vec<u8> {
    let mut sink = Capture::default();
    for byte in bytes {
        link.ingest(*byte, &mut sink);
    }
    sink.bytes
}

#[test]
fn wire_constants_match_the_device_contract() {
    assert_eq!(FRAME_HEADER, [0xBC, 0xCF]);
    assert_eq!(COMMAND_INDEX, 2);
    assert_eq!(LENGTH_INDEX, 3);
    assert_eq!(FRAME_OVERHEAD, 6);
    assert_eq!(COMMAND_TABLE, [(CMD_SCAN, CommandHandler::ScanReply)]);
}

#[test]
fn scan_command_yields_the_canonical_reply_for_any_checksum_bytes() {
    for (x, y) in [(0x00, 0x00), (0x21, 0x62), (0xAB, 0xCD), (0xFF, 0xFF)] {
        let mut link = FramedLinkCore::new();
        let emitted = feed(&mut link, &[0xBC, 0xCF, CMD_SCAN, 0x01, 0x00, x, y]);
        assert_eq!(emitted, SCAN_REPLY);
        assert!(link.pending().is_empty());
    }
}

#[test]
fn non_scan_six_byte_frame_echoes_exactly() {
    let mut link = FramedLinkCore::new();
    let frame = [0xBC, 0xCF, 0x05, 0x00, 0x9A, 0x3C];
    let emitted = feed(&mut link, &frame);
    assert_eq!(emitted, frame);
    assert!(link.pending().is_empty());
}

#[test]
fn nothing_is_emitted_before_the_frame_completes() {
    let mut link = FramedLinkCore::new();
    let frame = build_frame(0x11, &[1, 2, 3]);

    let emitted = feed(&mut link, &frame[..frame.len() - 1]);
    assert!(emitted.is_empty());
    assert_eq!(link.pending().len(), frame.len() - 1);

    let mut sink = Capture::default();
    link.ingest(frame[frame.len() - 1], &mut sink);
    assert_eq!(sink.bytes, frame);
}

#[test]
fn declared_length_is_trusted_without_a_cap() {
    // The length byte alone sizes the frame; no header or checksum check.
    let mut link = FramedLinkCore::new();
    let mut frame = vec![0x00, 0x00, 0x42, 0xFF];
    frame.extend(std::iter::repeat_n(0xEE, 0xFF + 2));
    assert_eq!(frame.len(), 0xFF + FRAME_OVERHEAD);

    let emitted = feed(&mut link, &frame);
    assert_eq!(emitted, frame);
}

#[test]
fn constructed_frames_carry_the_declared_length() {
    let frame = build_frame(0x07, &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(frame.len(), 4 + FRAME_OVERHEAD);
    assert_eq!(&frame[..2], &FRAME_HEADER);
    assert_eq!(frame[COMMAND_INDEX], 0x07);
    assert_eq!(frame[LENGTH_INDEX], 4);
    assert_eq!(&frame[4..8], &[0xDE, 0xAD, 0xBE, 0xEF]);
}

proptest! {
    #[test]
    fn property_non_scan_frames_echo_verbatim(
        command in any::<u8>().prop_filter("non-scan", |c| *c != CMD_SCAN),
        payload in prop::collection::vec(any::<u8>(), 0..=64),
        ck1 in any::<u8>(),
        ck2 in any::<u8>(),
    ) {
        let mut frame = vec![FRAME_HEADER[0], FRAME_HEADER[1], command];
        #[allow(clippy::cast_possible_truncation)]
        frame.push(payload.len() as u8);
        frame.extend_from_slice(&payload);
        frame.push(ck1);
        frame.push(ck2);

        let mut link = FramedLinkCore::new();
        let emitted = feed(&mut link, &frame);
        prop_assert_eq!(emitted, frame);
        prop_assert!(link.pending().is_empty());
        prop_assert_eq!(link.expected_total(), None);
    }

    #[test]
    fn property_ingest_never_panics_on_arbitrary_streams(
        stream in prop::collection::vec(any::<u8>(), 0..=512),
    ) {
        let mut link = FramedLinkCore::new();
        let mut sink = Capture::default();
        for byte in stream {
            link.ingest(byte, &mut sink);
        }
    }

    #[test]
    fn property_checksum_recurrence_matches_an_independent_model(
        command in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 0..=32),
    ) {
        let frame = build_frame(command, &payload);

        let mut ck1 = 0u8;
        let mut ck2 = 0u8;
        for byte in &frame[COMMAND_INDEX..payload.len() + 4] {
            ck1 = ck1.wrapping_add(*byte);
            ck2 = ck2.wrapping_add(ck1);
        }
        prop_assert_eq!(frame[payload.len() + 4], ck1);
        prop_assert_eq!(frame[payload.len() + 5], ck2);
    }
}
