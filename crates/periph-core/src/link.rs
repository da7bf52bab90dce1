//! Framed byte-link protocol engine.
//!
//! Accumulates inbound bytes from the transport, determines the total frame
//! size from the length byte at a fixed position, dispatches completed
//! frames by command byte, and emits response bytes through a [`ByteSink`]
//! one at a time. Independent of the register bank.
//!
//! Wire format: `[0xBC][0xCF][command][length][payload..][ck1][ck2]`, total
//! `length + 6` bytes.
//!
//! Compatibility notes, preserved deliberately: inbound frames are not
//! checksum-validated before dispatch (only constructed frames compute the
//! checksum), and the declared length byte is trusted without a cap, so a
//! faulty sender controls receive-buffer growth. Both are hardening gaps in
//! the modeled device, not behaviors to fix here.

use crate::ByteSink;

/// Fixed two-byte frame header.
pub const FRAME_HEADER: [u8; 2] = [0xBC, 0xCF];
/// Index of the command byte within a frame.
pub const COMMAND_INDEX: usize = 2;
/// Index of the payload-length byte within a frame.
pub const LENGTH_INDEX: usize = 3;
/// Bytes of framing around the payload: header, command, length, checksums.
pub const FRAME_OVERHEAD: usize = 6;
/// Scan command byte, answered with a fixed one-byte reply frame.
pub const CMD_SCAN: u8 = 0x20;

/// Response strategy for a completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandHandler {
    /// Reply with the fixed scan frame.
    ScanReply,
    /// Echo the received frame verbatim.
    Echo,
}

/// Fixed mapping from command byte to handler; unlisted commands echo.
pub const COMMAND_TABLE: &[(u8, CommandHandler)] = &[(CMD_SCAN, CommandHandler::ScanReply)];

/// Looks up the handler for a command byte, defaulting to echo.
#[must_use]
pub fn handler_for(command: u8) -> CommandHandler {
    COMMAND_TABLE
        .iter()
        .find_map(|(entry, handler)| (*entry == command).then_some(*handler))
        .unwrap_or(CommandHandler::Echo)
}

/// Constructs an outbound frame for `command` with the given payload.
///
/// The two trailing checksum bytes are computed by the device's two-stage
/// recurrence over bytes `[2, length + 3]` in 8-bit wraparound arithmetic:
/// `ck1` accumulates the byte sum, and `ck2` accumulates `ck1`'s running
/// total at each step. `ck2` is a cumulative sum of partial sums, not an
/// independent sum of the payload; that asymmetry is the wire contract.
///
/// # Panics
///
/// Panics when the payload does not fit the one-byte length field.
#[must_use]
pub fn build_frame(command: u8, payload: &[u8]) -> Vec<u8> {
    assert!(
        payload.len() <= usize::from(u8::MAX),
        "payload must fit the one-byte length field"
    );
    #[allow(clippy::cast_possible_truncation)]
    let length = payload.len() as u8;

    let mut frame = vec![0u8; payload.len() + FRAME_OVERHEAD];
    frame[..2].copy_from_slice(&FRAME_HEADER);
    frame[COMMAND_INDEX] = command;
    frame[LENGTH_INDEX] = length;
    frame[4..4 + payload.len()].copy_from_slice(payload);

    let mut ck1 = 0u8;
    let mut ck2 = 0u8;
    for &byte in &frame[COMMAND_INDEX..payload.len() + 4] {
        ck1 = ck1.wrapping_add(byte);
        ck2 = ck2.wrapping_add(ck1);
    }
    frame[payload.len() + 4] = ck1;
    frame[payload.len() + 5] = ck2;
    frame
}

/// Byte-stream framing engine over an unreliable transport.
///
/// There is no separate "complete" state: completion is an edge-triggered
/// event detected when the buffer length reaches the declared total, which
/// immediately dispatches and clears the buffer.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FramedLinkCore {
    buffer: Vec<u8>,
    expected_total: Option<usize>,
}

impl FramedLinkCore {
    /// Creates an idle engine with an empty receive buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            expected_total: None,
        }
    }

    /// Bytes accumulated toward the current frame.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Declared total frame size, once the length byte has arrived.
    #[must_use]
    pub const fn expected_total(&self) -> Option<usize> {
        self.expected_total
    }

    /// Delivers one inbound byte from the transport.
    ///
    /// The expected total size is unbounded until the 4th byte (the length
    /// byte) arrives; it then becomes `length + 6`. On completion the frame
    /// is detached from the engine before any response byte is emitted, so
    /// a sink that feeds bytes back into `ingest` observes a fresh buffer.
    pub fn ingest(&mut self, byte: u8, sink: &mut dyn ByteSink) {
        self.buffer.push(byte);
        if self.buffer.len() == LENGTH_INDEX + 1 {
            self.expected_total = Some(usize::from(self.buffer[LENGTH_INDEX]) + FRAME_OVERHEAD);
        }
        if self.expected_total == Some(self.buffer.len()) {
            let frame = std::mem::take(&mut self.buffer);
            self.expected_total = None;
            Self::dispatch(&frame, sink);
        }
    }

    /// Clears the receive buffer and the expected-length tracker.
    ///
    /// Safe to call mid-frame and from within an output callback.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.expected_total = None;
    }

    fn dispatch(frame: &[u8], sink: &mut dyn ByteSink) {
        match handler_for(frame[COMMAND_INDEX]) {
            CommandHandler::ScanReply => {
                for byte in build_frame(CMD_SCAN, &[0x00]) {
                    sink.emit(byte);
                }
            }
            CommandHandler::Echo => {
                for byte in frame {
                    sink.emit(*byte);
                }
            }
        }
    }
}
