//! Bit-exact peripheral models for a memory-mapped timer and a framed
//! byte-link protocol engine.
//!
//! The crate is single-threaded by contract: one logical emulation thread
//! (bus dispatcher, clock source, byte transport) drives every entry point
//! synchronously. Output callbacks may re-enter a core within bounds; no
//! locking is used or needed.

/// Host-facing integration contracts.
pub mod api;
pub use api::{ByteSink, RegisterMapped};

/// Fault taxonomy for bus-visible and advisory conditions.
pub mod fault;
pub use fault::{BusFault, ConfigFault};

/// Generic bit-addressable register-bank abstraction.
pub mod regbank;
pub use regbank::{
    Access, BitField, PostWriteHook, ReadHook, Register, RegisterBank, WriteHook,
};

/// Prescaled timer core, register map, and interrupt line.
pub mod timer;
pub use timer::{
    Direction, IrqLine, RunMode, TickOutcome, TimerConfig, TimerCore, TimerState,
    AUTO_RELOAD_OFFSET, CONTROL1_OFFSET, COUNTER_OFFSET, DMA_OR_INTERRUPT_ENABLE_OFFSET,
    EVENT_GENERATION_OFFSET, PRESCALER_OFFSET, STATUS_OFFSET,
};

/// Framed byte-link protocol engine.
pub mod link;
pub use link::{
    build_frame, handler_for, CommandHandler, FramedLinkCore, CMD_SCAN, COMMAND_INDEX,
    COMMAND_TABLE, FRAME_HEADER, FRAME_OVERHEAD, LENGTH_INDEX,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
