//! Host-facing integration contracts for embedding the peripheral cores.
//!
//! Everything here is driven by exactly one logical emulation thread: the
//! external bus dispatcher, clock source, and byte transport call in
//! synchronously and never concurrently. Output notifications are in-line
//! invocations of these traits and may re-enter a core within bounds.

use crate::BusFault;

/// Word-granular register access seam driven by the external bus.
///
/// The interconnect decodes addresses and normalizes access widths before
/// calling in; a core only ever sees full 32-bit words at register byte
/// offsets.
pub trait RegisterMapped {
    /// Reads the 32-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault::UnmappedRegister`] when no register is mapped at
    /// `offset`; the caller decides whether that is fatal.
    fn read32(&mut self, offset: u32) -> Result<u32, BusFault>;

    /// Writes the 32-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault::UnmappedRegister`] when no register is mapped at
    /// `offset`; the caller decides whether that is fatal.
    fn write32(&mut self, offset: u32, value: u32) -> Result<(), BusFault>;

    /// Restores power-on state without destroying the register structure.
    ///
    /// Must be safe to call from any reachable state, including from within
    /// an output callback.
    fn reset(&mut self);
}

/// Synchronous single-byte output channel for link responses.
///
/// [`emit`](Self::emit) is invoked once per outbound byte, in order, while
/// the inbound `ingest` call is still on the stack. Implementations may feed
/// bytes back into a core; the link detaches a completed frame before
/// emitting, so bounded reentrancy cannot corrupt the receive buffer.
pub trait ByteSink {
    /// Consumes one outbound byte.
    fn emit(&mut self, byte: u8);
}
