use thiserror::Error;

/// Bus-visible access failure surfaced to the external interconnect.
///
/// The core never decides fatality: the bus collaborator that decoded the
/// address chooses whether an unmapped access aborts the transaction or is
/// silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusFault {
    /// Access decoded to a byte offset with no mapped register.
    #[error("no register mapped at offset {offset:#06x}")]
    UnmappedRegister {
        /// Byte offset presented by the bus.
        offset: u32,
    },
}

/// Advisory configuration fault latched by the timer for the host to drain.
///
/// Never fatal: the offending operation is skipped and the peripheral keeps
/// running. `reset()` clears the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ConfigFault {
    /// A forced update was requested while the counter direction is not
    /// ascending, which this timer variant does not support.
    #[error("forced update requires an ascending counter direction")]
    UnsupportedDirection,
}
