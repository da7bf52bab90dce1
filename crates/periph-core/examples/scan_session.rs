//! Minimal host session wiring both peripheral cores.
//!
//! Feeds a scan frame to the link engine byte-by-byte, then runs the timer
//! through one interrupt period and services the flag.
//!
//! ```sh
//! cargo run -p periph-core --example scan_session
//! ```

use periph_core::{
    ByteSink, Direction, FramedLinkCore, RegisterMapped, TickOutcome, TimerConfig, TimerCore,
    CMD_SCAN, CONTROL1_OFFSET, DMA_OR_INTERRUPT_ENABLE_OFFSET, STATUS_OFFSET,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

struct StdoutSink;

impl ByteSink for StdoutSink {
    fn emit(&mut self, byte: u8) {
        print!("{byte:02X} ");
    }
}

fn main() {
    let mut link = FramedLinkCore::new();
    let mut sink = StdoutSink;

    println!("scan command -> reply:");
    for byte in [0xBC, 0xCF, CMD_SCAN, 0x01, 0x00, 0x00, 0x00] {
        link.ingest(byte, &mut sink);
    }
    println!();

    let mut timer = TimerCore::new(TimerConfig {
        initial_limit: 8,
        direction: Direction::Ascending,
    });
    timer
        .write32(DMA_OR_INTERRUPT_ENABLE_OFFSET, 1)
        .expect("interrupt-enable register is mapped");
    timer
        .write32(CONTROL1_OFFSET, 1)
        .expect("control register is mapped");

    let mut ticks = 0u32;
    while timer.tick() != TickOutcome::Reloaded {
        ticks += 1;
    }
    println!("reload after {} ticks, irq={}", ticks + 1, timer.irq_asserted());

    timer
        .write32(STATUS_OFFSET, 0)
        .expect("status register is mapped");
    println!("flag serviced, irq={}", timer.irq_asserted());
}
