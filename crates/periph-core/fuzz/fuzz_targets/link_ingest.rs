#![no_main]

use periph_core::{ByteSink, FramedLinkCore, RegisterMapped, TimerConfig, TimerCore};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct NullSink;

impl ByteSink for NullSink {
    fn emit(&mut self, _byte: u8) {}
}

fuzz_target!(|data: &[u8]| {
    let mut link = FramedLinkCore::new();
    let mut sink = NullSink;
    for byte in data {
        link.ingest(*byte, &mut sink);
    }
    link.reset();

    let mut timer = TimerCore::new(TimerConfig::default());
    for chunk in data.chunks(5) {
        if chunk.len() < 5 {
            break;
        }
        let offset = u32::from(chunk[0]) & 0x3C;
        let value = u32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        let _ = timer.write32(offset, value);
        let _ = timer.read32(offset);
        let _ = timer.tick();
    }
    timer.reset();
});
