//! Generic bit-addressable register-bank abstraction.
//!
//! Maps byte offsets to 32-bit registers composed of named bitfields, each
//! with an access mode and optional read/write side-effect hooks over a
//! device-state type `T`. Carries no hardware semantics of its own; device
//! cores build their descriptor tables once at construction and route all
//! state mutation through plain function-pointer hooks.

use crate::BusFault;

/// Per-field access semantics applied when no write hook overrides storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Access {
    /// Stored on write, returned on read.
    ReadWrite,
    /// Writes are no-ops; write hooks are skipped entirely.
    ReadOnly,
    /// Bits written as 1 clear the latched value; 0 preserves it.
    WriteOneToClear,
    /// Bits written as 0 clear the latched value; 1 preserves it.
    WriteZeroToClear,
}

/// Read side-effect hook producing the field value from device state.
pub type ReadHook<T> = fn(&T) -> u32;
/// Write side-effect hook applying a written field slice to device state.
pub type WriteHook<T> = fn(&mut T, u32);
/// Register-level hook invoked exactly once after all fields of a write.
pub type PostWriteHook<T> = fn(&mut T);

/// A named fixed-width slice of a register with its own access semantics.
#[derive(Debug)]
pub struct BitField<T> {
    name: &'static str,
    lsb: u8,
    width: u8,
    access: Access,
    reset_value: u32,
    value: u32,
    read_hook: Option<ReadHook<T>>,
    write_hook: Option<WriteHook<T>>,
}

impl<T> BitField<T> {
    /// Creates a field with a zero reset value and no hooks.
    ///
    /// # Panics
    ///
    /// Panics when the field does not fit within a 32-bit register; field
    /// tables are built once at peripheral construction, so a bad layout is
    /// a programming error.
    #[must_use]
    pub fn new(name: &'static str, lsb: u8, width: u8, access: Access) -> Self {
        assert!(
            width >= 1 && u32::from(lsb) + u32::from(width) <= 32,
            "bitfield {name} must fit within a 32-bit register"
        );
        Self {
            name,
            lsb,
            width,
            access,
            reset_value: 0,
            value: 0,
            read_hook: None,
            write_hook: None,
        }
    }

    /// Sets the declared power-on value (masked to the field width).
    #[must_use]
    pub const fn with_reset(mut self, reset_value: u32) -> Self {
        self.reset_value = reset_value & self.mask();
        self.value = self.reset_value;
        self
    }

    /// Attaches a read side-effect hook overriding the stored value.
    #[must_use]
    pub const fn with_read_hook(mut self, hook: ReadHook<T>) -> Self {
        self.read_hook = Some(hook);
        self
    }

    /// Attaches a write side-effect hook overriding default storage.
    #[must_use]
    pub const fn with_write_hook(mut self, hook: WriteHook<T>) -> Self {
        self.write_hook = Some(hook);
        self
    }

    /// Field name as declared in the register map.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Currently latched value (ignores any read hook).
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Bit mask of the field width, right-aligned.
    #[allow(clippy::cast_possible_truncation)]
    const fn mask(&self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// Extracts this field's slice from a full register word.
    const fn extract(&self, word: u32) -> u32 {
        (word >> self.lsb) & self.mask()
    }

    /// Applies default access-mode storage for a written slice.
    #[allow(clippy::missing_const_for_fn)]
    fn store(&mut self, slice: u32) {
        match self.access {
            Access::ReadWrite => self.value = slice,
            Access::ReadOnly => {}
            Access::WriteOneToClear => self.value &= !slice & self.mask(),
            Access::WriteZeroToClear => self.value &= slice,
        }
    }

    fn read_into(&self, state: &T) -> u32 {
        let value = self.read_hook.map_or(self.value, |hook| hook(state));
        (value & self.mask()) << self.lsb
    }

    fn dispatch_write(&mut self, state: &mut T, word: u32) {
        if matches!(self.access, Access::ReadOnly) {
            return;
        }
        let slice = self.extract(word);
        match self.write_hook {
            Some(hook) => hook(state, slice),
            None => self.store(slice),
        }
    }

    #[allow(clippy::missing_const_for_fn)]
    fn reset(&mut self) {
        self.value = self.reset_value;
    }
}

/// An ordered set of non-overlapping bitfields at one register offset.
///
/// Bit ranges not covered by any field are reserved: ignored on write and
/// read as zero.
#[derive(Debug)]
pub struct Register<T> {
    offset: u32,
    name: &'static str,
    fields: Vec<BitField<T>>,
    post_write: Option<PostWriteHook<T>>,
}

impl<T> Register<T> {
    /// Builds a register from fields in ascending bit order.
    ///
    /// # Panics
    ///
    /// Panics when fields overlap or are out of ascending order; register
    /// tables are built once at peripheral construction.
    #[must_use]
    pub fn new(offset: u32, name: &'static str, fields: Vec<BitField<T>>) -> Self {
        let mut next_free = 0u32;
        for field in &fields {
            assert!(
                u32::from(field.lsb) >= next_free,
                "register {name} fields must be ascending and non-overlapping"
            );
            next_free = u32::from(field.lsb) + u32::from(field.width);
        }
        Self {
            offset,
            name,
            fields,
            post_write: None,
        }
    }

    /// Attaches a hook invoked exactly once after all fields of a write.
    #[must_use]
    pub const fn with_post_write(mut self, hook: PostWriteHook<T>) -> Self {
        self.post_write = Some(hook);
        self
    }

    /// Register name as declared in the register map.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Byte offset this register is mapped at.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    fn read_word(&self, state: &T) -> u32 {
        self.fields
            .iter()
            .fold(0, |word, field| word | field.read_into(state))
    }

    fn write_word(&mut self, state: &mut T, word: u32) {
        for field in &mut self.fields {
            field.dispatch_write(state, word);
        }
        if let Some(hook) = self.post_write {
            hook(state);
        }
    }

    fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
    }
}

/// Offset-indexed table of registers over a device-state type `T`.
#[derive(Debug)]
pub struct RegisterBank<T> {
    registers: Vec<Register<T>>,
}

impl<T> RegisterBank<T> {
    /// Builds a bank from a fixed register table.
    ///
    /// # Panics
    ///
    /// Panics when two registers share a byte offset.
    #[must_use]
    pub fn new(registers: Vec<Register<T>>) -> Self {
        for (index, register) in registers.iter().enumerate() {
            assert!(
                registers[..index]
                    .iter()
                    .all(|other| other.offset != register.offset),
                "register offsets must be unique"
            );
        }
        Self { registers }
    }

    /// Assembles the 32-bit word at `offset` from each field's current value
    /// or its read hook's result. Reserved bits read as zero.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault::UnmappedRegister`] when no register is mapped at
    /// `offset`.
    pub fn read(&self, state: &T, offset: u32) -> Result<u32, BusFault> {
        self.registers
            .iter()
            .find(|register| register.offset == offset)
            .map(|register| register.read_word(state))
            .ok_or(BusFault::UnmappedRegister { offset })
    }

    /// Dispatches `word` to the register at `offset`: each field in ascending
    /// bit order receives its slice through its write hook or default
    /// storage, then the post-write hook runs once. Reserved bits are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault::UnmappedRegister`] when no register is mapped at
    /// `offset`.
    pub fn write(&mut self, state: &mut T, offset: u32, word: u32) -> Result<(), BusFault> {
        self.registers
            .iter_mut()
            .find(|register| register.offset == offset)
            .map(|register| register.write_word(state, word))
            .ok_or(BusFault::UnmappedRegister { offset })
    }

    /// Restores every field to its declared power-on value.
    pub fn reset(&mut self) {
        for register in &mut self.registers {
            register.reset();
        }
    }

    /// Looks up a field's latched value by register offset and field name.
    #[must_use]
    pub fn field_value(&self, offset: u32, name: &str) -> Option<u32> {
        self.registers
            .iter()
            .find(|register| register.offset == offset)?
            .fields
            .iter()
            .find(|field| field.name == name)
            .map(BitField::value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, BitField, Register, RegisterBank};
    use crate::BusFault;

    /// Synthetic device state for observing hook dispatch.
    #[derive(Debug, Default)]
    struct Probe {
        stored: u32,
        write_log: Vec<u32>,
        post_writes: u32,
    }

    fn read_stored(state: &Probe) -> u32 {
        state.stored
    }

    fn write_logged(state: &mut Probe, slice: u32) {
        state.stored = slice;
        state.write_log.push(slice);
    }

    fn count_post_write(state: &mut Probe) {
        state.post_writes += 1;
    }

    fn plain_bank() -> RegisterBank<Probe> {
        RegisterBank::new(vec![Register::new(
            0x00,
            "Plain",
            vec![
                BitField::new("Low", 0, 4, Access::ReadWrite),
                BitField::new("High", 8, 4, Access::ReadWrite).with_reset(0xA),
            ],
        )])
    }

    #[test]
    fn read_write_fields_round_trip_through_default_storage() {
        let mut state = Probe::default();
        let mut bank = plain_bank();

        bank.write(&mut state, 0x00, 0x0000_0F0F).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0x0000_0F0F);
    }

    #[test]
    fn reserved_bits_are_ignored_on_write_and_read_as_zero() {
        let mut state = Probe::default();
        let mut bank = plain_bank();

        bank.write(&mut state, 0x00, 0xFFFF_FFFF).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0x0000_0F0F);
    }

    #[test]
    fn read_only_fields_skip_hooks_and_storage() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Id",
            vec![BitField::new("Revision", 0, 8, Access::ReadOnly)
                .with_reset(0x42)
                .with_write_hook(write_logged)],
        )]);

        bank.write(&mut state, 0x00, 0xFF).unwrap();
        assert!(state.write_log.is_empty());
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0x42);
    }

    #[test]
    fn write_one_to_clear_preserves_on_zero_and_clears_on_one() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Latch",
            vec![BitField::new("Flags", 0, 4, Access::WriteOneToClear).with_reset(0xF)],
        )]);

        bank.write(&mut state, 0x00, 0b0000).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0xF);

        bank.write(&mut state, 0x00, 0b0101).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0b1010);
    }

    #[test]
    fn write_zero_to_clear_preserves_on_one_and_clears_on_zero() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Latch",
            vec![BitField::new("Flags", 0, 4, Access::WriteZeroToClear).with_reset(0xF)],
        )]);

        bank.write(&mut state, 0x00, 0b1111).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0xF);

        bank.write(&mut state, 0x00, 0b0110).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0b0110);
    }

    #[test]
    fn hooks_receive_the_field_slice_and_override_storage() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Hooked",
            vec![BitField::new("Value", 4, 8, Access::ReadWrite)
                .with_read_hook(read_stored)
                .with_write_hook(write_logged)],
        )]);

        bank.write(&mut state, 0x00, 0x0000_0AB0).unwrap();
        assert_eq!(state.write_log, vec![0xAB]);
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0x0000_0AB0);
    }

    #[test]
    fn post_write_hook_runs_exactly_once_per_word_write() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Multi",
            vec![
                BitField::new("A", 0, 1, Access::ReadWrite),
                BitField::new("B", 1, 1, Access::ReadWrite),
                BitField::new("C", 2, 1, Access::ReadWrite),
            ],
        )
        .with_post_write(count_post_write)]);

        bank.write(&mut state, 0x00, 0b111).unwrap();
        assert_eq!(state.post_writes, 1);
    }

    #[test]
    fn unmapped_offset_is_surfaced_to_the_caller() {
        let mut state = Probe::default();
        let mut bank = plain_bank();

        assert_eq!(
            bank.read(&state, 0x30),
            Err(BusFault::UnmappedRegister { offset: 0x30 })
        );
        assert_eq!(
            bank.write(&mut state, 0x30, 0),
            Err(BusFault::UnmappedRegister { offset: 0x30 })
        );
    }

    #[test]
    fn reset_restores_declared_power_on_values() {
        let mut state = Probe::default();
        let mut bank = plain_bank();

        bank.write(&mut state, 0x00, 0x0000_0F0F).unwrap();
        bank.reset();
        assert_eq!(bank.read(&state, 0x00).unwrap(), 0x0000_0A00);
    }

    #[test]
    fn full_width_field_masks_correctly() {
        let mut state = Probe::default();
        let mut bank = RegisterBank::new(vec![Register::new(
            0x00,
            "Wide",
            vec![BitField::new("Word", 0, 32, Access::ReadWrite)],
        )]);

        bank.write(&mut state, 0x00, u32::MAX).unwrap();
        assert_eq!(bank.read(&state, 0x00).unwrap(), u32::MAX);
    }

    #[test]
    fn field_value_lookup_reports_latched_values() {
        let mut state = Probe::default();
        let mut bank = plain_bank();

        bank.write(&mut state, 0x00, 0x0000_0003).unwrap();
        assert_eq!(bank.field_value(0x00, "Low"), Some(3));
        assert_eq!(bank.field_value(0x00, "High"), Some(0xA));
        assert_eq!(bank.field_value(0x00, "Missing"), None);
        assert_eq!(bank.field_value(0x10, "Low"), None);
    }

    #[test]
    #[should_panic(expected = "ascending and non-overlapping")]
    fn overlapping_fields_are_rejected_at_construction() {
        let _ = Register::<Probe>::new(
            0x00,
            "Bad",
            vec![
                BitField::new("A", 0, 4, Access::ReadWrite),
                BitField::new("B", 2, 4, Access::ReadWrite),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "offsets must be unique")]
    fn duplicate_register_offsets_are_rejected_at_construction() {
        let _ = RegisterBank::<Probe>::new(vec![
            Register::new(0x00, "A", vec![]),
            Register::new(0x00, "B", vec![]),
        ]);
    }
}
