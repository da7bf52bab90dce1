//! Prescaled ascending hardware timer built on the register bank.
//!
//! Models a single-direction counter with limit/auto-reload/one-shot
//! semantics and an interrupt enable/flag pair behind the byte-offset
//! register map below. The bus collaborator normalizes access widths; every
//! access arriving here is a full 32-bit word.
//!
//! | Offset | Register             |
//! |--------|----------------------|
//! | `0x00` | Control1             |
//! | `0x0C` | DmaOrInterruptEnable |
//! | `0x10` | Status               |
//! | `0x14` | EventGeneration      |
//! | `0x24` | Counter              |
//! | `0x28` | Prescaler            |
//! | `0x2C` | AutoReload           |

/// Counter state and tick semantics.
pub mod state;

pub use state::{Direction, RunMode, TickOutcome, TimerConfig, TimerState};

use crate::{Access, BitField, BusFault, ConfigFault, Register, RegisterBank, RegisterMapped};

/// Byte offset of the Control1 register.
pub const CONTROL1_OFFSET: u32 = 0x00;
/// Byte offset of the DMA/interrupt enable register.
pub const DMA_OR_INTERRUPT_ENABLE_OFFSET: u32 = 0x0C;
/// Byte offset of the Status register.
pub const STATUS_OFFSET: u32 = 0x10;
/// Byte offset of the EventGeneration register.
pub const EVENT_GENERATION_OFFSET: u32 = 0x14;
/// Byte offset of the Counter register.
pub const COUNTER_OFFSET: u32 = 0x24;
/// Byte offset of the Prescaler register.
pub const PRESCALER_OFFSET: u32 = 0x28;
/// Byte offset of the AutoReload register.
pub const AUTO_RELOAD_OFFSET: u32 = 0x2C;

/// Single-level interrupt output: asserted as a pure function of
/// (latched flag, enable), re-derived after every register write and tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct IrqLine {
    asserted: bool,
}

impl IrqLine {
    /// Recomputes the output level from the flag/enable pair.
    pub const fn derive(&mut self, flag: bool, enable: bool) {
        self.asserted = flag && enable;
    }

    /// Current output level.
    #[must_use]
    pub const fn is_asserted(self) -> bool {
        self.asserted
    }
}

#[allow(clippy::missing_const_for_fn)]
fn read_counter_enable(state: &TimerState) -> u32 {
    u32::from(state.is_enabled())
}

#[allow(clippy::missing_const_for_fn)]
fn write_counter_enable(state: &mut TimerState, slice: u32) {
    state.set_enabled(slice != 0);
}

#[allow(clippy::missing_const_for_fn)]
fn read_update_disable(state: &TimerState) -> u32 {
    u32::from(state.is_update_disabled())
}

#[allow(clippy::missing_const_for_fn)]
fn write_update_disable(state: &mut TimerState, slice: u32) {
    state.set_update_disabled(slice != 0);
}

#[allow(clippy::missing_const_for_fn)]
fn read_update_request_source(state: &TimerState) -> u32 {
    u32::from(state.update_request_source())
}

#[allow(clippy::missing_const_for_fn)]
fn write_update_request_source(state: &mut TimerState, slice: u32) {
    state.set_update_request_source(slice != 0);
}

#[allow(clippy::missing_const_for_fn)]
fn read_one_pulse_mode(state: &TimerState) -> u32 {
    u32::from(state.mode() == RunMode::OneShot)
}

#[allow(clippy::missing_const_for_fn)]
fn write_one_pulse_mode(state: &mut TimerState, slice: u32) {
    state.set_mode(if slice == 0 {
        RunMode::Periodic
    } else {
        RunMode::OneShot
    });
}

#[allow(clippy::missing_const_for_fn)]
fn read_preload_enable(state: &TimerState) -> u32 {
    u32::from(state.is_preload_enabled())
}

#[allow(clippy::missing_const_for_fn)]
fn write_preload_enable(state: &mut TimerState, slice: u32) {
    state.set_preload_enabled(slice != 0);
}

#[allow(clippy::missing_const_for_fn)]
fn read_interrupt_enable(state: &TimerState) -> u32 {
    u32::from(state.is_interrupt_enabled())
}

#[allow(clippy::missing_const_for_fn)]
fn write_interrupt_enable(state: &mut TimerState, slice: u32) {
    state.set_interrupt_enabled(slice != 0);
}

#[allow(clippy::missing_const_for_fn)]
fn read_interrupt_flag(state: &TimerState) -> u32 {
    u32::from(state.interrupt_flag())
}

#[allow(clippy::missing_const_for_fn)]
fn write_interrupt_flag(state: &mut TimerState, slice: u32) {
    // Write-zero-to-clear: a written 1 preserves the latch.
    if slice == 0 {
        state.clear_interrupt_flag();
    }
}

#[allow(clippy::missing_const_for_fn)]
fn read_update_generation(_state: &TimerState) -> u32 {
    // Self-clearing trigger bit always reads back as zero.
    0
}

#[allow(clippy::missing_const_for_fn)]
fn write_update_generation(state: &mut TimerState, slice: u32) {
    if slice != 0 {
        state.request_forced_update();
    }
}

#[allow(clippy::missing_const_for_fn)]
fn apply_update_generation(state: &mut TimerState) {
    state.apply_forced_update();
}

#[allow(clippy::missing_const_for_fn)]
fn read_counter_value(state: &TimerState) -> u32 {
    state.counter()
}

#[allow(clippy::missing_const_for_fn)]
fn write_counter_value(state: &mut TimerState, slice: u32) {
    state.set_counter(slice);
}

#[allow(clippy::missing_const_for_fn)]
fn read_prescaler_value(state: &TimerState) -> u32 {
    state.prescaler_readback()
}

#[allow(clippy::missing_const_for_fn)]
fn write_prescaler_value(state: &mut TimerState, slice: u32) {
    state.write_prescaler(slice);
}

#[allow(clippy::missing_const_for_fn)]
fn read_auto_reload_value(state: &TimerState) -> u32 {
    state.auto_reload()
}

#[allow(clippy::missing_const_for_fn)]
fn write_auto_reload_value(state: &mut TimerState, slice: u32) {
    state.write_auto_reload(slice);
}

/// Builds the fixed register descriptor table for one timer instance.
fn build_register_bank() -> RegisterBank<TimerState> {
    RegisterBank::new(vec![
        Register::new(
            CONTROL1_OFFSET,
            "Control1",
            vec![
                BitField::new("CounterEnable", 0, 1, Access::ReadWrite)
                    .with_read_hook(read_counter_enable)
                    .with_write_hook(write_counter_enable),
                BitField::new("UpdateDisable", 1, 1, Access::ReadWrite)
                    .with_read_hook(read_update_disable)
                    .with_write_hook(write_update_disable),
                BitField::new("UpdateRequestSource", 2, 1, Access::ReadWrite)
                    .with_read_hook(read_update_request_source)
                    .with_write_hook(write_update_request_source),
                BitField::new("OnePulseMode", 3, 1, Access::ReadWrite)
                    .with_read_hook(read_one_pulse_mode)
                    .with_write_hook(write_one_pulse_mode),
                BitField::new("AutoReloadPreloadEnable", 7, 1, Access::ReadWrite)
                    .with_read_hook(read_preload_enable)
                    .with_write_hook(write_preload_enable),
            ],
        ),
        Register::new(
            DMA_OR_INTERRUPT_ENABLE_OFFSET,
            "DmaOrInterruptEnable",
            vec![
                BitField::new("UpdateInterruptEnable", 0, 1, Access::ReadWrite)
                    .with_read_hook(read_interrupt_enable)
                    .with_write_hook(write_interrupt_enable),
                // Accepted and stored; no DMA model behind it.
                BitField::new("UpdateDmaRequestEnable", 8, 1, Access::ReadWrite),
            ],
        ),
        Register::new(
            STATUS_OFFSET,
            "Status",
            vec![
                BitField::new("UpdateInterruptFlag", 0, 1, Access::WriteZeroToClear)
                    .with_read_hook(read_interrupt_flag)
                    .with_write_hook(write_interrupt_flag),
            ],
        ),
        Register::new(
            EVENT_GENERATION_OFFSET,
            "EventGeneration",
            vec![
                BitField::new("UpdateGeneration", 0, 1, Access::WriteOneToClear)
                    .with_read_hook(read_update_generation)
                    .with_write_hook(write_update_generation),
            ],
        )
        .with_post_write(apply_update_generation),
        Register::new(
            COUNTER_OFFSET,
            "Counter",
            vec![BitField::new("CounterValue", 0, 32, Access::ReadWrite)
                .with_read_hook(read_counter_value)
                .with_write_hook(write_counter_value)],
        ),
        Register::new(
            PRESCALER_OFFSET,
            "Prescaler",
            vec![BitField::new("PrescalerValue", 0, 32, Access::ReadWrite)
                .with_read_hook(read_prescaler_value)
                .with_write_hook(write_prescaler_value)],
        ),
        Register::new(
            AUTO_RELOAD_OFFSET,
            "AutoReload",
            vec![BitField::new("AutoReloadValue", 0, 32, Access::ReadWrite)
                .with_read_hook(read_auto_reload_value)
                .with_write_hook(write_auto_reload_value)],
        ),
    ])
}

/// Prescaled timer peripheral: counter state, register bank, and the
/// interrupt line it drives.
#[derive(Debug)]
pub struct TimerCore {
    config: TimerConfig,
    state: TimerState,
    bank: RegisterBank<TimerState>,
    irq: IrqLine,
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl TimerCore {
    /// Creates a timer in power-on state with the given configuration.
    #[must_use]
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::new(&config),
            bank: build_register_bank(),
            irq: IrqLine::default(),
        }
    }

    /// Read access to the counter/control state.
    #[must_use]
    pub const fn state(&self) -> &TimerState {
        &self.state
    }

    /// True while the interrupt line output is asserted.
    #[must_use]
    pub const fn irq_asserted(&self) -> bool {
        self.irq.is_asserted()
    }

    /// Drains the advisory configuration-fault latch, if one is pending.
    pub const fn take_config_fault(&mut self) -> Option<ConfigFault> {
        self.state.take_config_fault()
    }

    /// Delivers one tick from the external clock source.
    ///
    /// One-shot operation is enforced by that collaborator: on
    /// [`TickOutcome::Reloaded`] with [`RunMode::OneShot`] configured, the
    /// clock source stops ticking (or clears the enable bit) itself.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.state.advance();
        self.derive_irq();
        outcome
    }

    const fn derive_irq(&mut self) {
        self.irq.derive(
            self.state.interrupt_flag(),
            self.state.is_interrupt_enabled(),
        );
    }
}

impl RegisterMapped for TimerCore {
    fn read32(&mut self, offset: u32) -> Result<u32, BusFault> {
        self.bank.read(&self.state, offset)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), BusFault> {
        self.bank.write(&mut self.state, offset, value)?;
        self.derive_irq();
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reinit(&self.config);
        self.bank.reset();
        self.irq = IrqLine::default();
    }
}
