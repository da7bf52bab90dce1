//! Counter state and tick semantics for the prescaled timer.

use crate::ConfigFault;

/// Counting direction configured for the timer.
///
/// This variant only counts up; a configured [`Direction::Descending`] is an
/// invalid configuration that the forced-update path reports as an advisory
/// [`ConfigFault`] instead of acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Direction {
    /// Counter increments toward the limit.
    #[default]
    Ascending,
    /// Counter would decrement; unsupported by this variant.
    Descending,
}

/// Automatic behavior after a reload.
///
/// The core only stores the mode: the disable-after-reload behavior of
/// one-shot operation belongs to the external clock collaborator, which
/// observes [`TickOutcome::Reloaded`] together with this mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunMode {
    /// Counting continues after each reload.
    #[default]
    Periodic,
    /// Counting is intended to stop after the first reload.
    OneShot,
}

/// Immutable construction parameters for a timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TimerConfig {
    /// Power-on value of both the active limit and the auto-reload value.
    pub initial_limit: u32,
    /// Configured counting direction.
    pub direction: Direction,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_limit: u32::MAX,
            direction: Direction::Ascending,
        }
    }
}

/// Result of delivering one clock-source tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// Counter is disabled; nothing advanced.
    Inhibited,
    /// Prescaler or counter advanced without an update event. A limit wrap
    /// suppressed by update-disable also reports this: observably, the
    /// event never happened.
    Counted,
    /// Update event: counter wrapped to zero, the active limit was reloaded
    /// from the auto-reload value, and the interrupt flag was raised when
    /// enabled.
    Reloaded,
}

/// Mutable counter and control state, mutated field-by-field by register
/// write hooks and by clock-source ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TimerState {
    counter: u32,
    divider: u32,
    prescaler_ticks: u32,
    limit: u32,
    auto_reload: u32,
    direction: Direction,
    mode: RunMode,
    enabled: bool,
    update_disabled: bool,
    update_request_source: bool,
    preload_enabled: bool,
    interrupt_enabled: bool,
    interrupt_flag: bool,
    update_requested: bool,
    config_fault: Option<ConfigFault>,
}

impl TimerState {
    /// Creates power-on state for the given configuration.
    #[must_use]
    pub const fn new(config: &TimerConfig) -> Self {
        Self {
            counter: 0,
            divider: 1,
            prescaler_ticks: 0,
            limit: config.initial_limit,
            auto_reload: config.initial_limit,
            direction: config.direction,
            mode: RunMode::Periodic,
            enabled: false,
            update_disabled: false,
            update_request_source: false,
            preload_enabled: false,
            interrupt_enabled: false,
            interrupt_flag: false,
            update_requested: false,
            config_fault: None,
        }
    }

    /// Reinitializes in place to power-on state, preserving the allocation.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reinit(&mut self, config: &TimerConfig) {
        *self = Self::new(config);
    }

    /// Current counter value.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Effective prescaler divider, always at least 1.
    #[must_use]
    pub const fn divider(&self) -> u32 {
        self.divider
    }

    /// Active limit at which the next update event fires.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Auto-reload (preload) value copied into the limit at reload.
    #[must_use]
    pub const fn auto_reload(&self) -> u32 {
        self.auto_reload
    }

    /// Configured counting direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Configured run mode.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// True while the counter advances on clock ticks.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while update events are suppressed.
    #[must_use]
    pub const fn is_update_disabled(&self) -> bool {
        self.update_disabled
    }

    /// True when only natural reloads may raise the interrupt flag.
    #[must_use]
    pub const fn update_request_source(&self) -> bool {
        self.update_request_source
    }

    /// True while auto-reload writes are deferred to the next reload.
    #[must_use]
    pub const fn is_preload_enabled(&self) -> bool {
        self.preload_enabled
    }

    /// True while update events may raise the interrupt flag.
    #[must_use]
    pub const fn is_interrupt_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    /// Latched interrupt flag; persists until explicitly cleared.
    #[must_use]
    pub const fn interrupt_flag(&self) -> bool {
        self.interrupt_flag
    }

    pub(crate) const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) const fn set_update_disabled(&mut self, disabled: bool) {
        self.update_disabled = disabled;
    }

    pub(crate) const fn set_update_request_source(&mut self, natural_only: bool) {
        self.update_request_source = natural_only;
    }

    pub(crate) const fn set_mode(&mut self, mode: RunMode) {
        self.mode = mode;
    }

    pub(crate) const fn set_preload_enabled(&mut self, enabled: bool) {
        self.preload_enabled = enabled;
    }

    pub(crate) const fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.interrupt_enabled = enabled;
    }

    pub(crate) const fn set_counter(&mut self, value: u32) {
        self.counter = value;
    }

    /// Stores a prescaler register write: the effective divider is the
    /// written value plus one, so a written zero divides by one.
    pub(crate) const fn write_prescaler(&mut self, written: u32) {
        self.divider = written.saturating_add(1);
    }

    /// Value the prescaler register reads back as.
    pub(crate) const fn prescaler_readback(&self) -> u32 {
        self.divider - 1
    }

    /// Stores an auto-reload write; takes effect on the active limit
    /// immediately unless preload is enabled, in which case the new value
    /// becomes the limit only at the next natural reload.
    pub(crate) const fn write_auto_reload(&mut self, value: u32) {
        self.auto_reload = value;
        if !self.preload_enabled {
            self.limit = value;
        }
    }

    /// Clears the latched interrupt flag (status write-zero-to-clear path).
    pub(crate) const fn clear_interrupt_flag(&mut self) {
        self.interrupt_flag = false;
    }

    /// Records a software-forced update request for the register post-write
    /// hook to apply once all fields have dispatched.
    pub(crate) const fn request_forced_update(&mut self) {
        self.update_requested = true;
    }

    /// Applies a pending software-forced update, if any.
    ///
    /// Ignored while update-disable is set. A non-ascending direction is an
    /// invalid configuration for this variant: the forced reset is skipped
    /// and an advisory fault is latched. Otherwise the counter is forced to
    /// zero immediately, bypassing the prescaler, and the interrupt flag is
    /// raised when the update-request-source bit is clear and interrupts
    /// are enabled.
    pub(crate) fn apply_forced_update(&mut self) {
        if !self.update_requested {
            return;
        }
        self.update_requested = false;
        if self.update_disabled {
            return;
        }
        if self.direction != Direction::Ascending {
            self.config_fault = Some(ConfigFault::UnsupportedDirection);
            return;
        }
        self.counter = 0;
        self.prescaler_ticks = 0;
        if !self.update_request_source && self.interrupt_enabled {
            self.interrupt_flag = true;
        }
    }

    /// Drains the advisory configuration-fault latch.
    pub(crate) const fn take_config_fault(&mut self) -> Option<ConfigFault> {
        self.config_fault.take()
    }

    /// Delivers one clock-source tick.
    ///
    /// While enabled, the counter increments once per `divider` ticks. On
    /// reaching the limit the counter wraps to zero; unless update-disable
    /// is set, the limit reloads from the auto-reload value and the
    /// interrupt flag is raised when interrupts are enabled. The update
    /// event fires exactly once per limit crossing.
    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn advance(&mut self) -> TickOutcome {
        if !self.enabled {
            return TickOutcome::Inhibited;
        }
        self.prescaler_ticks += 1;
        if self.prescaler_ticks < self.divider {
            return TickOutcome::Counted;
        }
        self.prescaler_ticks = 0;
        self.counter = self.counter.wrapping_add(1);
        if self.counter < self.limit {
            return TickOutcome::Counted;
        }
        self.counter = 0;
        if self.update_disabled {
            return TickOutcome::Counted;
        }
        self.limit = self.auto_reload;
        if self.interrupt_enabled {
            self.interrupt_flag = true;
        }
        TickOutcome::Reloaded
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&TimerConfig::default())
    }
}
