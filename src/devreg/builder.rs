#![allow(unsafe_code)]

use crate::devreg::{
    bus::{Mmio, RegisterBus},
    device::I2cDevReg,
    irq::IrqController,
};

// Builder states
pub struct NeedBus;
pub struct Ready<B: RegisterBus>(B);

/// Start-up settings applied by [`DevRegBuilder::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DevRegConfig {
    /// Value written to UPDATE_ENA.
    pub auto_update: bool,
    /// Acknowledge a fail latch left over from before start-up.
    pub reset_fail_on_start: bool,
    /// Interrupts to enable, if any.
    pub irq_mask: Option<u32>,
}

impl Default for DevRegConfig {
    fn default() -> Self {
        Self {
            auto_update: true,
            reset_fail_on_start: false,
            irq_mask: None,
        }
    }
}

/// Type-state builder for an [`I2cDevReg`].
///
/// ```
/// use i2c_devreg::devreg::{DevRegBuilder, RegisterBus};
/// # struct Bus;
/// # impl RegisterBus for Bus {
/// #     fn read32(&self, _: usize) -> u32 { 0 }
/// #     fn write32(&self, _: usize, _: u32) {}
/// # }
///
/// let dev = DevRegBuilder::new()
///     .bus(Bus)
///     .auto_update(false)
///     .build();
/// assert!(!dev.is_fifo_full());
/// ```
pub struct DevRegBuilder<State> {
    config: DevRegConfig,
    state: State,
}

impl DevRegBuilder<NeedBus> {
    pub fn new() -> Self {
        DevRegBuilder {
            config: DevRegConfig::default(),
            state: NeedBus,
        }
    }

    pub fn bus<B: RegisterBus>(self, bus: B) -> DevRegBuilder<Ready<B>> {
        DevRegBuilder {
            config: self.config,
            state: Ready(bus),
        }
    }

    /// Use the instance memory-mapped at `base`.
    ///
    /// # Safety
    /// See [`Mmio::new`].
    pub unsafe fn mmio(self, base: usize) -> DevRegBuilder<Ready<Mmio>> {
        self.bus(unsafe { Mmio::new(base) })
    }
}

impl Default for DevRegBuilder<NeedBus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RegisterBus> DevRegBuilder<Ready<B>> {
    /// Enable or disable update passes at start-up. Defaults to enabled.
    pub fn auto_update(mut self, enabled: bool) -> Self {
        self.config.auto_update = enabled;
        self
    }

    /// Acknowledge a stale fail latch at start-up. Defaults to off.
    pub fn reset_fail_on_start(mut self, reset: bool) -> Self {
        self.config.reset_fail_on_start = reset;
        self
    }

    /// Interrupts to enable at start-up.
    pub fn irq_mask(mut self, mask: u32) -> Self {
        self.config.irq_mask = Some(mask);
        self
    }

    pub fn config(&self) -> &DevRegConfig {
        &self.config
    }

    /// Returns the driver without touching the hardware.
    pub fn build(self) -> I2cDevReg<B> {
        I2cDevReg::new(self.state.0)
    }

    /// Applies the configuration and returns the driver.
    ///
    /// Order: fail latch acknowledge (if configured), UPDATE_ENA, then the
    /// interrupt mask, so no interrupt is armed before updates are set up.
    pub fn start<I: IrqController>(self, irq: &mut I) -> I2cDevReg<B> {
        let config = self.config;
        let dev = self.build();
        if config.reset_fail_on_start {
            dev.reset_fail();
        }
        dev.set_update_enable(config.auto_update);
        if let Some(mask) = config.irq_mask {
            irq.enable(mask);
        }
        log::debug!("i2c_devreg started: {config:?}");
        dev
    }
}
