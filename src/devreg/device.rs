#![allow(unsafe_code)]

use crate::devreg::{
    bus::{Mmio, RegisterBus},
    regs::{self, FifoState},
    rom::RegisterDescriptor,
};

/// Generates a boolean status reader for a single-bit register.
macro_rules! impl_status_flag {
    ($name:ident, $reg:ident, $doc:literal) => {
        paste::paste! {
            #[doc = $doc]
            #[doc = ""]
            #[doc = "Reads `" $reg "` once; non-zero means set. No side effect."]
            #[inline]
            pub fn [<is_ $name>](&self) -> bool {
                self.bus.read32(regs::$reg) != 0
            }
        }
    };
}

/// Driver for one `i2c_devreg` instance.
///
/// Holds nothing but the bus; all state lives in the peripheral, so any
/// number of instances can coexist. Every method performs a fixed, short
/// sequence of register accesses and returns without waiting.
///
/// Methods take `&self`. The admission methods
/// ([`submit_write`](Self::submit_write), [`submit_readback`](Self::submit_readback))
/// are a read followed by a write; when one instance is used from more than
/// one context, go through [`SharedDevReg`](crate::devreg::SharedDevReg).
#[derive(Debug)]
pub struct I2cDevReg<B: RegisterBus> {
    pub(crate) bus: B,
}

impl I2cDevReg<Mmio> {
    /// Driver for the instance mapped at `base`.
    ///
    /// # Safety
    /// See [`Mmio::new`].
    #[inline]
    pub const unsafe fn mmio(base: usize) -> Self {
        Self {
            bus: unsafe { Mmio::new(base) },
        }
    }
}

impl<B: RegisterBus> I2cDevReg<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    impl_status_flag!(bus_busy, BUS_BUSY, "Returns true while the I2C bus is active.");
    impl_status_flag!(
        update_ongoing,
        UPDATE_ONGOING,
        "Returns true while an update pass is running."
    );

    /// Reads and decodes FIFO_STATE.
    #[inline]
    pub fn fifo_state(&self) -> FifoState {
        FifoState::from_bits(self.bus.read32(regs::FIFO_STATE))
    }

    /// Returns true once every admitted request has been executed and its
    /// result is reflected in the shadow bank.
    #[inline]
    pub fn is_fifo_empty(&self) -> bool {
        self.bus.read32(regs::FIFO_STATE) & regs::FIFO_STATE_EMPTY != 0
    }

    /// Returns true if no further request can be admitted at the moment.
    #[inline]
    pub fn is_fifo_full(&self) -> bool {
        self.bus.read32(regs::FIFO_STATE) & regs::FIFO_STATE_FULL != 0
    }

    /// Reads the mirrored value of ROM entry `idx`.
    ///
    /// Only the low bytes declared by the entry are meaningful.
    #[inline]
    pub fn read_slot(&self, idx: u32) -> u32 {
        self.bus.read32(regs::slot_offset(idx))
    }

    /// Reads the mirrored value of `desc`, masked to its data width.
    #[inline]
    pub fn read_register(&self, desc: &RegisterDescriptor) -> u32 {
        self.read_slot(desc.index) & desc.value_mask()
    }
}
