#![allow(unsafe_code)]

use core::ptr::{read_volatile, write_volatile};

/// 32-bit register access relative to one peripheral instance.
///
/// Offsets are byte offsets from the instance base, as listed in
/// [`regs`](crate::devreg::regs). Implementations must perform exactly one
/// access per call, in call order.
pub trait RegisterBus {
    /// Loads the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;
    /// Stores `value` to the 32-bit register at `offset`.
    fn write32(&self, offset: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Volatile memory-mapped access to an instance at a fixed base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Creates an accessor for the instance mapped at `base`.
    ///
    /// # Safety
    /// `base` must be the 4-byte aligned base address of an `i2c_devreg`
    /// register window that stays mapped for the lifetime of the accessor,
    /// covering every slot index that will be used. Accessing the same
    /// window through another path must not violate the protocol ordering
    /// this driver relies on.
    #[inline]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the instance.
    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: the window was declared valid in `Mmio::new`.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: the window was declared valid in `Mmio::new`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
