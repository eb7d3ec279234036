//! Register map of one `i2c_devreg` instance.
//!
//! All values are byte offsets from the instance base address and must match
//! the address decode generated for the FPGA build.

/// 1 = updates enabled. When 0, neither UPDATE_TRIG nor the trigger port start a pass.
pub const UPDATE_ENA: usize = 0x00;
/// Write 1 to request one update pass.
pub const UPDATE_TRIG: usize = 0x04;
/// Read-only, non-zero while the I2C bus is active.
pub const BUS_BUSY: usize = 0x10;
/// Sticky failure latch. Write 1 to clear.
pub const ACCESS_FAILED: usize = 0x14;
/// User request FIFO state, see [`FIFO_STATE_EMPTY`] and [`FIFO_STATE_FULL`].
pub const FIFO_STATE: usize = 0x18;
/// Read-only, non-zero while an update pass is running.
pub const UPDATE_ONGOING: usize = 0x1C;
/// Write a ROM index to force a readback of that entry.
pub const FORCE_READ: usize = 0x20;
/// Start of the shadow data window.
pub const DATA_WINDOW: usize = 0x40;

/// Bytes per shadow slot.
pub const SLOT_STRIDE: usize = 4;

/// FIFO_STATE bit: no requests pending.
pub const FIFO_STATE_EMPTY: u32 = 1 << 0;
/// FIFO_STATE bit: no further request can be admitted.
pub const FIFO_STATE_FULL: u32 = 1 << 8;

/// Value written to strobe and acknowledge registers.
pub(crate) const STROBE: u32 = 1;

/// Offset of shadow slot `idx` from the instance base.
///
/// Wraps on overflow, the same as the address decode.
///
/// ```
/// use i2c_devreg::devreg::regs::slot_offset;
///
/// assert_eq!(slot_offset(0), 0x40);
/// assert_eq!(slot_offset(3), 0x4C);
/// ```
#[inline]
pub const fn slot_offset(idx: u32) -> usize {
    DATA_WINDOW.wrapping_add((idx as usize).wrapping_mul(SLOT_STRIDE))
}

/// Absolute address of shadow slot `idx` for an instance at `base`.
#[inline]
pub const fn slot_address(base: usize, idx: u32) -> usize {
    base.wrapping_add(slot_offset(idx))
}

/// Decoded FIFO_STATE register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoState {
    /// All admitted requests have been executed.
    pub empty: bool,
    /// No further request can be admitted right now.
    pub full: bool,
}

impl FifoState {
    /// Decodes a raw FIFO_STATE value. Other bits are ignored.
    #[inline]
    pub const fn from_bits(raw: u32) -> Self {
        Self {
            empty: raw & FIFO_STATE_EMPTY != 0,
            full: raw & FIFO_STATE_FULL != 0,
        }
    }

    /// Encodes back into register layout.
    #[inline]
    pub const fn bits(self) -> u32 {
        let mut raw = 0;
        if self.empty {
            raw |= FIFO_STATE_EMPTY;
        }
        if self.full {
            raw |= FIFO_STATE_FULL;
        }
        raw
    }
}
