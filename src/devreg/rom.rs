//! Descriptions of the ROM entries the peripheral walks.
//!
//! The ROM itself is produced when the FPGA is built; the driver only ever
//! needs an entry's index. These types carry the rest of the generated
//! information so application code can name registers and check value widths
//! before a request is queued.

use bitmaps::{Bitmap, Bits, BitsImpl};

use crate::devreg::error::TableError;

/// I2C mux that must be set before the device is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mux {
    /// I2C address of the mux.
    pub addr: u8,
    /// Value written to the mux to select the device.
    pub value: u8,
}

/// One ROM entry.
///
/// Built with const methods so tables can live in flash:
///
/// ```
/// use i2c_devreg::devreg::RegisterDescriptor;
///
/// const PART_NUMBER: RegisterDescriptor = RegisterDescriptor::new(0x01, "SI5341_PARTNUMBER")
///     .device(0x36)
///     .mux(0x74, 0x02)
///     .command(1, 0x02)
///     .data_bytes(2)
///     .auto_read()
///     .ls_byte_first();
///
/// assert_eq!(PART_NUMBER.value_mask(), 0xFFFF);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDescriptor {
    /// Position in the ROM and in the shadow window.
    pub index: u32,
    /// Symbolic name, as emitted by the generator.
    pub name: &'static str,
    /// 7-bit I2C device address.
    pub device_addr: u8,
    /// Mux in front of the device, if any.
    pub mux: Option<Mux>,
    /// Number of command bytes sent before the data (0-4).
    pub cmd_bytes: u8,
    /// Command value; only the low `cmd_bytes` bytes are sent.
    pub cmd: u32,
    /// Number of data bytes (0-4).
    pub data_bytes: u8,
    /// Read on every update pass.
    pub auto_read: bool,
    /// Written from the shadow slot on every update pass.
    pub auto_write: bool,
    /// Data is transferred least significant byte first.
    pub ls_byte_first: bool,
}

impl RegisterDescriptor {
    pub const fn new(index: u32, name: &'static str) -> Self {
        Self {
            index,
            name,
            device_addr: 0,
            mux: None,
            cmd_bytes: 0,
            cmd: 0,
            data_bytes: 0,
            auto_read: false,
            auto_write: false,
            ls_byte_first: false,
        }
    }

    pub const fn device(mut self, addr: u8) -> Self {
        self.device_addr = addr;
        self
    }

    pub const fn mux(mut self, addr: u8, value: u8) -> Self {
        self.mux = Some(Mux { addr, value });
        self
    }

    /// # Panics
    /// Panics if `bytes > 4`.
    pub const fn command(mut self, bytes: u8, cmd: u32) -> Self {
        assert!(bytes <= 4, "at most 4 command bytes");
        self.cmd_bytes = bytes;
        self.cmd = cmd;
        self
    }

    /// # Panics
    /// Panics if `bytes > 4`.
    pub const fn data_bytes(mut self, bytes: u8) -> Self {
        assert!(bytes <= 4, "at most 4 data bytes");
        self.data_bytes = bytes;
        self
    }

    /// # Panics
    /// Panics if the entry is already auto-write.
    pub const fn auto_read(mut self) -> Self {
        assert!(!self.auto_write, "a register is either auto-read or auto-write");
        self.auto_read = true;
        self
    }

    /// # Panics
    /// Panics if the entry is already auto-read.
    pub const fn auto_write(mut self) -> Self {
        assert!(!self.auto_read, "a register is either auto-read or auto-write");
        self.auto_write = true;
        self
    }

    pub const fn ls_byte_first(mut self) -> Self {
        self.ls_byte_first = true;
        self
    }

    /// Mask of the meaningful bits in the shadow slot.
    ///
    /// Command-only entries (zero data bytes) have an empty mask.
    #[inline]
    pub const fn value_mask(&self) -> u32 {
        match self.data_bytes {
            0 => 0,
            n if n >= 4 => u32::MAX,
            n => (1u32 << (8 * n as u32)) - 1,
        }
    }

    /// Returns true if `value` has no bits above the data width.
    #[inline]
    pub const fn fits(&self, value: u32) -> bool {
        value & !self.value_mask() == 0
    }
}

/// A generated set of ROM entries.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorTable<'a> {
    entries: &'a [RegisterDescriptor],
}

impl<'a> DescriptorTable<'a> {
    pub const fn new(entries: &'a [RegisterDescriptor]) -> Self {
        Self { entries }
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'a, RegisterDescriptor> {
        self.entries.iter()
    }

    /// Looks up the entry at ROM index `index`.
    pub fn get(&self, index: u32) -> Option<&'a RegisterDescriptor> {
        self.entries.iter().find(|d| d.index == index)
    }

    /// Looks up an entry by its generated name.
    pub fn find(&self, name: &str) -> Option<&'a RegisterDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    /// Checks the table against the generator's rules for a shadow window of
    /// `SLOTS` entries.
    ///
    /// Reports the first offending entry in table order.
    pub fn validate<const SLOTS: usize>(&self) -> Result<(), TableError>
    where
        BitsImpl<SLOTS>: Bits,
    {
        let mut used: Bitmap<SLOTS> = Bitmap::new();
        for d in self.entries {
            let idx = d.index as usize;
            if idx >= SLOTS {
                return Err(TableError::IndexOutOfWindow(d.index));
            }
            if used.set(idx, true) {
                return Err(TableError::DuplicateIndex(d.index));
            }
            if d.auto_read && d.auto_write {
                return Err(TableError::AutoReadAndWrite(d.index));
            }
            if d.cmd_bytes > 4 || d.data_bytes > 4 {
                return Err(TableError::InvalidWidth(d.index));
            }
        }
        Ok(())
    }
}
