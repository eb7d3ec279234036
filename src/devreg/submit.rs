use crate::devreg::{
    bus::RegisterBus,
    device::I2cDevReg,
    error::{FifoFull, RequestError},
    regs,
    rom::RegisterDescriptor,
};

impl<B: RegisterBus> I2cDevReg<B> {
    /// Queues a write of `value` to ROM entry `idx`.
    ///
    /// FIFO_STATE is read first; if the full bit is set nothing else is
    /// touched and [`FifoFull`] is returned. Otherwise `value` is stored to
    /// the entry's shadow slot, which the peripheral takes as a pending
    /// write. When it reaches the device is up to the hardware.
    ///
    /// Only the low bytes declared by the entry are used.
    pub fn submit_write(&self, idx: u32, value: u32) -> Result<(), FifoFull> {
        self.admit(idx)?;
        self.bus.write32(regs::slot_offset(idx), value);
        log::trace!("write queued: idx={idx:#x} value={value:#x}");
        Ok(())
    }

    /// Queues an out-of-band read of ROM entry `idx`.
    ///
    /// Same admission check as [`submit_write`](Self::submit_write); on
    /// success `idx` is written to FORCE_READ. The result shows up in the
    /// shadow slot once the FIFO has drained past it.
    pub fn submit_readback(&self, idx: u32) -> Result<(), FifoFull> {
        self.admit(idx)?;
        self.bus.write32(regs::FORCE_READ, idx);
        log::trace!("readback queued: idx={idx:#x}");
        Ok(())
    }

    /// Queues a write to `desc` after checking `value` against its data width.
    ///
    /// A value that is too wide is rejected before the FIFO is consulted.
    pub fn write_register(&self, desc: &RegisterDescriptor, value: u32) -> Result<(), RequestError> {
        if !desc.fits(value) {
            log::debug!("{}: value {value:#x} wider than {} bytes", desc.name, desc.data_bytes);
            return Err(RequestError::ValueTooWide);
        }
        Ok(self.submit_write(desc.index, value)?)
    }

    /// Queues an out-of-band read of `desc`.
    pub fn readback_register(&self, desc: &RegisterDescriptor) -> Result<(), FifoFull> {
        self.submit_readback(desc.index)
    }

    // The status read must come strictly before the admitting store. The
    // FIFO may drain in between, which only means a request was turned
    // away that would have fit.
    #[inline]
    fn admit(&self, idx: u32) -> Result<(), FifoFull> {
        if self.is_fifo_full() {
            log::debug!("request for idx={idx:#x} rejected: fifo full");
            return Err(FifoFull);
        }
        Ok(())
    }
}
