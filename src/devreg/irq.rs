use crate::devreg::{bus::RegisterBus, device::I2cDevReg};

/// Interrupt plumbing of the peripheral, provided by the platform.
///
/// The vector encoding and the mask bits are defined by the FPGA build and
/// are passed through untouched.
pub trait IrqController {
    /// Returns the pending interrupt vector.
    fn vector(&mut self) -> u32;
    /// Acknowledges the interrupts in `vector`.
    fn clear(&mut self, vector: u32);
    /// Enables the interrupts in `mask`.
    fn enable(&mut self, mask: u32);
}

impl<I: IrqController + ?Sized> IrqController for &mut I {
    fn vector(&mut self) -> u32 {
        (**self).vector()
    }

    fn clear(&mut self, vector: u32) {
        (**self).clear(vector)
    }

    fn enable(&mut self, mask: u32) {
        (**self).enable(mask)
    }
}

/// What the interrupt handler observed when an update pass completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpdateEvent {
    /// Vector read from the interrupt controller, already cleared.
    pub vector: u32,
    /// Fail latch at the time of the interrupt. Still set in hardware.
    pub failed: bool,
}

impl<B: RegisterBus> I2cDevReg<B> {
    /// Services a completion interrupt.
    ///
    /// Reads the vector, clears exactly that vector, then samples the fail
    /// latch. The latch is reported, not reset; acknowledging it stays with
    /// the caller. Shadow slots are stable to read once this returns.
    pub fn service_irq<I: IrqController>(&self, irq: &mut I) -> UpdateEvent {
        let vector = irq.vector();
        irq.clear(vector);
        let failed = self.check_fail();
        if failed {
            log::warn!("update pass completed with access failure, vector={vector:#x}");
        } else {
            log::trace!("update pass completed, vector={vector:#x}");
        }
        UpdateEvent { vector, failed }
    }
}
