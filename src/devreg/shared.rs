#![allow(unsafe_code)]

use crate::devreg::{
    bus::RegisterBus,
    device::I2cDevReg,
    error::{FifoFull, RequestError},
    irq::{IrqController, UpdateEvent},
    regs::FifoState,
    rom::RegisterDescriptor,
};

/// An [`I2cDevReg`] shared between execution contexts.
///
/// Admission is a status read followed by a store. With more than one
/// context submitting, both must happen without another submitter in
/// between, so every admitting method here runs inside a critical section.
/// Single-access operations (status reads, trigger, enable) are forwarded
/// as is.
///
/// Code that already runs with preemption excluded, such as an interrupt
/// handler that cannot be nested, can skip the lock with
/// [`with_unlocked`](Self::with_unlocked).
#[derive(Debug)]
pub struct SharedDevReg<B: RegisterBus> {
    dev: I2cDevReg<B>,
}

impl<B: RegisterBus> SharedDevReg<B> {
    pub const fn new(dev: I2cDevReg<B>) -> Self {
        Self { dev }
    }

    pub fn into_inner(self) -> I2cDevReg<B> {
        self.dev
    }

    /// Runs `f` with the driver inside a critical section.
    ///
    /// Use this for compound sequences, e.g. read a slot and queue a write
    /// derived from it.
    pub fn with<R>(&self, f: impl FnOnce(&I2cDevReg<B>) -> R) -> R {
        critical_section::with(|_| f(&self.dev))
    }

    /// Runs `f` with the driver without taking the lock.
    ///
    /// # Safety
    /// No other context may touch this instance while `f` runs. An
    /// admission interleaved with another submitter can store into a FIFO
    /// that filled up after the status read, and the request is lost.
    pub unsafe fn with_unlocked<R>(&self, f: impl FnOnce(&I2cDevReg<B>) -> R) -> R {
        f(&self.dev)
    }

    pub fn submit_write(&self, idx: u32, value: u32) -> Result<(), FifoFull> {
        self.with(|dev| dev.submit_write(idx, value))
    }

    pub fn submit_readback(&self, idx: u32) -> Result<(), FifoFull> {
        self.with(|dev| dev.submit_readback(idx))
    }

    pub fn write_register(&self, desc: &RegisterDescriptor, value: u32) -> Result<(), RequestError> {
        self.with(|dev| dev.write_register(desc, value))
    }

    pub fn readback_register(&self, desc: &RegisterDescriptor) -> Result<(), FifoFull> {
        self.with(|dev| dev.readback_register(desc))
    }

    /// Checks the fail latch and acknowledges it in one step.
    ///
    /// Returns whether it was set. Without the lock another context could
    /// observe the latch between the check and the reset and lose track of
    /// which failure it had seen.
    pub fn take_fail(&self) -> bool {
        self.with(|dev| {
            let failed = dev.check_fail();
            if failed {
                dev.reset_fail();
            }
            failed
        })
    }

    /// See [`I2cDevReg::service_irq`].
    pub fn service_irq<I: IrqController>(&self, irq: &mut I) -> UpdateEvent {
        self.with(|dev| dev.service_irq(irq))
    }

    pub fn is_fifo_empty(&self) -> bool {
        self.dev.is_fifo_empty()
    }

    pub fn is_fifo_full(&self) -> bool {
        self.dev.is_fifo_full()
    }

    pub fn fifo_state(&self) -> FifoState {
        self.dev.fifo_state()
    }

    pub fn is_bus_busy(&self) -> bool {
        self.dev.is_bus_busy()
    }

    pub fn is_update_ongoing(&self) -> bool {
        self.dev.is_update_ongoing()
    }

    pub fn read_slot(&self, idx: u32) -> u32 {
        self.dev.read_slot(idx)
    }

    pub fn read_register(&self, desc: &RegisterDescriptor) -> u32 {
        self.dev.read_register(desc)
    }

    pub fn set_update_enable(&self, enabled: bool) {
        self.dev.set_update_enable(enabled)
    }

    pub fn trigger_update(&self) {
        self.dev.trigger_update()
    }

    pub fn check_fail(&self) -> bool {
        self.dev.check_fail()
    }

    pub fn reset_fail(&self) {
        self.dev.reset_fail()
    }
}
