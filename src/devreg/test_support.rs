//! Test support utilities - only compiled in test builds.

use core::cell::{Cell, RefCell};

use bitmaps::Bitmap;
use heapless::{Deque, Vec};

use crate::devreg::{
    bus::RegisterBus,
    device::I2cDevReg,
    irq::IrqController,
    regs,
    rom::{DescriptorTable, RegisterDescriptor},
};

/// Shadow window size of the fake peripheral.
pub const FAKE_SLOTS: usize = 32;
/// Request FIFO depth of the fake peripheral.
pub const FAKE_FIFO_DEPTH: usize = 4;
const LOG_DEPTH: usize = 128;

pub type TestDevReg<'a> = I2cDevReg<&'a FakeDevReg>;

// Two LM73 sensors, the second behind a mux, as in the generator example.
pub const LM73_TEMPERATURE: RegisterDescriptor = RegisterDescriptor::new(0x00, "LM73_TEMPERATURE")
    .device(0x48)
    .command(1, 0x00)
    .data_bytes(2)
    .auto_read();
pub const LM73_CONFIG: RegisterDescriptor = RegisterDescriptor::new(0x01, "LM73_CONFIG")
    .device(0x48)
    .command(1, 0x01)
    .data_bytes(1);
pub const LM73_BEHIND_MUX_TEMPERATURE: RegisterDescriptor =
    RegisterDescriptor::new(0x10, "LM73_BEHIND_MUX_TEMPERATURE")
        .device(0x48)
        .mux(0xA0, 0x20)
        .command(1, 0x00)
        .data_bytes(2)
        .auto_read();
pub const LM73_BEHIND_MUX_CONFIG: RegisterDescriptor =
    RegisterDescriptor::new(0x11, "LM73_BEHIND_MUX_CONFIG")
        .device(0x48)
        .mux(0xA0, 0x20)
        .command(1, 0x01)
        .data_bytes(1);

pub const EXAMPLE_ROM: &[RegisterDescriptor] = &[
    LM73_TEMPERATURE,
    LM73_CONFIG,
    LM73_BEHIND_MUX_TEMPERATURE,
    LM73_BEHIND_MUX_CONFIG,
];

/// A request as held in the fake FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Write { idx: u32, value: u32 },
    Readback { idx: u32 },
}

/// One register access seen by the fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub offset: usize,
    pub value: u32,
    pub is_write: bool,
}

impl Access {
    pub const fn write(offset: usize, value: u32) -> Self {
        Self {
            offset,
            value,
            is_write: true,
        }
    }

    pub const fn read(offset: usize, value: u32) -> Self {
        Self {
            offset,
            value,
            is_write: false,
        }
    }
}

/// One entry in the fake's event log.
///
/// Bus accesses and calls on an attached [`FakeIrq`] land in the same log,
/// so tests can check the order across both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Bus(Access),
    IrqVector(u32),
    IrqClear(u32),
    IrqEnable(u32),
}

/// Behavioural model of an `i2c_devreg` instance.
///
/// Registers behave as documented: UPDATE_TRIG only starts a pass while
/// UPDATE_ENA is set, ACCESS_FAILED is sticky until 1 is written, slot
/// stores and FORCE_READ writes enter a bounded FIFO. The downstream I2C
/// devices are a plain array; indices marked failing make their
/// transactions fail. Passes and FIFO draining only happen when the test
/// calls [`complete_pass`](Self::complete_pass) or [`drain`](Self::drain).
pub struct FakeDevReg {
    slots: RefCell<[u32; FAKE_SLOTS]>,
    device: RefCell<[u32; FAKE_SLOTS]>,
    fifo: RefCell<Deque<Request, FAKE_FIFO_DEPTH>>,
    auto_read: RefCell<Bitmap<FAKE_SLOTS>>,
    auto_write: RefCell<Bitmap<FAKE_SLOTS>>,
    failing: RefCell<Bitmap<FAKE_SLOTS>>,
    update_ena: Cell<bool>,
    update_ongoing: Cell<bool>,
    access_failed: Cell<bool>,
    bus_busy: Cell<bool>,
    force_read: Cell<u32>,
    fifo_state_override: Cell<Option<u32>>,
    log: RefCell<Vec<Event, LOG_DEPTH>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
    passes: Cell<u32>,
}

impl FakeDevReg {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new([0; FAKE_SLOTS]),
            device: RefCell::new([0; FAKE_SLOTS]),
            fifo: RefCell::new(Deque::new()),
            auto_read: RefCell::new(Bitmap::new()),
            auto_write: RefCell::new(Bitmap::new()),
            failing: RefCell::new(Bitmap::new()),
            update_ena: Cell::new(false),
            update_ongoing: Cell::new(false),
            access_failed: Cell::new(false),
            bus_busy: Cell::new(false),
            force_read: Cell::new(0),
            fifo_state_override: Cell::new(None),
            log: RefCell::new(Vec::new()),
            reads: Cell::new(0),
            writes: Cell::new(0),
            passes: Cell::new(0),
        }
    }

    /// Fake whose auto-read/auto-write sets follow `table`.
    pub fn with_table(table: &DescriptorTable<'_>) -> Self {
        let hw = Self::new();
        for d in table.iter() {
            if d.auto_read {
                hw.set_auto_read(d.index);
            }
            if d.auto_write {
                hw.set_auto_write(d.index);
            }
        }
        hw
    }

    pub fn set_auto_read(&self, idx: u32) {
        self.auto_read.borrow_mut().set(idx as usize, true);
    }

    pub fn set_auto_write(&self, idx: u32) {
        self.auto_write.borrow_mut().set(idx as usize, true);
    }

    /// Makes every transaction on `idx` fail.
    pub fn fail_index(&self, idx: u32) {
        self.failing.borrow_mut().set(idx as usize, true);
    }

    pub fn heal_index(&self, idx: u32) {
        self.failing.borrow_mut().set(idx as usize, false);
    }

    pub fn set_slot(&self, idx: u32, value: u32) {
        self.slots.borrow_mut()[idx as usize] = value;
    }

    pub fn slot(&self, idx: u32) -> u32 {
        self.slots.borrow()[idx as usize]
    }

    /// Sets the value held by the downstream device register.
    pub fn set_device_value(&self, idx: u32, value: u32) {
        self.device.borrow_mut()[idx as usize] = value;
    }

    pub fn device_value(&self, idx: u32) -> u32 {
        self.device.borrow()[idx as usize]
    }

    pub fn set_bus_busy(&self, busy: bool) {
        self.bus_busy.set(busy);
    }

    /// Makes FIFO_STATE read `raw` regardless of the FIFO content.
    pub fn force_fifo_state(&self, raw: Option<u32>) {
        self.fifo_state_override.set(raw);
    }

    /// Last value stored to FORCE_READ.
    pub fn force_read_value(&self) -> u32 {
        self.force_read.get()
    }

    /// Fills the FIFO with readbacks of entry 0, bypassing the register interface.
    pub fn fill_fifo(&self) {
        let mut fifo = self.fifo.borrow_mut();
        while fifo.push_back(Request::Readback { idx: 0 }).is_ok() {}
    }

    /// Number of requests waiting in the FIFO.
    pub fn pending(&self) -> usize {
        self.fifo.borrow().len()
    }

    /// Executes the oldest queued request.
    pub fn drain_one(&self) -> Option<Request> {
        let req = self.fifo.borrow_mut().pop_front()?;
        match req {
            Request::Write { idx, value } => {
                if self.transfer_ok(idx) {
                    self.device.borrow_mut()[idx as usize] = value;
                }
            }
            Request::Readback { idx } => {
                if self.transfer_ok(idx) {
                    let value = self.device.borrow()[idx as usize];
                    self.slots.borrow_mut()[idx as usize] = value;
                }
            }
        }
        Some(req)
    }

    /// Executes every queued request. Returns how many ran.
    pub fn drain(&self) -> usize {
        let mut n = 0;
        while self.drain_one().is_some() {
            n += 1;
        }
        n
    }

    /// Finishes a requested update pass, if one was started.
    ///
    /// Drains the FIFO, writes auto-write entries from their slots and
    /// refreshes auto-read entries from the devices. Returns false if no
    /// pass was running.
    pub fn complete_pass(&self) -> bool {
        if !self.update_ongoing.get() {
            return false;
        }
        self.drain();
        for idx in 0..FAKE_SLOTS {
            if self.auto_write.borrow().get(idx) && self.transfer_ok(idx as u32) {
                let value = self.slots.borrow()[idx];
                self.device.borrow_mut()[idx] = value;
            }
            if self.auto_read.borrow().get(idx) && self.transfer_ok(idx as u32) {
                let value = self.device.borrow()[idx];
                self.slots.borrow_mut()[idx] = value;
            }
        }
        self.update_ongoing.set(false);
        self.passes.set(self.passes.get() + 1);
        true
    }

    pub fn passes(&self) -> u32 {
        self.passes.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Bus accesses only, in order.
    pub fn access_log(&self) -> Vec<Access, LOG_DEPTH> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Bus(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    /// Bus accesses and attached interrupt controller calls, in order.
    pub fn events(&self) -> Vec<Event, LOG_DEPTH> {
        self.log.borrow().clone()
    }

    /// Returns true if `value` was stored to `offset` since the last [`clear_log`](Self::clear_log).
    pub fn wrote(&self, offset: usize, value: u32) -> bool {
        self.log
            .borrow()
            .iter()
            .any(|e| *e == Event::Bus(Access::write(offset, value)))
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
        self.reads.set(0);
        self.writes.set(0);
    }

    fn transfer_ok(&self, idx: u32) -> bool {
        if self.failing.borrow().get(idx as usize) {
            self.access_failed.set(true);
            return false;
        }
        true
    }

    fn record(&self, event: Event) {
        let _ = self.log.borrow_mut().push(event);
    }

    fn slot_index(offset: usize) -> Option<usize> {
        let rel = offset.checked_sub(regs::DATA_WINDOW)?;
        let idx = rel / regs::SLOT_STRIDE;
        (rel % regs::SLOT_STRIDE == 0 && idx < FAKE_SLOTS).then_some(idx)
    }

    fn fifo_state_bits(&self) -> u32 {
        if let Some(raw) = self.fifo_state_override.get() {
            return raw;
        }
        let fifo = self.fifo.borrow();
        let mut raw = 0;
        if fifo.is_empty() {
            raw |= regs::FIFO_STATE_EMPTY;
        }
        if fifo.is_full() {
            raw |= regs::FIFO_STATE_FULL;
        }
        raw
    }

    fn enqueue(&self, req: Request) {
        // A request offered to a full FIFO is lost, as in hardware.
        let _ = self.fifo.borrow_mut().push_back(req);
    }
}

impl Default for FakeDevReg {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for FakeDevReg {
    fn read32(&self, offset: usize) -> u32 {
        let value = match offset {
            regs::UPDATE_ENA => u32::from(self.update_ena.get()),
            regs::BUS_BUSY => u32::from(self.bus_busy.get()),
            regs::ACCESS_FAILED => u32::from(self.access_failed.get()),
            regs::FIFO_STATE => self.fifo_state_bits(),
            regs::UPDATE_ONGOING => u32::from(self.update_ongoing.get()),
            regs::FORCE_READ => self.force_read.get(),
            _ => match Self::slot_index(offset) {
                Some(idx) => self.slots.borrow()[idx],
                None => 0,
            },
        };
        self.reads.set(self.reads.get() + 1);
        self.record(Event::Bus(Access::read(offset, value)));
        value
    }

    fn write32(&self, offset: usize, value: u32) {
        self.writes.set(self.writes.get() + 1);
        self.record(Event::Bus(Access::write(offset, value)));
        match offset {
            regs::UPDATE_ENA => self.update_ena.set(value & 1 != 0),
            regs::UPDATE_TRIG => {
                if value & 1 != 0 && self.update_ena.get() {
                    self.update_ongoing.set(true);
                }
            }
            regs::ACCESS_FAILED => {
                if value & 1 != 0 {
                    self.access_failed.set(false);
                }
            }
            regs::FORCE_READ => {
                self.force_read.set(value);
                if (value as usize) < FAKE_SLOTS {
                    self.enqueue(Request::Readback { idx: value });
                }
            }
            _ => {
                if let Some(idx) = Self::slot_index(offset) {
                    self.slots.borrow_mut()[idx] = value;
                    self.enqueue(Request::Write {
                        idx: idx as u32,
                        value,
                    });
                }
            }
        }
    }
}

/// Recording interrupt controller.
///
/// When built with [`attached`](Self::attached), every call is also logged
/// into the fake peripheral's event log.
#[derive(Default)]
pub struct FakeIrq<'a> {
    pending: u32,
    enabled: u32,
    cleared: Vec<u32, 8>,
    hw: Option<&'a FakeDevReg>,
}

impl<'a> FakeIrq<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(hw: &'a FakeDevReg) -> Self {
        Self {
            hw: Some(hw),
            ..Self::default()
        }
    }

    /// Latches the interrupts in `vector`.
    pub fn raise(&mut self, vector: u32) {
        self.pending |= vector;
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn enabled(&self) -> u32 {
        self.enabled
    }

    /// Vectors cleared so far, in order.
    pub fn cleared(&self) -> &[u32] {
        &self.cleared
    }
}

impl FakeIrq<'_> {
    fn trace(&self, event: Event) {
        if let Some(hw) = self.hw {
            hw.record(event);
        }
    }
}

impl IrqController for FakeIrq<'_> {
    fn vector(&mut self) -> u32 {
        self.trace(Event::IrqVector(self.pending));
        self.pending
    }

    fn clear(&mut self, vector: u32) {
        self.trace(Event::IrqClear(vector));
        self.pending &= !vector;
        let _ = self.cleared.push(vector);
    }

    fn enable(&mut self, mask: u32) {
        self.trace(Event::IrqEnable(mask));
        self.enabled |= mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_fifo_reports_full_at_depth() {
        let hw = FakeDevReg::new();
        assert_eq!(hw.read32(regs::FIFO_STATE), regs::FIFO_STATE_EMPTY);
        hw.fill_fifo();
        assert_eq!(hw.pending(), FAKE_FIFO_DEPTH);
        assert_eq!(hw.read32(regs::FIFO_STATE), regs::FIFO_STATE_FULL);
    }

    #[test]
    fn attached_irq_shares_the_event_log() {
        let hw = FakeDevReg::new();
        let mut irq = FakeIrq::attached(&hw);
        irq.raise(0x2);

        hw.read32(regs::FIFO_STATE);
        irq.vector();
        irq.clear(0x2);
        hw.write32(regs::UPDATE_ENA, 1);
        irq.enable(0x2);

        assert_eq!(
            hw.events().as_slice(),
            &[
                Event::Bus(Access::read(regs::FIFO_STATE, regs::FIFO_STATE_EMPTY)),
                Event::IrqVector(0x2),
                Event::IrqClear(0x2),
                Event::Bus(Access::write(regs::UPDATE_ENA, 1)),
                Event::IrqEnable(0x2),
            ]
        );
        assert_eq!(hw.access_log().len(), 2);
    }

    #[test]
    fn with_table_marks_auto_read_entries() {
        let hw = FakeDevReg::with_table(&DescriptorTable::new(EXAMPLE_ROM));
        hw.set_device_value(LM73_TEMPERATURE.index, 0x0C80);
        hw.set_device_value(LM73_CONFIG.index, 0x40);

        hw.write32(regs::UPDATE_ENA, 1);
        hw.write32(regs::UPDATE_TRIG, 1);
        assert!(hw.complete_pass());

        assert_eq!(hw.slot(LM73_TEMPERATURE.index), 0x0C80);
        assert_eq!(hw.slot(LM73_CONFIG.index), 0);
    }
}
