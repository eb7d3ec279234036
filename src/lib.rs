//! A `no_std`, no-alloc driver for the `i2c_devreg` FPGA peripheral.
//!
//! The peripheral walks a read-only descriptor table (the ROM) describing
//! registers of downstream I2C devices, performs the I2C transactions in
//! hardware and mirrors the results into a memory-mapped shadow bank. This
//! crate covers the software side of that contract: admitting write and
//! readback requests into the bounded hardware FIFO, gating and triggering
//! update passes, and observing the sticky failure latch.
//!
//! # Features
//!
//! - **Zero heap allocation** - every call is a handful of volatile loads/stores
//! - **Non-blocking admission** - a full FIFO is reported, never waited on
//! - **Pluggable bus** - real MMIO or any [`RegisterBus`](devreg::RegisterBus) test double
//! - **Interrupt contract** - vector read/clear then fail-latch sampling
//! - **Shared access** - critical-section wrapped admission for ISR/main-loop sharing
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  FIFO_STATE   ┌───────────────────────────┐
//! │   Main loop      │──────────────▶│   i2c_devreg (FPGA)       │
//! │                  │  slot / FORCE │                           │
//! │  submit_write()  │──────────────▶│  request FIFO ──▶ I2C bus │
//! │  submit_readback │               │                           │
//! │  read_slot()     │◀──────────────│  shadow bank (0x40 + 4i)  │
//! │                  │               │                           │
//! │   IRQ handler    │◀──── IRQ ─────│  update pass complete     │
//! │  service_irq()   │  ACCESS_FAILED│  (sticky fail latch)      │
//! └──────────────────┘               └───────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use i2c_devreg::prelude::*;
//!
//! const TEMPERATURE: RegisterDescriptor = RegisterDescriptor::new(0x00, "LM73_TEMPERATURE")
//!     .device(0x48)
//!     .command(1, 0x00)
//!     .data_bytes(2)
//!     .auto_read();
//!
//! # fn run(irq: &mut impl IrqController) {
//! let dev = unsafe { DevRegBuilder::new().mmio(0x8000_0000) }
//!     .auto_update(true)
//!     .irq_mask(0x1)
//!     .start(irq);
//!
//! // Queue a write; a full FIFO is reported, not waited on.
//! if dev.submit_write(0x01, 0x40).is_err() {
//!     // retry later
//! }
//!
//! // LM73: signed, 1/128 degree per LSB.
//! if dev.check_fail() {
//!     dev.reset_fail();
//! } else {
//!     let raw = dev.read_register(&TEMPERATURE) as u16 as i16;
//!     log::info!("temperature: {} C", raw / 128);
//! }
//! # }
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod devreg;

pub mod prelude {
    pub use crate::devreg::prelude::*;
}
