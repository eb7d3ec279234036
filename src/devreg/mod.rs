pub mod builder;
pub mod bus;
pub mod device;
pub mod error;
pub mod irq;
pub mod notify;
pub mod regs;
pub mod rom;
pub mod shared;
mod submit;
pub mod update;

#[cfg(test)]
mod test_support;

pub use builder::{DevRegBuilder, DevRegConfig};
pub use bus::{Mmio, RegisterBus};
pub use device::I2cDevReg;
pub use error::{FifoFull, RequestError, TableError};
pub use irq::{IrqController, UpdateEvent};
pub use notify::EventQueue;
pub use regs::FifoState;
pub use rom::{DescriptorTable, Mux, RegisterDescriptor};
pub use shared::SharedDevReg;
pub use update::UpdateState;

pub mod prelude {
    pub use super::{
        DescriptorTable, DevRegBuilder, DevRegConfig, EventQueue, FifoFull, FifoState, I2cDevReg,
        IrqController, Mmio, Mux, RegisterBus, RegisterDescriptor, RequestError, SharedDevReg,
        TableError, UpdateEvent, UpdateState,
    };
}
