use crate::devreg::{bus::RegisterBus, device::I2cDevReg, regs};

/// Update-path state as far as software can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateState {
    /// UPDATE_ENA is clear; triggers are ignored.
    Disabled,
    /// Enabled, no pass running.
    Idle,
    /// A pass is running.
    InProgress,
}

impl<B: RegisterBus> I2cDevReg<B> {
    /// Enables or disables update passes.
    ///
    /// While disabled, neither [`trigger_update`](Self::trigger_update) nor
    /// the peripheral's trigger port start a pass. The setting is held by
    /// the hardware.
    pub fn set_update_enable(&self, enabled: bool) {
        self.bus.write32(regs::UPDATE_ENA, u32::from(enabled));
        log::debug!("update enable = {enabled}");
    }

    /// Reads back UPDATE_ENA.
    pub fn is_update_enabled(&self) -> bool {
        self.bus.read32(regs::UPDATE_ENA) != 0
    }

    /// Requests one update pass over every auto-read and auto-write entry.
    ///
    /// Fire and forget: the outcome shows up later in the fail latch and the
    /// shadow bank. Has no effect while updates are disabled.
    pub fn trigger_update(&self) {
        self.bus.write32(regs::UPDATE_TRIG, regs::STROBE);
        log::debug!("update pass requested");
    }

    /// Returns true if any transaction failed since the latch was last reset.
    ///
    /// Reading does not clear the latch.
    pub fn check_fail(&self) -> bool {
        self.bus.read32(regs::ACCESS_FAILED) != 0
    }

    /// Acknowledges the fail latch.
    ///
    /// The latch is never cleared any other way. Until this is called every
    /// later pass reports failed, whether or not it was.
    pub fn reset_fail(&self) {
        self.bus.write32(regs::ACCESS_FAILED, regs::STROBE);
        log::debug!("fail latch reset");
    }

    /// Samples UPDATE_ENA and UPDATE_ONGOING.
    pub fn update_state(&self) -> UpdateState {
        if !self.is_update_enabled() {
            UpdateState::Disabled
        } else if self.is_update_ongoing() {
            UpdateState::InProgress
        } else {
            UpdateState::Idle
        }
    }
}
