//! Session PIN State
//!
//! Per-session PIN flags. Lives in memory only and is reset on sign-out.

use crate::domain::value_object::PinSetupStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPinState {
    /// PIN verified in this session
    pub pin_verified: bool,
    /// Whether a PIN has been configured for the member
    pub has_pin_setup: PinSetupStatus,
}

impl SessionPinState {
    /// Back to `(false, Unknown)`
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn mark_verified(&mut self) {
        self.pin_verified = true;
    }

    /// Require verification again; setup status is kept
    pub fn invalidate(&mut self) {
        self.pin_verified = false;
    }

    pub fn set_status(&mut self, status: PinSetupStatus) {
        self.has_pin_setup = status;
    }
}
