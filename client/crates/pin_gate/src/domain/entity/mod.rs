//! Entity Module

pub mod identity;
pub mod member_profile;
pub mod session_pin_state;

pub use identity::Identity;
pub use member_profile::{MemberProfile, MemberRole};
pub use session_pin_state::SessionPinState;
