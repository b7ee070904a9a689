//! Domain Layer
//!
//! Contains entities, value objects, the gate state machine, and the
//! collaborator traits it is driven through.

pub mod entity;
pub mod gate;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{Identity, MemberProfile, MemberRole, SessionPinState};
pub use gate::{GateDecision, GateEffect, GateEvent, GatePhase, GateState, LookupOutcome, VerifyOutcome};
pub use services::{
    IdentityProvider, PinSetupService, PinStatusLookup, PinVerifier, ProfileDirectory,
};
