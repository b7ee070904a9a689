//! PIN Gate Module
//!
//! Clean Architecture structure:
//! - `domain/` - Gate reducer, entities, value objects, collaborator traits
//! - `application/` - Gate controller and configuration
//! - `infra/` - In-memory and backend collaborator implementations
//!
//! ## Behaviour
//! - Signed-in members must set up a PIN before using protected routes
//! - A PIN with no verification this session locks protected routes
//! - Verification is revoked after a period of inactivity
//! - Public routes never force a modal; verified members are sent on to
//!   the landing route
//! - Signing in refreshes the member's profile and admin role

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;


// Re-exports for convenience
pub use application::{GateConfig, PinGate, ProfileSync};
pub use domain::{GateDecision, GatePhase, Identity};
pub use error::{GateError, GateResult};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
