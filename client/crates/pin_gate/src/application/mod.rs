//! Application Layer
//!
//! Gate controller, its configuration and the sign-in profile sync.

pub mod config;
pub mod controller;
pub mod profile_sync;

// Re-exports
pub use config::GateConfig;
pub use controller::PinGate;
pub use profile_sync::ProfileSync;
