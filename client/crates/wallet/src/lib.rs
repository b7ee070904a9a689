//! Chama Wallet Module
//!
//! Clean Architecture structure:
//! - `domain/` - Operations, amounts, validation, gateway traits
//! - `application/` - Use cases
//! - `infra/` - Backend and in-memory gateways
//!
//! ## Rules
//! - Amounts are positive and rounded to cents before they leave the client
//! - Withdrawals and transfers draw on the MGR wallet and may not exceed it
//! - Every outcome is reported through the notification sink

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{ContributionUseCase, LeaderboardUseCase, WalletOpsUseCase};
pub use error::{WalletError, WalletResult};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
