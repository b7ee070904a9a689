//! Infrastructure Layer
//!
//! Wallet gateway implementations.

pub mod memory;
pub mod rest;

pub use memory::InMemoryWalletGateway;
pub use rest::RestWalletGateway;
