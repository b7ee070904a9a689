//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (WalletOperation, ContributionRequest, WalletBalances)
//! - Domain value objects (Amount, WalletType, PaymentMethod)
//! - Domain services (pre-flight validation, refresh keys)
//! - Contribution leaderboard read model
//! - Gateway traits (interfaces)

pub mod entities;
pub mod gateway;
pub mod leaderboard;
pub mod services;
pub mod value_objects;
