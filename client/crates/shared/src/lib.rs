//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the chama client vocabulary:
//! - Common error types and result aliases
//! - Typed identifiers for users, chamas and chama members
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across the gate and wallet crates.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
