//! Infrastructure Layer
//!
//! Collaborator implementations: in-memory and hosted backend.

pub mod memory;
pub mod rest;

pub use memory::{InMemoryPinStore, InMemoryProfileDirectory, StaticIdentityProvider};
pub use rest::{RestIdentityProvider, RestPinService, RestProfileDirectory};
