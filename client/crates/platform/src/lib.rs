//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the chama client:
//! - Backend configuration and the REST/function HTTP client
//! - PIN hashing (Argon2id) with zeroized clear-text handling
//! - Inactivity monitoring (idle timer + tokio task)
//! - Member-facing notifications

pub mod config;
pub mod http;
pub mod inactivity;
pub mod notify;
pub mod pin;
