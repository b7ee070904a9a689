//! Wallet Error Types
//!
//! This module provides wallet-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::http::BackendError;
use thiserror::Error;

/// Wallet-specific result type alias
pub type WalletResult<T> = Result<T, WalletError>;

#[derive(Debug, Error)]
pub enum WalletError {
    /// Not a positive, finite amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient balance: {available:.2} available, {requested:.2} requested")]
    InsufficientBalance { available: f64, requested: f64 },

    #[error("A phone number or account is required")]
    MissingPhoneNumber,

    #[error("Select a member to send to")]
    MissingRecipient,

    #[error("Unknown recipient: {0}")]
    InvalidRecipient(String),

    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    #[error("Unknown leaderboard order: {0}")]
    UnsupportedSort(String),

    /// Backend processed the request and refused it
    #[error("{0}")]
    Rejected(String),

    /// Backend call failed
    #[error("Wallet service error: {0}")]
    Service(#[from] BackendError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidAmount(_)
            | WalletError::MissingPhoneNumber
            | WalletError::MissingRecipient
            | WalletError::InvalidRecipient(_)
            | WalletError::UnsupportedPaymentMethod(_)
            | WalletError::UnsupportedSort(_) => ErrorKind::BadRequest,
            WalletError::InsufficientBalance { .. } | WalletError::Rejected(_) => {
                ErrorKind::UnprocessableEntity
            }
            WalletError::Service(e) => e.kind(),
            WalletError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Description shown to the member, `None` when only a fallback fits
    pub fn user_message(&self) -> Option<String> {
        match self {
            WalletError::Service(BackendError::Status { message, .. }) if !message.is_empty() => {
                Some(message.clone())
            }
            WalletError::Rejected(msg) if !msg.is_empty() => Some(msg.clone()),
            WalletError::Service(_) | WalletError::Rejected(_) | WalletError::Internal(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Next step for the member, if there is one
    pub fn action(&self) -> Option<&'static str> {
        match self {
            WalletError::InvalidAmount(_) => Some("Enter a positive amount"),
            WalletError::InsufficientBalance { .. } => {
                Some("Lower the amount or wait for your next payout")
            }
            WalletError::MissingPhoneNumber => Some("Add the phone number that receives the funds"),
            WalletError::MissingRecipient | WalletError::InvalidRecipient(_) => {
                Some("Pick a member of this chama")
            }
            WalletError::UnsupportedPaymentMethod(_) => Some("Use M-Pesa, Airtel, bank or card"),
            WalletError::UnsupportedSort(_) => {
                Some("Use most_contributing, top_saver, ascending, descending or alphabetical")
            }
            WalletError::Service(e) if e.kind().is_retryable() => Some("Please try again"),
            _ => None,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let message = self
            .user_message()
            .unwrap_or_else(|| "Operation failed".to_string());
        let err = AppError::new(self.kind(), message);
        match self.action() {
            Some(action) => err.with_action(action),
            None => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            WalletError::Service(e) => {
                tracing::error!(error = %e, "Wallet service error");
            }
            WalletError::Internal(msg) => {
                tracing::error!(message = %msg, "Wallet internal error");
            }
            WalletError::Rejected(msg) => {
                tracing::warn!(message = %msg, "Wallet operation rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Wallet validation error");
            }
        }
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        err.to_app_error()
    }
}
