//! PIN Gate Error Types
//!
//! Gate-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::http::BackendError;
use platform::pin::{PinHashError, PinPolicyError};
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

#[derive(Debug, Error)]
pub enum GateError {
    /// Operation requires a signed-in member
    #[error("Not signed in")]
    NotSignedIn,

    /// Candidate PIN fails the format or strength policy
    #[error(transparent)]
    InvalidPin(#[from] PinPolicyError),

    /// Setup PIN and confirmation differ
    #[error("PINs do not match")]
    PinMismatch,

    /// Setup attempted while a PIN is on record or status is unresolved
    #[error("PIN setup is not required")]
    SetupNotRequired,

    /// Backend call failed
    #[error("PIN service error: {0}")]
    Service(#[from] BackendError),

    #[error(transparent)]
    Hashing(#[from] PinHashError),

    /// Backend answered but refused the operation
    #[error("{0}")]
    Rejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::NotSignedIn => ErrorKind::Unauthorized,
            GateError::InvalidPin(_) | GateError::PinMismatch => ErrorKind::BadRequest,
            GateError::SetupNotRequired => ErrorKind::Conflict,
            GateError::Service(e) => e.kind(),
            GateError::Rejected(_) => ErrorKind::UnprocessableEntity,
            GateError::Hashing(_) | GateError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Description shown to the member in a notification
    pub fn user_message(&self) -> String {
        match self {
            GateError::Service(e) => e.user_message(),
            GateError::Hashing(_) | GateError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }

    /// Next step for the member, if there is one
    pub fn action(&self) -> Option<&'static str> {
        match self {
            GateError::NotSignedIn => Some("Sign in to continue"),
            GateError::InvalidPin(_) => Some("Choose 4 to 6 digits that are not a simple sequence"),
            GateError::PinMismatch => Some("Enter the same PIN twice"),
            GateError::SetupNotRequired => Some("Verify your existing PIN instead"),
            GateError::Service(e) if e.kind().is_retryable() => Some("Please try again"),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.user_message());
        match self.action() {
            Some(action) => err.with_action(action),
            None => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            GateError::Service(e) => {
                tracing::error!(error = %e, "PIN service error");
            }
            GateError::Hashing(e) => {
                tracing::error!(error = %e, "PIN hashing error");
            }
            GateError::Internal(msg) => {
                tracing::error!(message = %msg, "PIN gate internal error");
            }
            GateError::Rejected(msg) => {
                tracing::warn!(message = %msg, "PIN service rejected request");
            }
            _ => {
                tracing::debug!(error = %self, "PIN gate error");
            }
        }
    }
}
