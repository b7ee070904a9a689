//! PIN Hashing and Verification
//!
//! Session PINs are short numeric secrets, so they get the same treatment
//! as passwords:
//! - Argon2id hashing (memory-hard)
//! - Zeroization of the clear-text value
//! - Redacted `Debug` output
//!
//! Format validation (`ClearTextPin::new`) is separate from the strength
//! policy (`ClearTextPin::check_strength`): a PIN typed at the verification
//! prompt is only format-checked, a newly chosen PIN must pass both.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum PIN length (digits)
pub const MIN_PIN_LENGTH: usize = 4;

/// Maximum PIN length (digits)
pub const MAX_PIN_LENGTH: usize = 6;

// ============================================================================
// Error Types
// ============================================================================

/// PIN format / policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinPolicyError {
    #[error("PIN must be {min} to {max} digits (got {actual})")]
    InvalidLength { min: usize, max: usize, actual: usize },

    #[error("PIN must contain digits only")]
    NonDigit,

    #[error("PIN is too easy to guess")]
    Guessable,
}

#[derive(Debug, Error)]
pub enum PinHashError {
    #[error("PIN hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid PIN hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text PIN (Zeroized on drop)
// ============================================================================

/// Clear text PIN, erased from memory on drop
///
/// Not `Clone`, so the secret is never silently duplicated.
///
/// ## Examples
/// ```rust
/// use platform::pin::ClearTextPin;
///
/// let pin = ClearTextPin::new("4821").unwrap();
/// let hashed = pin.hash(None).unwrap();
/// assert!(hashed.verify(&pin, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPin(String);

impl ClearTextPin {
    /// Validate format: 4 to 6 ASCII digits, surrounding whitespace ignored
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PinPolicyError> {
        let trimmed = raw.as_ref().trim();

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(PinPolicyError::NonDigit);
        }

        let len = trimmed.len();
        if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&len) {
            return Err(PinPolicyError::InvalidLength {
                min: MIN_PIN_LENGTH,
                max: MAX_PIN_LENGTH,
                actual: len,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Strength policy for newly chosen PINs
    ///
    /// Rejects a single repeated digit (`0000`) and straight runs in either
    /// direction (`1234`, `9876`).
    pub fn check_strength(&self) -> Result<(), PinPolicyError> {
        if is_guessable(self.0.as_bytes()) {
            return Err(PinPolicyError::Guessable);
        }
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Compare two clear-text PINs (setup confirmation)
    pub fn matches(&self, other: &ClearTextPin) -> bool {
        let (a, b) = (self.as_bytes(), other.as_bytes());
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }

    /// Expose the digits for transmission to the backend
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Hash with Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPin, PinHashError> {
        let mut input = peppered(self.as_bytes(), pepper);
        let salt = SaltString::generate(OsRng);

        let result = Argon2::default()
            .hash_password(&input, &salt)
            .map(|hash| HashedPin {
                hash: hash.to_string(),
            })
            .map_err(|e| PinHashError::HashingFailed(e.to_string()));

        input.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPin").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed PIN (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPin {
    hash: String,
}

impl HashedPin {
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PinHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PinHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification (Argon2 compares internally)
    pub fn verify(&self, pin: &ClearTextPin, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let mut input = peppered(pin.as_bytes(), pepper);
        let ok = Argon2::default().verify_password(&input, &parsed).is_ok();
        input.zeroize();
        ok
    }
}

impl fmt::Debug for HashedPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPin").field("hash", &"[HASH]").finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn peppered(pin: &[u8], pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = pin.to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

fn is_guessable(digits: &[u8]) -> bool {
    if digits.iter().all(|&d| d == digits[0]) {
        return true;
    }

    let steps: Vec<i16> = digits
        .windows(2)
        .map(|w| i16::from(w[1]) - i16::from(w[0]))
        .collect();

    steps.iter().all(|&s| s == 1) || steps.iter().all(|&s| s == -1)
}
