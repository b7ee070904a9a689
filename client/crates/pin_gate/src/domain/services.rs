//! Collaborator Traits
//!
//! Interfaces the gate controller calls out to. Implementations live in the
//! infrastructure layer.

use kernel::id::UserId;
use platform::pin::ClearTextPin;

use crate::domain::entity::{Identity, MemberProfile, MemberRole};
use crate::error::GateResult;

/// Source of the signed-in member
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Current member, `None` when signed out
    async fn current_identity(&self) -> GateResult<Option<Identity>>;
}

/// PIN status lookup
#[trait_variant::make(PinStatusLookup: Send)]
pub trait LocalPinStatusLookup {
    /// Whether a PIN record exists for the member
    async fn has_pin(&self, user_id: &UserId) -> GateResult<bool>;
}

/// PIN verification
#[trait_variant::make(PinVerifier: Send)]
pub trait LocalPinVerifier {
    /// `Ok(false)` on mismatch, `Err` only when the service failed
    async fn verify(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<bool>;
}

/// PIN setup
#[trait_variant::make(PinSetupService: Send)]
pub trait LocalPinSetupService {
    async fn set_pin(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<()>;
}

/// Member profiles and app-wide roles
#[trait_variant::make(ProfileDirectory: Send)]
pub trait LocalProfileDirectory {
    /// Create the profile or refresh its username
    async fn upsert_profile(&self, profile: &MemberProfile) -> GateResult<()>;

    /// `None` when no role has been granted
    async fn role_of(&self, user_id: &UserId) -> GateResult<Option<MemberRole>>;
}
