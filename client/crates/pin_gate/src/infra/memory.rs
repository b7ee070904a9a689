//! In-Memory Implementations
//!
//! Process-local PIN store, identity source and profile directory. Used by the console when no
//! backend is configured, and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::id::UserId;
use platform::http::BackendError;
use platform::pin::{ClearTextPin, HashedPin};
use tokio::sync::RwLock;

use crate::domain::entity::{Identity, MemberProfile, MemberRole};
use crate::domain::services::{
    IdentityProvider, PinSetupService, PinStatusLookup, PinVerifier, ProfileDirectory,
};
use crate::error::{GateError, GateResult};

/// Argon2-hashed PINs keyed by member
#[derive(Debug, Default)]
pub struct InMemoryPinStore {
    pins: RwLock<HashMap<UserId, HashedPin>>,
    pepper: Option<Vec<u8>>,
    unavailable: AtomicBool,
}

impl InMemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pepper(pepper: impl Into<Vec<u8>>) -> Self {
        Self {
            pepper: Some(pepper.into()),
            ..Self::default()
        }
    }

    /// Seed a PIN for a member
    pub async fn with_pin(self, user_id: UserId, pin: &str) -> GateResult<Self> {
        let hashed = ClearTextPin::new(pin)?.hash(self.pepper())?;
        self.pins.write().await.insert(user_id, hashed);
        Ok(self)
    }

    /// Make every call fail as if the backend were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn pepper(&self) -> Option<&[u8]> {
        self.pepper.as_deref()
    }

    fn ensure_available(&self) -> GateResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GateError::Service(BackendError::Status {
                status: 503,
                message: "PIN service unavailable".to_string(),
            }));
        }
        Ok(())
    }
}

impl PinStatusLookup for InMemoryPinStore {
    async fn has_pin(&self, user_id: &UserId) -> GateResult<bool> {
        self.ensure_available()?;
        Ok(self.pins.read().await.contains_key(user_id))
    }
}

impl PinVerifier for InMemoryPinStore {
    async fn verify(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<bool> {
        self.ensure_available()?;
        let pins = self.pins.read().await;
        Ok(pins
            .get(user_id)
            .is_some_and(|hashed| hashed.verify(pin, self.pepper())))
    }
}

impl PinSetupService for InMemoryPinStore {
    async fn set_pin(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<()> {
        self.ensure_available()?;
        let hashed = pin.hash(self.pepper())?;
        self.pins.write().await.insert(*user_id, hashed);
        Ok(())
    }
}

/// Identity source with a settable current member
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    current: RwLock<Option<Identity>>,
}

impl StaticIdentityProvider {
    pub fn new(current: Option<Identity>) -> Self {
        Self {
            current: RwLock::new(current),
        }
    }

    pub async fn set(&self, identity: Option<Identity>) {
        *self.current.write().await = identity;
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(&self) -> GateResult<Option<Identity>> {
        Ok(self.current.read().await.clone())
    }
}

/// Profiles and granted roles keyed by member
#[derive(Debug, Default)]
pub struct InMemoryProfileDirectory {
    profiles: RwLock<HashMap<UserId, MemberProfile>>,
    roles: RwLock<HashMap<UserId, MemberRole>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_role(self, user_id: UserId, role: MemberRole) -> Self {
        self.roles.write().await.insert(user_id, role);
        self
    }

    pub async fn profile(&self, user_id: &UserId) -> Option<MemberProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }
}

impl ProfileDirectory for InMemoryProfileDirectory {
    async fn upsert_profile(&self, profile: &MemberProfile) -> GateResult<()> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn role_of(&self, user_id: &UserId) -> GateResult<Option<MemberRole>> {
        Ok(self.roles.read().await.get(user_id).copied())
    }
}
