//! Sign-in Profile Sync
//!
//! Writes the member's profile and reads their app-wide role after sign-in.
//! Neither step can block the member: failures are logged and the member is
//! treated as a non-admin.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::error::kind::ErrorKind;

use crate::domain::entity::{Identity, MemberProfile, MemberRole};
use crate::domain::services::ProfileDirectory;

pub struct ProfileSync<D>
where
    D: ProfileDirectory,
{
    directory: Arc<D>,
    is_admin: AtomicBool,
}

impl<D> ProfileSync<D>
where
    D: ProfileDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            is_admin: AtomicBool::new(false),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.load(Ordering::SeqCst)
    }

    /// Returns whether the member is an admin
    pub async fn on_sign_in(&self, identity: &Identity) -> bool {
        let profile = MemberProfile::from(identity);
        match self.directory.upsert_profile(&profile).await {
            Ok(()) => tracing::debug!(user_id = %identity.user_id, "Profile saved"),
            // Another session created the row first
            Err(e) if e.kind() == ErrorKind::Conflict => {}
            Err(e) => {
                tracing::warn!(user_id = %identity.user_id, error = %e, "Profile update failed");
            }
        }

        let role = match self.directory.role_of(&identity.user_id).await {
            Ok(role) => role.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(user_id = %identity.user_id, error = %e, "Role lookup failed");
                MemberRole::Member
            }
        };
        tracing::info!(user_id = %identity.user_id, %role, "Member role resolved");

        self.is_admin.store(role.is_admin(), Ordering::SeqCst);
        role.is_admin()
    }

    pub fn on_sign_out(&self) {
        self.is_admin.store(false, Ordering::SeqCst);
    }
}
