//! Backend Implementations
//!
//! PIN services, identity lookup and the profile directory over the hosted
//! backend.

use kernel::id::UserId;
use platform::http::{BackendClient, RowQuery};
use platform::pin::ClearTextPin;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Identity, MemberProfile, MemberRole};
use crate::domain::services::{
    IdentityProvider, PinSetupService, PinStatusLookup, PinVerifier, ProfileDirectory,
};
use crate::error::{GateError, GateResult};

const PIN_TABLE: &str = "user_pins_enhanced";
const VERIFY_FUNCTION: &str = "verify-pin";
const SET_FUNCTION: &str = "set-pin";
const PROFILES_TABLE: &str = "profiles";
const ROLES_TABLE: &str = "user_roles";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinRequest<'a> {
    user_id: UserId,
    pin: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyPinResponse {
    #[serde(default)]
    valid: bool,
}

#[derive(Debug, Deserialize)]
struct SetPinResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

/// PIN status, verification and setup over the backend
#[derive(Clone)]
pub struct RestPinService {
    client: BackendClient,
}

impl RestPinService {
    /// `client` should carry the member's access token
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl PinStatusLookup for RestPinService {
    async fn has_pin(&self, user_id: &UserId) -> GateResult<bool> {
        let exists = self
            .client
            .select_exists(PIN_TABLE, &[("user_id", user_id.to_string())])
            .await?;
        Ok(exists)
    }
}

impl PinVerifier for RestPinService {
    async fn verify(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<bool> {
        let request = PinRequest {
            user_id: *user_id,
            pin: pin.expose(),
        };
        let response: VerifyPinResponse = self
            .client
            .invoke_function(VERIFY_FUNCTION, &request)
            .await?;
        Ok(response.valid)
    }
}

impl PinSetupService for RestPinService {
    async fn set_pin(&self, user_id: &UserId, pin: &ClearTextPin) -> GateResult<()> {
        let request = PinRequest {
            user_id: *user_id,
            pin: pin.expose(),
        };
        let response: SetPinResponse = self.client.invoke_function(SET_FUNCTION, &request).await?;
        check_set_pin(response)
    }
}

fn check_set_pin(response: SetPinResponse) -> GateResult<()> {
    if response.success {
        Ok(())
    } else {
        Err(GateError::Rejected(
            response
                .error
                .unwrap_or_else(|| "Failed to set PIN".to_string()),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

impl From<AuthUser> for Identity {
    fn from(user: AuthUser) -> Self {
        Identity {
            user_id: user.id,
            email: user.email,
            full_name: user.user_metadata.full_name,
        }
    }
}

/// Signed-in member from the backend auth endpoint
#[derive(Clone)]
pub struct RestIdentityProvider {
    client: BackendClient,
}

impl RestIdentityProvider {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl IdentityProvider for RestIdentityProvider {
    async fn current_identity(&self) -> GateResult<Option<Identity>> {
        let user: Option<AuthUser> = self.client.current_user().await?;
        Ok(user.map(Identity::from))
    }
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: String,
}

/// Profiles and roles tables
#[derive(Clone)]
pub struct RestProfileDirectory {
    client: BackendClient,
}

impl RestProfileDirectory {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl ProfileDirectory for RestProfileDirectory {
    async fn upsert_profile(&self, profile: &MemberProfile) -> GateResult<()> {
        self.client.upsert_row(PROFILES_TABLE, profile).await?;
        Ok(())
    }

    async fn role_of(&self, user_id: &UserId) -> GateResult<Option<MemberRole>> {
        let rows: Vec<RoleRow> = self
            .client
            .select_rows(
                ROLES_TABLE,
                &RowQuery::new("role").eq("user_id", user_id).limit(1),
            )
            .await?;
        Ok(rows.first().map(|row| MemberRole::from_role(&row.role)))
    }
}
