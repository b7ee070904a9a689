//! Member Profile Entity
//!
//! Row written to the profile directory on sign-in, and the role read back.

use derive_more::Display;
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::entity::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub username: String,
}

impl From<&Identity> for MemberProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username().to_string(),
        }
    }
}

/// App-wide role; anything other than `admin` is an ordinary member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum MemberRole {
    #[display("admin")]
    Admin,
    #[default]
    #[display("member")]
    Member,
}

impl MemberRole {
    pub fn from_role(role: &str) -> Self {
        if role.trim().eq_ignore_ascii_case("admin") {
            MemberRole::Admin
        } else {
            MemberRole::Member
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }
}
