//! PIN Setup Status
//!
//! Tri-state answer to "has this member configured a PIN?".

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSetupStatus {
    /// Not looked up yet, or the lookup failed
    #[default]
    Unknown,
    /// No PIN record exists
    Missing,
    /// A PIN record exists
    Present,
}

impl PinSetupStatus {
    /// Map a lookup result; `None` means the lookup failed
    #[inline]
    pub const fn from_lookup(result: Option<bool>) -> Self {
        match result {
            Some(true) => Self::Present,
            Some(false) => Self::Missing,
            None => Self::Unknown,
        }
    }

    #[inline]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Missing => "missing",
            Self::Present => "present",
        }
    }
}

impl fmt::Display for PinSetupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
