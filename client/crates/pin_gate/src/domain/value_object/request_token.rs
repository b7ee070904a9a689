//! Request Token
//!
//! Tags an in-flight collaborator request so that a late response can be
//! matched against the request the gate is still waiting for.

use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{_0}")]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Next token in sequence
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub(crate) const fn zero() -> Self {
        Self(0)
    }
}
