//! Route Values
//!
//! Current application path and the allow-list of public paths that never
//! force a PIN prompt.

use std::fmt;

/// Normalised application path
///
/// Always starts with `/`, carries no query string or fragment, and has no
/// trailing slash except for the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let path = raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        if path.is_empty() {
            return Self::root();
        }
        if path.starts_with('/') {
            Self(path.to_string())
        } else {
            Self(format!("/{}", path))
        }
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoutePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoutePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RoutePath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Paths reachable without PIN verification (exact match)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoutes(Vec<RoutePath>);

impl PublicRoutes {
    pub fn new<I, R>(routes: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoutePath>,
    {
        Self(routes.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, route: &RoutePath) -> bool {
        self.0.iter().any(|r| r == route)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutePath> {
        self.0.iter()
    }
}

impl Default for PublicRoutes {
    /// Landing page and the sign-in page
    fn default() -> Self {
        Self::new(["/", "/auth"])
    }
}
