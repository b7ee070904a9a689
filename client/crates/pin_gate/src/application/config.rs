//! Application Configuration
//!
//! Configuration for the PIN gate controller.

use std::time::Duration;

use platform::inactivity::DEFAULT_IDLE_THRESHOLD;

use crate::domain::value_object::{PublicRoutes, RoutePath};

/// PIN gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Routes reachable without PIN verification
    pub public_routes: PublicRoutes,
    /// Where a verified member lands when visiting a public route
    pub landing_route: RoutePath,
    /// Idle period after which verification is revoked
    pub idle_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_routes: PublicRoutes::default(),
            landing_route: RoutePath::new("/dashboard"),
            idle_timeout: DEFAULT_IDLE_THRESHOLD,
        }
    }
}

impl GateConfig {
    /// Create config for development (30 second idle timeout)
    pub fn development() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }
}
