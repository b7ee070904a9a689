//! Value Object Module

pub mod pin_setup_status;
pub mod request_token;
pub mod route;

pub use pin_setup_status::PinSetupStatus;
pub use request_token::RequestToken;
pub use route::{PublicRoutes, RoutePath};
