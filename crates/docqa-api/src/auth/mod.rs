//! Authentication and authorization

pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;

pub use guard::{authorize, authorize_registration, Operation};
pub use jwt::{SessionClaims, TokenService};
pub use models::AuthContext;
pub use service::AuthService;
