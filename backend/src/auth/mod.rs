//! Authentication module
//!
//! JWT bearer tokens, bcrypt password hashing and role-gated middleware.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtKeys, JwtService};
pub use middleware::{
    auth_middleware, authenticate, bearer_token, require_admin, require_role, AuthUser,
};
pub use password::PasswordService;
