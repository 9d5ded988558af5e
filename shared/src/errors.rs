//! Error types for the Dahiraa application

use thiserror::Error;

/// Authentication error types
///
/// `TokenExpired` and `InvalidToken` are kept apart so that callers can tell
/// an old token from a forged one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}
