//! Dahiraa Shared Library
//!
//! This crate contains the wire types, role model, error kinds and input
//! validation shared by the backend and any Rust client of the API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::Role;
pub use types::*;
