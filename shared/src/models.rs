//! Domain models for the Dahiraa application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
///
/// Serialized in upper case (`"ADMIN"`, `"GESTIONNAIRE"`) both on the wire
/// and in the `users.role` column.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    Gestionnaire,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Gestionnaire];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Gestionnaire => "GESTIONNAIRE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "GESTIONNAIRE" => Ok(Role::Gestionnaire),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}
