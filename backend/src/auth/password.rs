//! Password hashing
//!
//! New digests are bcrypt. Verification also accepts Argon2 digests so that
//! accounts hashed by earlier deployments keep working.
//!
//! Both algorithms are intentionally CPU-intensive; async callers use the
//! `*_async` variants, which run on the blocking thread pool.

use anyhow::{bail, Result};
use argon2::{
    password_hash::{self, PasswordHash, PasswordVerifier},
    Argon2,
};
use once_cell::sync::OnceCell;

/// Password hashing service
pub struct PasswordService;

static DUMMY_DIGEST: OnceCell<String> = OnceCell::new();

/// bcrypt reads at most this many bytes of the password
const BCRYPT_MAX_BYTES: usize = 72;

impl PasswordService {
    /// Hash a password with bcrypt (blocking operation)
    pub fn hash(password: &str, cost: u32) -> Result<String> {
        if password.len() > BCRYPT_MAX_BYTES {
            bail!("Password exceeds {} bytes", BCRYPT_MAX_BYTES);
        }
        bcrypt::hash(password, cost).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String, cost: u32) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored digest (blocking operation)
    ///
    /// Returns `Ok(false)` for a wrong password and an error for a digest
    /// that is neither bcrypt nor Argon2.
    pub fn verify(password: &str, digest: &str) -> Result<bool> {
        if is_bcrypt(digest) {
            let matches = bcrypt::verify(password, digest)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt digest: {}", e))?;
            // No stored digest covers more than 72 bytes
            return Ok(matches && password.len() <= BCRYPT_MAX_BYTES);
        }
        if digest.starts_with("$argon2") {
            let parsed = PasswordHash::new(digest)
                .map_err(|e| anyhow::anyhow!("Invalid argon2 digest: {}", e))?;
            if parsed.hash.is_none() {
                bail!("Invalid argon2 digest: missing hash output");
            }
            return match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow::anyhow!("Invalid argon2 digest: {}", e)),
            };
        }
        bail!("Unrecognized password digest format")
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, digest: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &digest))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Burn one verification against a throwaway digest.
    ///
    /// Login calls this for unknown emails so both failure paths take
    /// about the same time.
    pub async fn dummy_verify_async(password: String, cost: u32) -> Result<()> {
        tokio::task::spawn_blocking(move || -> Result<()> {
            let digest = DUMMY_DIGEST.get_or_try_init(|| Self::hash("dahiraa-dummy-password", cost))?;
            Self::verify(&password, digest)?;
            Ok(())
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

fn is_bcrypt(digest: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| digest.starts_with(prefix))
}
