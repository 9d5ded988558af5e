//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{AuthUser, JwtService, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{is_unique_violation, UserChanges, UserRecord, UserRepository};
use dahiraa_shared::validation::{validate_email, validate_password};
use dahiraa_shared::{
    AuthResponse, ListResponse, LoginRequest, Page, ProfileResponse, ProfileUpdateResponse,
    RegisterRequest, UpdateProfileRequest, UserProfile,
};
use tracing::{info, warn};

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new account and sign a token for it
    pub async fn register(
        users: &dyn UserRepository,
        jwt: &JwtService,
        bcrypt_cost: u32,
        req: RegisterRequest,
    ) -> ApiResult<AuthResponse> {
        let email = req.email.trim();
        if email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        validate_email(email).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;

        if users.find_by_email(email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password, bcrypt_cost).await?;
        let role = req.role.unwrap_or_default();

        let user = users
            .create(email, &password_hash, role)
            .await
            .map_err(|e| conflict_or_internal(e, "User already exists"))?;

        let token = jwt.issue(&user.id, &user.email, role)?;
        info!(user_id = %user.id, role = %role, "User registered");

        Ok(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user.summary()?,
        })
    }

    /// Check credentials and sign a token
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(
        users: &dyn UserRepository,
        jwt: &JwtService,
        bcrypt_cost: u32,
        req: LoginRequest,
    ) -> ApiResult<AuthResponse> {
        let email = req.email.trim();
        if email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = users.find_by_email(email).await? else {
            PasswordService::dummy_verify_async(req.password, bcrypt_cost).await?;
            warn!("Login failed");
            return Err(ApiError::InvalidCredentials);
        };

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone()).await?;
        if !valid {
            warn!("Login failed");
            return Err(ApiError::InvalidCredentials);
        }

        let summary = user.summary()?;
        let token = jwt.issue(&summary.id, &summary.email, summary.role)?;
        info!(user_id = %summary.id, "User logged in");

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: summary,
        })
    }

    /// Full profile of the authenticated user
    pub async fn get_profile(users: &dyn UserRepository, user_id: &str) -> ApiResult<ProfileResponse> {
        let user = find_user(users, user_id).await?;
        Ok(ProfileResponse {
            user: user.profile()?,
        })
    }

    /// Change email and/or password
    ///
    /// A new password is accepted only together with the correct current
    /// password. Only supplied fields are written.
    pub async fn update_profile(
        users: &dyn UserRepository,
        jwt: &JwtService,
        bcrypt_cost: u32,
        auth: &AuthUser,
        req: UpdateProfileRequest,
    ) -> ApiResult<ProfileUpdateResponse> {
        if req.email.is_none() && req.new_password.is_none() {
            return Err(ApiError::Validation("No fields to update".to_string()));
        }

        let user = find_user(users, &auth.id).await?;
        let mut changes = UserChanges::default();

        if let Some(email) = req.email.as_deref().map(str::trim) {
            validate_email(email).map_err(ApiError::Validation)?;
            if email != user.email {
                if let Some(other) = users.find_by_email(email).await? {
                    if other.id != user.id {
                        return Err(ApiError::Conflict("Email already in use".to_string()));
                    }
                }
                changes.email = Some(email.to_string());
            }
        }

        if let Some(new_password) = req.new_password {
            let current = req
                .current_password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    ApiError::Validation(
                        "Current password is required to set a new password".to_string(),
                    )
                })?;

            let valid = PasswordService::verify_async(current, user.password_hash.clone()).await?;
            if !valid {
                warn!(user_id = %user.id, "Password change rejected");
                return Err(ApiError::Validation(
                    "Current password is incorrect".to_string(),
                ));
            }

            validate_password(&new_password).map_err(ApiError::Validation)?;
            changes.password_hash =
                Some(PasswordService::hash_async(new_password, bcrypt_cost).await?);
        }

        let user = if changes.is_empty() {
            user
        } else {
            let password_changed = changes.password_hash.is_some();
            let updated = users
                .update(&user.id, changes)
                .await
                .map_err(|e| conflict_or_internal(e, "Email already in use"))?
                .ok_or(ApiError::UserNotFound)?;
            info!(user_id = %updated.id, password_changed, "Profile updated");
            updated
        };

        let profile = user.profile()?;
        let token = jwt.issue(&profile.id, &profile.email, profile.role)?;

        Ok(ProfileUpdateResponse {
            message: "Profile updated successfully".to_string(),
            user: profile,
            token,
        })
    }

    /// Page through all accounts
    pub async fn list_users(
        users: &dyn UserRepository,
        page: Page,
    ) -> ApiResult<ListResponse<UserProfile>> {
        let records = users.list(page).await?;
        let total = users.count().await?;
        let items = records
            .iter()
            .map(UserRecord::profile)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(ListResponse::new(items, total, page))
    }
}

async fn find_user(users: &dyn UserRepository, user_id: &str) -> ApiResult<UserRecord> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::UserNotFound)
}

fn conflict_or_internal(err: anyhow::Error, message: &str) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::Conflict(message.to_string())
    } else {
        ApiError::Internal(err)
    }
}
