//! Authentication routes
//!
//! Registration, login and the caller's own profile.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dahiraa_shared::{
    AuthResponse, LoginRequest, ProfileResponse, ProfileUpdateResponse, RegisterRequest,
    UpdateProfileRequest,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/profile",
            get(get_profile).put(update_profile).patch(update_profile),
        )
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let res =
        UserService::register(state.repos().users.as_ref(), state.jwt(), state.bcrypt_cost(), req)
            .await?;
    Ok((StatusCode::CREATED, Json(res)))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let res =
        UserService::login(state.repos().users.as_ref(), state.jwt(), state.bcrypt_cost(), req)
            .await?;
    Ok(Json(res))
}

/// GET /api/auth/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = UserService::get_profile(state.repos().users.as_ref(), &auth.id).await?;
    Ok(Json(profile))
}

/// PUT|PATCH /api/auth/profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileUpdateResponse>> {
    let res = UserService::update_profile(
        state.repos().users.as_ref(),
        state.jwt(),
        state.bcrypt_cost(),
        &auth,
        req,
    )
    .await?;
    Ok(Json(res))
}
