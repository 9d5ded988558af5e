//! Account listing (admin only)

use crate::auth::require_admin;
use crate::error::ApiResult;
use crate::routes::ApiQuery;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, middleware::from_fn, routing::get, Json, Router};
use dahiraa_shared::{ListResponse, PageQuery, UserProfile};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route_layer(from_fn(require_admin))
}

/// GET /api/users
async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ListResponse<UserProfile>>> {
    let users = UserService::list_users(state.repos().users.as_ref(), query.normalize()).await?;
    Ok(Json(users))
}
