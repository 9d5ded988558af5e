//! Member routes
//!
//! Mounted behind the auth layer; DELETE additionally requires ADMIN.

use crate::auth::require_admin;
use crate::error::ApiResult;
use crate::routes::{ApiJson, ApiQuery};
use crate::services::MemberService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
    Json, Router,
};
use dahiraa_shared::{
    CotisationResponse, CreateMemberRequest, ListResponse, MemberResponse, PageQuery,
    UpdateMemberRequest,
};

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/:id",
            get(get_member)
                .put(update_member)
                .patch(update_member)
                .delete(delete_member.layer(from_fn(require_admin))),
        )
        .route("/:id/cotisations", get(list_member_cotisations))
}

async fn list_members(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ListResponse<MemberResponse>>> {
    Ok(Json(MemberService::list(state.repos(), query.normalize()).await?))
}

async fn create_member(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateMemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberResponse>)> {
    let member = MemberService::create(state.repos(), req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MemberResponse>> {
    Ok(Json(MemberService::get(state.repos(), &id).await?))
}

async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    Ok(Json(MemberService::update(state.repos(), &id, req).await?))
}

async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    MemberService::delete(state.repos(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_member_cotisations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ListResponse<CotisationResponse>>> {
    Ok(Json(
        MemberService::cotisations(state.repos(), &id, query.normalize()).await?,
    ))
}
