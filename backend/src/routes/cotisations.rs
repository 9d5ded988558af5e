//! Cotisation (dues) routes

use crate::auth::require_admin;
use crate::error::ApiResult;
use crate::routes::{ApiJson, ApiQuery};
use crate::services::CotisationService;
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
    CotisationQuery, CotisationResponse, CreateCotisationRequest, ListResponse,
    UpdateCotisationRequest,
};

pub fn cotisation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cotisations).post(create_cotisation))
        .route(
            "/:id",
            get(get_cotisation)
                .put(update_cotisation)
                .patch(update_cotisation)
                .delete(delete_cotisation.layer(from_fn(require_admin))),
        )
}

/// GET /api/cotisations?memberId=&limit=&offset=
async fn list_cotisations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CotisationQuery>,
) -> ApiResult<Json<ListResponse<CotisationResponse>>> {
    Ok(Json(CotisationService::list(state.repos(), query).await?))
}

async fn create_cotisation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCotisationRequest>,
) -> ApiResult<(StatusCode, Json<CotisationResponse>)> {
    let cotisation = CotisationService::create(state.repos(), req).await?;
    Ok((StatusCode::CREATED, Json(cotisation)))
}

async fn get_cotisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CotisationResponse>> {
    Ok(Json(CotisationService::get(state.repos(), &id).await?))
}

async fn update_cotisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCotisationRequest>,
) -> ApiResult<Json<CotisationResponse>> {
    Ok(Json(CotisationService::update(state.repos(), &id, req).await?))
}

async fn delete_cotisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    CotisationService::delete(state.repos(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
