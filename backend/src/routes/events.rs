//! Event routes

use crate::auth::require_admin;
use crate::error::ApiResult;
use crate::routes::{ApiJson, ApiQuery};
use crate::services::EventService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
    Json, Router,
};
use dahiraa_shared::{CreateEventRequest, EventResponse, ListResponse, PageQuery, UpdateEventRequest};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(get_event)
                .put(update_event)
                .patch(update_event)
                .delete(delete_event.layer(from_fn(require_admin))),
        )
}

async fn list_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ListResponse<EventResponse>>> {
    Ok(Json(EventService::list(state.repos(), query.normalize()).await?))
}

async fn create_event(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = EventService::create(state.repos(), req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    Ok(Json(EventService::get(state.repos(), &id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    Ok(Json(EventService::update(state.repos(), &id, req).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    EventService::delete(state.repos(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
