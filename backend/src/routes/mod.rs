//! Route definitions for the Dahiraa API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::auth_middleware;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts},
    http::{header, Method},
    middleware::from_fn_with_state,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod cotisations;
mod events;
mod expenses;
mod health;
mod members;
mod users;


pub use auth::auth_routes;
pub use health::health_routes;

/// JSON body extractor whose rejection uses the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejection uses the API error shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let server = &state.config().server;
    let request_timeout = Duration::from_secs(server.request_timeout_secs);
    let body_limit = server.body_limit_bytes;

    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Apply middleware layers
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything under /api
fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/users", users::user_routes())
        .nest("/members", members::member_routes())
        .nest("/cotisations", cotisations::cotisation_routes())
        .nest("/events", events::event_routes())
        .nest("/expenses", expenses::expense_routes())
        .route_layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .merge(protected)
}
