//! Expense routes

use crate::auth::require_admin;
use crate::error::ApiResult;
use crate::routes::{ApiJson, ApiQuery};
use crate::services::ExpenseService;
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
    CreateExpenseRequest, ExpenseQuery, ExpenseResponse, ListResponse, UpdateExpenseRequest,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route(
            "/:id",
            get(get_expense)
                .put(update_expense)
                .patch(update_expense)
                .delete(delete_expense.layer(from_fn(require_admin))),
        )
}

/// GET /api/expenses?eventId=&limit=&offset=
async fn list_expenses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpenseQuery>,
) -> ApiResult<Json<ListResponse<ExpenseResponse>>> {
    Ok(Json(ExpenseService::list(state.repos(), query).await?))
}

async fn create_expense(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<ExpenseResponse>)> {
    let expense = ExpenseService::create(state.repos(), req).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExpenseResponse>> {
    Ok(Json(ExpenseService::get(state.repos(), &id).await?))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateExpenseRequest>,
) -> ApiResult<Json<ExpenseResponse>> {
    Ok(Json(ExpenseService::update(state.repos(), &id, req).await?))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    ExpenseService::delete(state.repos(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
