//! Expense management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{
    is_foreign_key_violation, ExpenseChanges, ExpenseRecord, NewExpense, Repositories,
};
use crate::services::{changed_text, optional_text, required_text};
use chrono::Utc;
use dahiraa_shared::{
    CreateExpenseRequest, ExpenseQuery, ExpenseResponse, ListResponse, UpdateExpenseRequest,
};
use tracing::info;
use validator::Validate;

impl From<ExpenseRecord> for ExpenseResponse {
    fn from(r: ExpenseRecord) -> Self {
        Self {
            id: r.id,
            label: r.label,
            amount: r.amount,
            category: r.category,
            spent_on: r.spent_on,
            event_id: r.event_id,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct ExpenseService;

impl ExpenseService {
    pub async fn create(
        repos: &Repositories,
        req: CreateExpenseRequest,
    ) -> ApiResult<ExpenseResponse> {
        req.validate()?;
        let event_id = optional_text(req.event_id);
        ensure_event_exists(repos, event_id.as_deref()).await?;

        let record = repos
            .expenses
            .create(NewExpense {
                label: required_text("label", &req.label)?,
                amount: req.amount,
                category: optional_text(req.category),
                spent_on: req.spent_on.unwrap_or_else(|| Utc::now().date_naive()),
                event_id: event_id.clone(),
                notes: optional_text(req.notes),
            })
            .await
            .map_err(|e| event_link_error(e, event_id.as_deref()))?;

        info!(expense_id = %record.id, amount = record.amount, "Expense recorded");
        Ok(record.into())
    }

    pub async fn get(repos: &Repositories, id: &str) -> ApiResult<ExpenseResponse> {
        repos
            .expenses
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(
        repos: &Repositories,
        query: ExpenseQuery,
    ) -> ApiResult<ListResponse<ExpenseResponse>> {
        let page = query.page();
        let event_id = query.event_id.as_deref().filter(|e| !e.is_empty());

        let records = repos.expenses.list(event_id, page).await?;
        let total = repos.expenses.count(event_id).await?;
        Ok(ListResponse::new(
            records.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    pub async fn update(
        repos: &Repositories,
        id: &str,
        req: UpdateExpenseRequest,
    ) -> ApiResult<ExpenseResponse> {
        req.validate()?;
        let event_id = optional_text(req.event_id);
        ensure_event_exists(repos, event_id.as_deref()).await?;

        let changes = ExpenseChanges {
            label: changed_text("label", req.label)?,
            amount: req.amount,
            category: optional_text(req.category),
            spent_on: req.spent_on,
            event_id: event_id.clone(),
            notes: optional_text(req.notes),
        };

        let record = repos
            .expenses
            .update(id, changes)
            .await
            .map_err(|e| event_link_error(e, event_id.as_deref()))?
            .ok_or_else(|| not_found(id))?;

        info!(expense_id = %record.id, "Expense updated");
        Ok(record.into())
    }

    pub async fn delete(repos: &Repositories, id: &str) -> ApiResult<()> {
        if !repos.expenses.delete(id).await? {
            return Err(not_found(id));
        }
        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }
}

async fn ensure_event_exists(repos: &Repositories, event_id: Option<&str>) -> ApiResult<()> {
    if let Some(event_id) = event_id {
        if repos.events.find_by_id(event_id).await?.is_none() {
            return Err(unknown_event(event_id));
        }
    }
    Ok(())
}

fn event_link_error(err: anyhow::Error, event_id: Option<&str>) -> ApiError {
    match event_id {
        Some(event_id) if is_foreign_key_violation(&err) => unknown_event(event_id),
        _ => ApiError::Internal(err),
    }
}

fn unknown_event(event_id: &str) -> ApiError {
    ApiError::Validation(format!("Event {} does not exist", event_id))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Expense {} not found", id))
}
