//! Cotisation (membership dues) management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{
    is_foreign_key_violation, CotisationChanges, CotisationRecord, NewCotisation, Repositories,
};
use crate::services::{changed_text, optional_text, required_text};
use chrono::Utc;
use dahiraa_shared::{
    CotisationQuery, CotisationResponse, CreateCotisationRequest, ListResponse,
    UpdateCotisationRequest,
};
use tracing::info;
use validator::Validate;

impl From<CotisationRecord> for CotisationResponse {
    fn from(r: CotisationRecord) -> Self {
        Self {
            id: r.id,
            member_id: r.member_id,
            amount: r.amount,
            period: r.period,
            paid_on: r.paid_on,
            payment_method: r.payment_method,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct CotisationService;

impl CotisationService {
    /// Record a payment. The member must exist.
    pub async fn create(
        repos: &Repositories,
        req: CreateCotisationRequest,
    ) -> ApiResult<CotisationResponse> {
        req.validate()?;
        let member_id = required_text("member_id", &req.member_id)?;

        if repos.members.find_by_id(&member_id).await?.is_none() {
            return Err(unknown_member(&member_id));
        }

        let record = repos
            .cotisations
            .create(NewCotisation {
                member_id: member_id.clone(),
                amount: req.amount,
                period: required_text("period", &req.period)?,
                paid_on: req.paid_on.unwrap_or_else(|| Utc::now().date_naive()),
                payment_method: optional_text(req.payment_method),
                notes: optional_text(req.notes),
            })
            .await
            .map_err(|e| {
                // Member deleted between the check and the insert
                if is_foreign_key_violation(&e) {
                    unknown_member(&member_id)
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(cotisation_id = %record.id, member_id = %record.member_id, amount = record.amount, "Cotisation recorded");
        Ok(record.into())
    }

    pub async fn get(repos: &Repositories, id: &str) -> ApiResult<CotisationResponse> {
        repos
            .cotisations
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(
        repos: &Repositories,
        query: CotisationQuery,
    ) -> ApiResult<ListResponse<CotisationResponse>> {
        let page = query.page();
        let member_id = query.member_id.as_deref().filter(|m| !m.is_empty());

        let records = repos.cotisations.list(member_id, page).await?;
        let total = repos.cotisations.count(member_id).await?;
        Ok(ListResponse::new(
            records.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    pub async fn update(
        repos: &Repositories,
        id: &str,
        req: UpdateCotisationRequest,
    ) -> ApiResult<CotisationResponse> {
        req.validate()?;

        let changes = CotisationChanges {
            amount: req.amount,
            period: changed_text("period", req.period)?,
            paid_on: req.paid_on,
            payment_method: optional_text(req.payment_method),
            notes: optional_text(req.notes),
        };

        let record = repos
            .cotisations
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(cotisation_id = %record.id, "Cotisation updated");
        Ok(record.into())
    }

    pub async fn delete(repos: &Repositories, id: &str) -> ApiResult<()> {
        if !repos.cotisations.delete(id).await? {
            return Err(not_found(id));
        }
        info!(cotisation_id = %id, "Cotisation deleted");
        Ok(())
    }
}

fn unknown_member(member_id: &str) -> ApiError {
    ApiError::Validation(format!("Member {} does not exist", member_id))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Cotisation {} not found", id))
}
