//! Member management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{MemberChanges, MemberRecord, NewMember, Repositories};
use crate::services::{changed_text, optional_text, required_text};
use chrono::Utc;
use dahiraa_shared::{
    CotisationResponse, CreateMemberRequest, ListResponse, MemberResponse, Page,
    UpdateMemberRequest,
};
use tracing::info;
use validator::Validate;

impl From<MemberRecord> for MemberResponse {
    fn from(r: MemberRecord) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            email: r.email,
            address: r.address,
            joined_on: r.joined_on,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct MemberService;

impl MemberService {
    pub async fn create(repos: &Repositories, req: CreateMemberRequest) -> ApiResult<MemberResponse> {
        req.validate()?;

        let record = repos
            .members
            .create(NewMember {
                first_name: required_text("first_name", &req.first_name)?,
                last_name: required_text("last_name", &req.last_name)?,
                phone: optional_text(req.phone),
                email: optional_text(req.email),
                address: optional_text(req.address),
                joined_on: req.joined_on.unwrap_or_else(|| Utc::now().date_naive()),
                is_active: req.is_active.unwrap_or(true),
            })
            .await?;

        info!(member_id = %record.id, "Member created");
        Ok(record.into())
    }

    pub async fn get(repos: &Repositories, id: &str) -> ApiResult<MemberResponse> {
        repos
            .members
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(repos: &Repositories, page: Page) -> ApiResult<ListResponse<MemberResponse>> {
        let records = repos.members.list(page).await?;
        let total = repos.members.count().await?;
        Ok(ListResponse::new(
            records.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    pub async fn update(
        repos: &Repositories,
        id: &str,
        req: UpdateMemberRequest,
    ) -> ApiResult<MemberResponse> {
        req.validate()?;

        let changes = MemberChanges {
            first_name: changed_text("first_name", req.first_name)?,
            last_name: changed_text("last_name", req.last_name)?,
            phone: optional_text(req.phone),
            email: optional_text(req.email),
            address: optional_text(req.address),
            joined_on: req.joined_on,
            is_active: req.is_active,
        };

        let record = repos
            .members
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(member_id = %record.id, "Member updated");
        Ok(record.into())
    }

    /// Deletes the member together with its cotisations
    pub async fn delete(repos: &Repositories, id: &str) -> ApiResult<()> {
        if !repos.members.delete(id).await? {
            return Err(not_found(id));
        }
        info!(member_id = %id, "Member deleted");
        Ok(())
    }

    /// Dues paid by one member
    pub async fn cotisations(
        repos: &Repositories,
        id: &str,
        page: Page,
    ) -> ApiResult<ListResponse<CotisationResponse>> {
        if repos.members.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }
        let records = repos.cotisations.list(Some(id), page).await?;
        let total = repos.cotisations.count(Some(id)).await?;
        Ok(ListResponse::new(
            records.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Member {} not found", id))
}
