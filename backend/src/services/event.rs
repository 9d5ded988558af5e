//! Event management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{EventChanges, EventRecord, NewEvent, Repositories};
use crate::services::{changed_text, optional_text, required_text};
use dahiraa_shared::{CreateEventRequest, EventResponse, ListResponse, Page, UpdateEventRequest};
use tracing::info;
use validator::Validate;

impl From<EventRecord> for EventResponse {
    fn from(r: EventRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            location: r.location,
            starts_on: r.starts_on,
            budget: r.budget,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct EventService;

impl EventService {
    pub async fn create(repos: &Repositories, req: CreateEventRequest) -> ApiResult<EventResponse> {
        req.validate()?;

        let record = repos
            .events
            .create(NewEvent {
                title: required_text("title", &req.title)?,
                description: optional_text(req.description),
                location: optional_text(req.location),
                starts_on: req.starts_on,
                budget: req.budget,
            })
            .await?;

        info!(event_id = %record.id, "Event created");
        Ok(record.into())
    }

    pub async fn get(repos: &Repositories, id: &str) -> ApiResult<EventResponse> {
        repos
            .events
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(repos: &Repositories, page: Page) -> ApiResult<ListResponse<EventResponse>> {
        let records = repos.events.list(page).await?;
        let total = repos.events.count().await?;
        Ok(ListResponse::new(
            records.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    pub async fn update(
        repos: &Repositories,
        id: &str,
        req: UpdateEventRequest,
    ) -> ApiResult<EventResponse> {
        req.validate()?;

        let changes = EventChanges {
            title: changed_text("title", req.title)?,
            description: optional_text(req.description),
            location: optional_text(req.location),
            starts_on: req.starts_on,
            budget: req.budget,
        };

        let record = repos
            .events
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(event_id = %record.id, "Event updated");
        Ok(record.into())
    }

    /// Deletes the event; its expenses remain, unlinked
    pub async fn delete(repos: &Repositories, id: &str) -> ApiResult<()> {
        if !repos.events.delete(id).await? {
            return Err(not_found(id));
        }
        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Event {} not found", id))
}
