//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories. Handlers stay thin.

pub mod cotisation;
pub mod event;
pub mod expense;
pub mod member;
pub mod user;

pub use cotisation::CotisationService;
pub use event::EventService;
pub use expense::ExpenseService;
pub use member::MemberService;
pub use user::UserService;

use crate::error::{ApiError, ApiResult};
use dahiraa_shared::validation::validate_not_blank;

/// Trim a required text field, rejecting blank values
pub(crate) fn required_text(field: &str, value: &str) -> ApiResult<String> {
    validate_not_blank(field, value).map_err(ApiError::Validation)?;
    Ok(value.trim().to_string())
}

/// Trim an optional text field; blank becomes absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Same as [`required_text`] for fields a partial update may omit
pub(crate) fn changed_text(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    value.map(|v| required_text(field, &v)).transpose()
}
