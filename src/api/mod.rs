//! REST API module.
//!
//! Contains all API routes and handlers following the dashboard client contract.

mod attendance;
mod catalog;
mod changes;
mod dashboard;
mod promotions;
mod staff;

pub use attendance::*;
pub use catalog::*;
pub use changes::*;
pub use dashboard::*;
pub use promotions::*;
pub use staff::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::display;
use crate::errors::{AppError, AppErrorWithRevision};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// `?confirm=true` on destructive routes.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Result body of a confirmed-or-skipped delete.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

/// `?day=YYYY-MM-DD` on day-scoped routes; defaults to today.
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    #[serde(default)]
    pub day: Option<String>,
}

impl DayQuery {
    pub fn resolve(&self) -> Result<String, AppError> {
        match self.day.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(day) => {
                display::parse_day(day)?;
                Ok(day.to_string())
            }
            None => Ok(display::today()),
        }
    }
}
