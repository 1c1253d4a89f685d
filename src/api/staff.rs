//! Staff API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult, ConfirmQuery, DeleteOutcome};
use crate::models::{Staff, StaffForm};
use crate::staff::{
    delete_staff as delete_staff_member, filter_staff, save_staff as save_staff_member,
};
use crate::AppState;

/// Staff list query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct StaffQuery {
    /// Free-text search over name, role, branch and phone.
    #[serde(default)]
    pub q: String,
}

/// GET /api/staff?q= - List staff, optionally filtered.
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> ApiResult<Vec<Staff>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_staff().await {
        Ok(staff) => success(filter_staff(staff, &query.q), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/staff - Submit the staff form (create or update).
pub async fn save_staff(
    State(state): State<AppState>,
    Json(form): Json<StaffForm>,
) -> ApiResult<Staff> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match save_staff_member(&state.repo, &form).await {
        Ok(staff) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(staff, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/staff/:id?confirm=true - Delete a staff member.
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<DeleteOutcome> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match delete_staff_member(&state.repo, &id, query.confirm).await {
        Ok(deleted) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(DeleteOutcome { deleted }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
