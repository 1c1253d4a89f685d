//! Attendance, bookings and task API endpoints.

use axum::extract::{Path, Query, State};

use super::{error, success, ApiResult, DayQuery};
use crate::attendance::{apply_action, summarize, DayAttendance};
use crate::display;
use crate::errors::AppError;
use crate::models::{Attendance, AttendanceAction, Booking};
use crate::tasks::{reconcile, TaskRow};
use crate::AppState;

/// GET /api/attendance?day= - Attendance records for a day, keyed by staff id.
pub async fn get_attendance(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> ApiResult<DayAttendance> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let day = match query.resolve() {
        Ok(day) => day,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.list_attendance(&day).await {
        Ok(records) => success(summarize(&day, records), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/attendance/:staff_id/:action?day= - Apply an attendance action.
pub async fn record_attendance(
    State(state): State<AppState>,
    Path((staff_id, action)): Path<(String, String)>,
    Query(query): Query<DayQuery>,
) -> ApiResult<Attendance> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(action) = AttendanceAction::from_path(&action) else {
        return error(
            AppError::BadRequest(format!("Unknown attendance action: {}", action)),
            revision_id,
        );
    };
    let day = match query.resolve() {
        Ok(day) => day,
        Err(e) => return error(e, revision_id),
    };

    match apply_action(&state.repo, &staff_id, &day, action, &display::now_hhmm()).await {
        Ok(record) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(record, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/bookings?day= - Bookings scheduled on a day.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> ApiResult<Vec<Booking>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let day = match query.resolve() {
        Ok(day) => day,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.list_bookings(&day).await {
        Ok(bookings) => success(bookings, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/tasks?day= - The day's bookings with staff resolved.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> ApiResult<Vec<TaskRow>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let day = match query.resolve() {
        Ok(day) => day,
        Err(e) => return error(e, revision_id),
    };

    let bookings = match state.repo.list_bookings(&day).await {
        Ok(bookings) => bookings,
        Err(e) => return error(e, revision_id),
    };
    let staff = match state.repo.list_staff().await {
        Ok(staff) => staff,
        Err(e) => return error(e, revision_id),
    };

    success(reconcile(&bookings, &staff), revision_id)
}
