//! Dashboard API endpoint.

use axum::extract::State;
use chrono::Local;

use super::{error, success, ApiResult};
use crate::dashboard::{self, Dashboard};
use crate::errors::AppError;
use crate::AppState;

/// GET /api/dashboard - Catalogue stats and recent activity.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match load(&state).await {
        Ok(dashboard) => success(dashboard, revision_id),
        Err(e) => error(e, revision_id),
    }
}

async fn load(state: &AppState) -> Result<Dashboard, AppError> {
    let services = state.repo.list_services().await?;
    let categories = state.repo.list_categories().await?;
    let branches = state.repo.list_branches().await?;
    let offers = state.repo.list_offers().await?;

    Ok(dashboard::build(
        &services,
        &categories,
        &branches,
        &offers,
        Local::now(),
    ))
}
