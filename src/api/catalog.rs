//! Catalog API endpoints: branches, categories and services.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Branch, Category, CreateServiceRequest, NamedRequest, Service, UpdateServiceRequest,
};
use crate::AppState;

fn require_name(name: &str, what: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} name is required", what)));
    }
    Ok(name.to_string())
}

/// GET /api/branches - List all branches.
pub async fn list_branches(State(state): State<AppState>) -> ApiResult<Vec<Branch>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_branches().await {
        Ok(branches) => success(branches, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/branches - Create a branch.
pub async fn create_branch(
    State(state): State<AppState>,
    Json(request): Json<NamedRequest>,
) -> ApiResult<Branch> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = match require_name(&request.name, "Branch") {
        Ok(name) => name,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.create_branch(&name).await {
        Ok(branch) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(branch, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/branches/:id - Rename a branch.
pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NamedRequest>,
) -> ApiResult<Branch> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = match require_name(&request.name, "Branch") {
        Ok(name) => name,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.rename_branch(&id, &name).await {
        Ok(branch) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(branch, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/branches/:id - Delete a branch.
pub async fn delete_branch(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_branch(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/categories - List all categories with service counts.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_categories().await {
        Ok(categories) => success(categories, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/categories - Create a category.
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<NamedRequest>,
) -> ApiResult<Category> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = match require_name(&request.name, "Category") {
        Ok(name) => name,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.create_category(&name).await {
        Ok(category) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(category, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/categories/:id - Rename a category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NamedRequest>,
) -> ApiResult<Category> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = match require_name(&request.name, "Category") {
        Ok(name) => name,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.rename_category(&id, &name).await {
        Ok(category) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(category, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/categories/:id - Delete a category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_category(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/services - List all services.
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_services().await {
        Ok(services) => success(services, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/services - Create a service.
pub async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> ApiResult<Service> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = require_name(&request.name, "Service") {
        return error(e, revision_id);
    }
    if request.price < 0.0 {
        return error(
            AppError::Validation("Price cannot be negative".to_string()),
            revision_id,
        );
    }

    match state.repo.create_service(&request).await {
        Ok(service) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(service, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/services/:id - Update a service.
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateServiceRequest>,
) -> ApiResult<Service> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(name) = &request.name {
        if let Err(e) = require_name(name, "Service") {
            return error(e, revision_id);
        }
    }

    match state.repo.update_service(&id, &request).await {
        Ok(service) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(service, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/services/:id - Delete a service.
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_service(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
