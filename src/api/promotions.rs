//! Offer, referral and image API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;

use super::{error, success, ApiResult, ConfirmQuery, DeleteOutcome};
use crate::errors::AppError;
use crate::images::encode_data_url;
use crate::models::{Offer, PromotionForm, PromotionKind, Referral};
use crate::promotions::{delete_promotion, submit_offer, submit_referral};
use crate::AppState;

/// GET /api/offers - List all offers.
pub async fn list_offers(State(state): State<AppState>) -> ApiResult<Vec<Offer>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_offers().await {
        Ok(offers) => success(offers, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/offers - Submit the offer form (create or update).
pub async fn save_offer(
    State(state): State<AppState>,
    Json(form): Json<PromotionForm>,
) -> ApiResult<Offer> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match submit_offer(&state.repo, &form).await {
        Ok(offer) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(offer, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/offers/:id?confirm=true - Delete an offer.
pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<DeleteOutcome> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match delete_promotion(&state.repo, PromotionKind::Offer, &id, query.confirm).await {
        Ok(deleted) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(DeleteOutcome { deleted }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/referrals - List all referrals.
pub async fn list_referrals(State(state): State<AppState>) -> ApiResult<Vec<Referral>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_referrals().await {
        Ok(referrals) => success(referrals, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/referrals - Submit the referral form (create or update).
pub async fn save_referral(
    State(state): State<AppState>,
    Json(form): Json<PromotionForm>,
) -> ApiResult<Referral> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match submit_referral(&state.repo, &form).await {
        Ok(referral) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(referral, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/referrals/:id?confirm=true - Delete a referral.
pub async fn delete_referral(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<DeleteOutcome> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match delete_promotion(&state.repo, PromotionKind::Referral, &id, query.confirm).await {
        Ok(deleted) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(DeleteOutcome { deleted }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub data_url: String,
}

/// POST /api/images/encode - Turn a raw image upload into a data URL for an offer.
pub async fn encode_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<EncodedImage> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(mime) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
    else {
        return error(
            AppError::BadRequest("Content-Type header is required".to_string()),
            revision_id,
        );
    };

    match encode_data_url(&mime, &body) {
        Ok(data_url) => success(EncodedImage { data_url }, revision_id),
        Err(e) => error(e, revision_id),
    }
}
