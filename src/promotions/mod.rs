//! Offers and referrals: form validation, reference normalization and submit.

use crate::db::Repository;
use crate::display::parse_day;
use crate::errors::AppError;
use crate::images::ImageSource;
use crate::models::{
    Offer, PromotionDraft, PromotionForm, PromotionKind, RefInput, RefSnapshot, Referral,
};

/// Reduce submitted references to `{id, name}` pairs.
pub fn normalize_refs(refs: &[RefInput]) -> Vec<RefSnapshot> {
    refs.iter()
        .map(|r| RefSnapshot {
            id: r.id.clone(),
            name: r.name.clone(),
        })
        .collect()
}

/// Whether a submit creates a new record or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget<'a> {
    Create,
    Update(&'a str),
}

impl PromotionForm {
    pub fn target(&self) -> SubmitTarget<'_> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => SubmitTarget::Update(id),
            _ => SubmitTarget::Create,
        }
    }

    /// Check required fields and build the record to write.
    ///
    /// Offers drop `referral_code`; referrals drop `image`.
    pub fn validate(&self, kind: PromotionKind) -> Result<PromotionDraft, AppError> {
        for (value, field) in [
            (&self.name, "Name"),
            (&self.description, "Description"),
            (&self.start_date, "Start date"),
            (&self.end_date, "End date"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
        }
        let discount = self
            .discount
            .ok_or_else(|| AppError::Validation("Discount is required".to_string()))?;
        let usage_limit = self
            .usage_limit
            .ok_or_else(|| AppError::Validation("Usage limit is required".to_string()))?;
        let start_date = parse_day(self.start_date.trim())?;
        let end_date = parse_day(self.end_date.trim())?;

        let image = match kind {
            PromotionKind::Offer => {
                let raw = self.image.as_deref().unwrap_or_default();
                ImageSource::parse(raw)?.map(|_| raw.trim().to_string())
            }
            PromotionKind::Referral => None,
        };

        let referral_code = match kind {
            PromotionKind::Referral => self
                .referral_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            PromotionKind::Offer => None,
        };

        Ok(PromotionDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            discount,
            usage_limit,
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: end_date.format("%Y-%m-%d").to_string(),
            is_active: self.is_active,
            image,
            referral_code,
            branches: normalize_refs(&self.branches),
            services: normalize_refs(&self.services),
        })
    }
}

/// Validate and write an offer form: one create or one update.
pub async fn submit_offer(repo: &Repository, form: &PromotionForm) -> Result<Offer, AppError> {
    let draft = form.validate(PromotionKind::Offer)?;
    match form.target() {
        SubmitTarget::Create => repo.create_offer(&draft).await,
        SubmitTarget::Update(id) => repo.update_offer(id, &draft).await,
    }
}

/// Validate and write a referral form: one create or one update.
pub async fn submit_referral(
    repo: &Repository,
    form: &PromotionForm,
) -> Result<Referral, AppError> {
    let draft = form.validate(PromotionKind::Referral)?;
    match form.target() {
        SubmitTarget::Create => repo.create_referral(&draft).await,
        SubmitTarget::Update(id) => repo.update_referral(id, &draft).await,
    }
}

/// Delete a promotion once the caller has confirmed. Returns whether anything was deleted.
pub async fn delete_promotion(
    repo: &Repository,
    kind: PromotionKind,
    id: &str,
    confirmed: bool,
) -> Result<bool, AppError> {
    if !confirmed {
        tracing::debug!(kind = kind.label(), id, "delete not confirmed, skipping");
        return Ok(false);
    }
    match kind {
        PromotionKind::Offer => repo.delete_offer(id).await?,
        PromotionKind::Referral => repo.delete_referral(id).await?,
    }
    tracing::info!(kind = kind.label(), id, "deleted promotion");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: serde_json::Value) -> PromotionForm {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "name": "Autumn glow",
            "description": "20% off facials",
            "discount": 20,
            "usageLimit": 50,
            "startDate": "2026-10-01",
            "endDate": "2026-11-30",
            "image": "",
            "referralCode": "GLOW20",
            "branches": [{"id": "b1", "name": "Marina", "createdAt": "2024-01-01", "address": "x"}],
            "services": [{"id": "s1", "name": "Facial", "price": 250}]
        })
    }

    #[test]
    fn test_refs_are_stripped_to_id_and_name() {
        let draft = form(complete()).validate(PromotionKind::Offer).unwrap();
        assert_eq!(
            draft.branches,
            vec![RefSnapshot {
                id: "b1".into(),
                name: "Marina".into()
            }]
        );
        assert_eq!(
            serde_json::to_value(&draft.services).unwrap(),
            json!([{"id": "s1", "name": "Facial"}])
        );
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut v = complete();
        v["endDate"] = json!("  ");
        let err = form(v).validate(PromotionKind::Offer).unwrap_err();
        assert_eq!(err.message(), "End date is required");
    }

    #[test]
    fn test_missing_discount_or_usage_limit_is_rejected() {
        let mut v = complete();
        v.as_object_mut().unwrap().remove("discount");
        let err = form(v).validate(PromotionKind::Offer).unwrap_err();
        assert_eq!(err.message(), "Discount is required");

        let mut v = complete();
        v.as_object_mut().unwrap().remove("usageLimit");
        let err = form(v).validate(PromotionKind::Referral).unwrap_err();
        assert_eq!(err.message(), "Usage limit is required");

        let mut v = complete();
        v["discount"] = json!(0);
        v["usageLimit"] = json!(0);
        assert!(form(v).validate(PromotionKind::Offer).is_ok());
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        let mut v = complete();
        v["endDate"] = json!("whenever");
        let err = form(v).validate(PromotionKind::Offer).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let mut v = complete();
        v["startDate"] = json!("2026-13-01");
        assert!(form(v).validate(PromotionKind::Offer).is_err());
    }

    #[test]
    fn test_empty_id_creates_and_present_id_updates() {
        let mut v = complete();
        assert_eq!(form(v.clone()).target(), SubmitTarget::Create);
        v["id"] = json!("");
        assert_eq!(form(v.clone()).target(), SubmitTarget::Create);
        v["id"] = json!("offer-1");
        assert_eq!(form(v).target(), SubmitTarget::Update("offer-1"));
    }

    #[test]
    fn test_kind_specific_fields() {
        let mut v = complete();
        v["image"] = json!("https://cdn.example.com/a.jpg");
        let offer = form(v.clone()).validate(PromotionKind::Offer).unwrap();
        assert_eq!(offer.image.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(offer.referral_code, None);

        let referral = form(v).validate(PromotionKind::Referral).unwrap();
        assert_eq!(referral.image, None);
        assert_eq!(referral.referral_code.as_deref(), Some("GLOW20"));
    }

    #[test]
    fn test_bad_inline_image_is_rejected() {
        let mut v = complete();
        v["image"] = json!("data:image/png;base64,***");
        assert!(form(v).validate(PromotionKind::Offer).is_err());
    }
}
