//! Offer and referral models.

use serde::{Deserialize, Serialize};

use super::catalog::{default_active, RefSnapshot};

/// Which promotion collection a form targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionKind {
    Offer,
    Referral,
}

impl PromotionKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromotionKind::Offer => "Offer",
            PromotionKind::Referral => "Referral",
        }
    }
}

/// A discount offer shown in the offers grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub name: String,
    pub description: String,
    pub discount: f64,
    pub usage_limit: i64,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub branches: Vec<RefSnapshot>,
    pub services: Vec<RefSnapshot>,
    pub created_at: String,
    pub updated_at: String,
}

/// A referral scheme: an offer without an image, with an optional code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: String,
    pub name: String,
    pub description: String,
    pub discount: f64,
    pub usage_limit: i64,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    pub branches: Vec<RefSnapshot>,
    pub services: Vec<RefSnapshot>,
    pub created_at: String,
    pub updated_at: String,
}

/// A branch or service reference as submitted by the form.
///
/// Clients tend to send whole catalog records; fields beyond `id` and `name`
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RefInput {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Shared offer/referral form. An empty or missing `id` means "create".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub discount: Option<f64>,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub branches: Vec<RefInput>,
    #[serde(default)]
    pub services: Vec<RefInput>,
}

/// Validated form contents ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDraft {
    pub name: String,
    pub description: String,
    pub discount: f64,
    pub usage_limit: i64,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub image: Option<String>,
    pub referral_code: Option<String>,
    pub branches: Vec<RefSnapshot>,
    pub services: Vec<RefSnapshot>,
}
