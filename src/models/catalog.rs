//! Catalog models: branches, categories and services.

use serde::{Deserialize, Serialize};

/// An `{id, name}` copy of a branch or service taken when a promotion is saved.
///
/// Snapshots are intentionally stale: renaming the branch or service later does not
/// rewrite promotions that already carry the old name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefSnapshot {
    pub id: String,
    pub name: String,
}

/// A salon branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// A service category. `service_count` is derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub service_count: i64,
    pub created_at: String,
}

/// A bookable service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: String,
}

/// Request body for creating or renaming a branch or category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRequest {
    pub name: String,
}

/// Request body for creating a new service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request body for updating an existing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub(crate) fn default_active() -> bool {
    true
}
