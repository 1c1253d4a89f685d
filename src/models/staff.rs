//! Staff models.

use serde::{Deserialize, Serialize};

use super::catalog::default_active;

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Staff create/edit form. A present `id` means "edit".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Trimmed staff fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffDraft {
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub active: bool,
}
