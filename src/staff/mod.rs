//! Staff directory: search filter and create/edit form handling.

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Staff, StaffDraft, StaffForm};

/// Keep staff whose name, role, branch or phone contains `query`, ignoring case.
/// A blank query keeps everyone.
pub fn filter_staff(staff: Vec<Staff>, query: &str) -> Vec<Staff> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return staff;
    }

    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(&q))
    };

    staff
        .into_iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&q)
                || contains(&s.role)
                || contains(&s.branch)
                || contains(&s.phone)
        })
        .collect()
}

impl StaffForm {
    /// Trim the form; blank optional fields become `None`.
    pub fn validate(&self) -> Result<StaffDraft, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let trimmed = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(StaffDraft {
            name: name.to_string(),
            role: trimmed(&self.role),
            phone: trimmed(&self.phone),
            branch: self.branch.clone().filter(|b| !b.is_empty()),
            active: self.active,
        })
    }

    fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Create or update a staff member from the form.
pub async fn save_staff(repo: &Repository, form: &StaffForm) -> Result<Staff, AppError> {
    let draft = form.validate()?;
    match form.existing_id() {
        Some(id) => repo.update_staff(id, &draft).await,
        None => repo.create_staff(&draft).await,
    }
}

/// Delete a staff member once confirmed. Returns whether anything was deleted.
pub async fn delete_staff(repo: &Repository, id: &str, confirmed: bool) -> Result<bool, AppError> {
    if !confirmed {
        return Ok(false);
    }
    repo.delete_staff(id).await?;
    tracing::info!(staff_id = id, "deleted staff member");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(name: &str, role: Option<&str>, branch: Option<&str>, phone: Option<&str>) -> Staff {
        Staff {
            id: name.to_lowercase(),
            name: name.to_string(),
            role: role.map(String::from),
            phone: phone.map(String::from),
            branch: branch.map(String::from),
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn roster() -> Vec<Staff> {
        vec![
            staff("Aisha", Some("Stylist"), Some("Marina"), Some("050 111")),
            staff("Bilal", Some("Barber"), Some("TECOM"), None),
            staff("Carla", None, None, Some("055 222")),
        ]
    }

    #[test]
    fn test_blank_query_keeps_everyone() {
        assert_eq!(filter_staff(roster(), "   ").len(), 3);
    }

    #[test]
    fn test_query_matches_any_field_ignoring_case() {
        let names = |q: &str| -> Vec<String> {
            filter_staff(roster(), q).into_iter().map(|s| s.name).collect()
        };
        assert_eq!(names("aISHA"), vec!["Aisha"]);
        assert_eq!(names("barber"), vec!["Bilal"]);
        assert_eq!(names("marina"), vec!["Aisha"]);
        assert_eq!(names("222"), vec!["Carla"]);
        assert!(names("nobody").is_empty());
    }

    #[test]
    fn test_form_trims_and_nulls_blank_fields() {
        let form: StaffForm = serde_json::from_value(serde_json::json!({
            "name": "  Dana ",
            "role": "   ",
            "phone": " 050 333 ",
            "branch": ""
        }))
        .unwrap();
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Dana");
        assert_eq!(draft.role, None);
        assert_eq!(draft.phone.as_deref(), Some("050 333"));
        assert_eq!(draft.branch, None);
        assert!(draft.active);
    }

    #[test]
    fn test_form_requires_name() {
        let form: StaffForm = serde_json::from_value(serde_json::json!({"name": " "})).unwrap();
        assert_eq!(form.validate().unwrap_err().message(), "Name is required");
    }
}
