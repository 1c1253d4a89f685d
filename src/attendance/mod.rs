//! Daily attendance: day view, lazily created records and the four staff actions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Attendance, AttendanceAction, AttendanceStatus, AttendanceUpdate};

/// Attendance for one day, keyed by staff id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAttendance {
    pub day: String,
    pub records: BTreeMap<String, Attendance>,
    pub present: usize,
    pub absent: usize,
}

/// Index a day's records by staff and count statuses.
pub fn summarize(day: &str, records: Vec<Attendance>) -> DayAttendance {
    let records: BTreeMap<String, Attendance> = records
        .into_iter()
        .map(|a| (a.staff_id.clone(), a))
        .collect();
    let count = |status| records.values().filter(|a| a.status == status).count();

    DayAttendance {
        day: day.to_string(),
        present: count(AttendanceStatus::Present),
        absent: count(AttendanceStatus::Absent),
        records,
    }
}

/// Return the (staff, day) record, creating a blank `present` one if missing.
pub async fn ensure_record(
    repo: &Repository,
    staff_id: &str,
    day: &str,
) -> Result<Attendance, AppError> {
    if let Some(existing) = repo.find_attendance(staff_id, day).await? {
        return Ok(existing);
    }

    if repo.get_staff(staff_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Staff {} not found", staff_id)));
    }

    tracing::debug!(staff_id, day, "creating attendance record");
    repo.create_attendance(staff_id, day).await
}

/// Apply one attendance action for `staff_id` on `day`.
///
/// `clock` is the `HH:MM` stamped by check-in and check-out.
pub async fn apply_action(
    repo: &Repository,
    staff_id: &str,
    day: &str,
    action: AttendanceAction,
    clock: &str,
) -> Result<Attendance, AppError> {
    let record = ensure_record(repo, staff_id, day).await?;

    let update = match action {
        AttendanceAction::MarkPresent => AttendanceUpdate::Status(AttendanceStatus::Present),
        AttendanceAction::MarkAbsent => AttendanceUpdate::Status(AttendanceStatus::Absent),
        AttendanceAction::CheckIn => AttendanceUpdate::CheckIn(clock.to_string()),
        AttendanceAction::CheckOut => AttendanceUpdate::CheckOut(clock.to_string()),
    };

    repo.update_attendance(&record.id, &update).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(staff_id: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: format!("att-{}", staff_id),
            staff_id: staff_id.to_string(),
            day: "2026-10-17".to_string(),
            status,
            check_in: None,
            check_out: None,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_summarize_counts_statuses() {
        let view = summarize(
            "2026-10-17",
            vec![
                record("a", AttendanceStatus::Present),
                record("b", AttendanceStatus::Absent),
                record("c", AttendanceStatus::Present),
            ],
        );
        assert_eq!(view.present, 2);
        assert_eq!(view.absent, 1);
        assert_eq!(view.records["b"].status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_summarize_empty_day() {
        let view = summarize("2026-10-17", Vec::new());
        assert_eq!((view.present, view.absent), (0, 0));
        assert!(view.records.is_empty());
    }

    #[test]
    fn test_action_path_segments() {
        assert_eq!(
            AttendanceAction::from_path("check-in"),
            Some(AttendanceAction::CheckIn)
        );
        assert_eq!(
            AttendanceAction::from_path("absent"),
            Some(AttendanceAction::MarkAbsent)
        );
        assert_eq!(AttendanceAction::from_path("late"), None);
    }
}
