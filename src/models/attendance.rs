//! Attendance models.

use serde::{Deserialize, Serialize};

/// Attendance status for a staff member on a given day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Unknown stored values read back as present.
    pub fn parse(s: &str) -> Self {
        match s {
            "absent" => AttendanceStatus::Absent,
            _ => AttendanceStatus::Present,
        }
    }
}

/// One attendance record, unique per (staff, day).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub staff_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub day: String,
    pub status: AttendanceStatus,
    /// Clock time, `HH:MM`
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A single attendance action taken from the staff screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    MarkPresent,
    MarkAbsent,
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "present" => Some(AttendanceAction::MarkPresent),
            "absent" => Some(AttendanceAction::MarkAbsent),
            "check-in" => Some(AttendanceAction::CheckIn),
            "check-out" => Some(AttendanceAction::CheckOut),
            _ => None,
        }
    }
}

/// A single-field change applied to an attendance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceUpdate {
    Status(AttendanceStatus),
    CheckIn(String),
    CheckOut(String),
}
