//! Staff/task reconciliation: the day's bookings joined against the staff list.
//!
//! Bookings reference staff either by id or, on legacy records, by free-text name.
//! Resolution is best-effort and never fails: duplicate staff names collide
//! silently (the last one wins) and unmatched names are shown verbatim.

use std::collections::HashMap;

use serde::Serialize;

use crate::display::to_display_ampm;
use crate::models::{Booking, Staff};

/// One row of the day's task table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub booking_id: String,
    pub booking_time: String,
    pub display_time: String,
    /// Resolved staff id, if any
    pub staff_id: Option<String>,
    /// Name to display; `None` renders as a dash
    pub staff_name: Option<String>,
    pub customer_name: String,
    pub services: Vec<String>,
    pub branch: Option<String>,
}

/// Build task rows for `bookings`, sorted by booking time ascending.
pub fn reconcile(bookings: &[Booking], staff: &[Staff]) -> Vec<TaskRow> {
    let id_by_name: HashMap<String, &str> = staff
        .iter()
        .map(|s| (s.name.to_lowercase(), s.id.as_str()))
        .collect();
    let by_id: HashMap<&str, &Staff> = staff.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut rows: Vec<TaskRow> = bookings
        .iter()
        .map(|b| {
            let legacy = b.staff.as_deref().filter(|n| !n.is_empty());
            let staff_id = b.staff_id.clone().or_else(|| {
                legacy
                    .and_then(|n| id_by_name.get(&n.to_lowercase()))
                    .map(|id| id.to_string())
            });

            let staff_name = staff_id
                .as_deref()
                .and_then(|id| by_id.get(id))
                .map(|s| s.name.clone())
                .or_else(|| legacy.map(str::to_string));

            TaskRow {
                booking_id: b.id.clone(),
                booking_time: b.booking_time.clone(),
                display_time: to_display_ampm(&b.booking_time),
                staff_id,
                staff_name,
                customer_name: b.customer_name.clone(),
                services: b.services.clone(),
                branch: b.branch.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.booking_time.cmp(&b.booking_time));
    rows
}
