//! Booking models. Bookings are read-only through the API.

use serde::{Deserialize, Serialize};

use crate::display::local_day;
use crate::errors::AppError;

/// A customer booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub services: Vec<String>,
    /// Calendar day, `YYYY-MM-DD`
    pub booking_date: String,
    /// Clock time, `HH:MM`
    pub booking_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Direct staff reference (current records)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Free-text staff name (legacy records)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
}

/// A booked service as it appears in the bookings export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedService {
    #[serde(default)]
    pub service_name: String,
}

/// One entry of the bookings export file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingImport {
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub services: Vec<BookedService>,
    pub booking_date: String,
    #[serde(default)]
    pub booking_time: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub staff: Option<String>,
}

impl TryFrom<BookingImport> for Booking {
    type Error = AppError;

    /// `booking_date` may be a day or a full timestamp; it is stored as the local day.
    fn try_from(raw: BookingImport) -> Result<Self, Self::Error> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let booking_date = local_day(&raw.booking_date).map_err(|_| {
            AppError::Validation(format!(
                "Booking {} has an invalid date '{}'",
                raw.id, raw.booking_date
            ))
        })?;

        Ok(Booking {
            id: raw.id,
            customer_name: raw.customer_name,
            services: raw.services.into_iter().map(|s| s.service_name).collect(),
            booking_date,
            booking_time: raw.booking_time,
            branch: non_empty(raw.branch),
            staff_id: non_empty(raw.staff_id),
            staff: non_empty(raw.staff),
        })
    }
}
