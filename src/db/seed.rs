//! Import of bookings from a JSON export produced by the booking system.

use std::path::Path;

use super::Repository;
use crate::errors::AppError;
use crate::models::{Booking, BookingImport};

/// Parse a bookings export (a JSON array) into booking records.
///
/// One undatable booking fails the whole export.
pub fn parse_bookings_export(raw: &str) -> Result<Vec<Booking>, AppError> {
    let entries: Vec<BookingImport> = serde_json::from_str(raw)?;
    entries.into_iter().map(Booking::try_from).collect()
}

/// Load the export at `path` and upsert every booking it contains.
pub async fn import_bookings_file(repo: &Repository, path: &Path) -> Result<usize, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let bookings = parse_bookings_export(&raw)?;
    let count = repo.import_bookings(&bookings).await?;
    tracing::info!("Imported {} bookings from {:?}", count, path);
    Ok(count)
}
