//! Data models for the salon admin backend.
//!
//! Field names serialize as camelCase to match the dashboard client.

mod attendance;
mod booking;
mod catalog;
mod promotion;
mod staff;

pub use attendance::*;
pub use booking::*;
pub use catalog::*;
pub use promotion::*;
pub use staff::*;
