//! Display mapping for statuses and formatting helpers. Pure; no I/O.

pub mod formatting;
pub mod status_badges;

pub use formatting::*;
pub use status_badges::*;
