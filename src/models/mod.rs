pub mod stats;
pub mod trip;

pub use stats::UserStats;
pub use trip::{TransportType, Trip, TripStatus};
