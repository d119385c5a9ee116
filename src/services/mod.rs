pub mod api;
pub mod store;

pub use api::HttpTripStore;
pub use store::{StaticTripStore, TripStore};
