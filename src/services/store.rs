use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::{LoadError, Resource},
    models::{
        stats::demo_stats,
        trip::{demo_trips, validate_trips},
        Trip, UserStats,
    },
};

pub const DEMO_USER_ID: &str = "demo";

/// Source of the dashboard data for a user. The two calls are independent.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn fetch_stats(&self, user_id: &str) -> Result<UserStats, LoadError>;
    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<Trip>, LoadError>;
}

#[derive(Debug, Clone)]
struct UserData {
    stats: UserStats,
    trips: Vec<Trip>,
}

/// In-memory store with per-user snapshots handed in at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticTripStore {
    users: Arc<HashMap<String, UserData>>,
}

impl StaticTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn demo() -> Self {
        Self::new().with_user(DEMO_USER_ID, demo_stats(), demo_trips())
    }

    pub fn with_user(
        mut self,
        user_id: impl Into<String>,
        stats: UserStats,
        trips: Vec<Trip>,
    ) -> Self {
        Arc::make_mut(&mut self.users).insert(user_id.into(), UserData { stats, trips });
        self
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    fn lookup(&self, resource: Resource, user_id: &str) -> Result<&UserData, LoadError> {
        self.users.get(user_id).ok_or_else(|| LoadError::Network {
            resource,
            endpoint: format!("memory:/{}", resource.path()),
            user_id: user_id.to_string(),
            status: Some(404),
            reason: "unknown user".into(),
        })
    }
}

#[async_trait]
impl TripStore for StaticTripStore {
    async fn fetch_stats(&self, user_id: &str) -> Result<UserStats, LoadError> {
        let data = self.lookup(Resource::Stats, user_id)?;
        debug!(user = %user_id, "serving stats from memory");
        data.stats.validate().map_err(|reason| LoadError::Parse {
            resource: Resource::Stats,
            endpoint: format!("memory:/{}", Resource::Stats.path()),
            user_id: user_id.to_string(),
            reason,
        })?;
        Ok(data.stats.clone())
    }

    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<Trip>, LoadError> {
        let data = self.lookup(Resource::Trips, user_id)?;
        debug!(user = %user_id, count = data.trips.len(), "serving trips from memory");
        validate_trips(&data.trips).map_err(|reason| LoadError::Parse {
            resource: Resource::Trips,
            endpoint: format!("memory:/{}", Resource::Trips.path()),
            user_id: user_id.to_string(),
            reason,
        })?;
        Ok(data.trips.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_store_serves_the_demo_user() {
        let store = StaticTripStore::demo();
        let stats = store.fetch_stats(DEMO_USER_ID).await.unwrap();
        assert_eq!(stats.countries_visited, 12);
        let trips = store.fetch_trips(DEMO_USER_ID).await.unwrap();
        assert_eq!(trips.len(), 3);
    }

    #[tokio::test]
    async fn unknown_user_is_a_not_found_network_error() {
        let store = StaticTripStore::demo();
        let err = store.fetch_trips("nobody").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.resource(), Resource::Trips);
        assert_eq!(err.user_message(), "Failed to load user trips");
    }

    #[tokio::test]
    async fn invalid_snapshot_surfaces_as_parse_error() {
        let mut trips = demo_trips();
        trips[0].price = -10.0;
        let store = StaticTripStore::new().with_user("u", demo_stats(), trips);
        let err = store.fetch_trips("u").await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
