use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    error::LoadError,
    filter::TripFilter,
    format::DateLocale,
    models::{Trip, UserStats},
    services::store::TripStore,
};

pub type FetchResult = Result<(UserStats, Vec<Trip>), LoadError>;

/// Sequence number of a load request. Only the latest one may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Immutable data held by a loaded dashboard.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub user_id: String,
    pub stats: UserStats,
    pub trips: Arc<[Trip]>,
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading { user_id: String },
    Loaded(Snapshot),
    Failed { user_id: String, error: LoadError },
}

#[derive(Debug)]
struct VisibleCache {
    query: String,
    trips: Arc<[Trip]>,
    positions: Vec<usize>,
}

#[derive(Debug)]
pub struct Dashboard {
    state: LoadState,
    query: String,
    filter: TripFilter,
    next_ticket: u64,
    current: Option<LoadTicket>,
    in_flight: Option<(LoadTicket, JoinHandle<FetchResult>)>,
    cache: Option<VisibleCache>,
    filter_runs: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DateLocale::default())
    }
}

impl Dashboard {
    pub fn new(locale: DateLocale) -> Self {
        Self {
            state: LoadState::Idle,
            query: String::new(),
            filter: TripFilter::new(locale),
            next_ticket: 0,
            current: None,
            in_flight: None,
            cache: None,
            filter_runs: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn locale(&self) -> DateLocale {
        self.filter.locale()
    }

    /// Enters `Loading` for `user_id`. Any earlier request becomes stale and
    /// a spawned fetch for it is aborted.
    pub fn begin_load(&mut self, user_id: &str) -> LoadTicket {
        if let Some((stale, handle)) = self.in_flight.take() {
            debug!(ticket = stale.0, "aborting stale dashboard load");
            handle.abort();
        }
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.current = Some(ticket);
        self.state = LoadState::Loading {
            user_id: user_id.to_string(),
        };
        ticket
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: FetchResult) -> bool {
        if self.current != Some(ticket) {
            debug!(ticket = ticket.0, "discarding stale dashboard result");
            return false;
        }
        let user_id = match &self.state {
            LoadState::Loading { user_id } => user_id.clone(),
            _ => String::new(),
        };
        self.current = None;
        self.cache = None;
        self.state = match result {
            Ok((stats, trips)) => {
                info!(user = %user_id, trips = trips.len(), "dashboard loaded");
                LoadState::Loaded(Snapshot {
                    user_id,
                    stats,
                    trips: trips.into(),
                })
            }
            Err(error) => {
                warn!(user = %user_id, %error, "dashboard load failed");
                LoadState::Failed { user_id, error }
            }
        };
        true
    }

    /// Fetches stats and trips concurrently on the current task.
    pub async fn load<S>(&mut self, store: &S, user_id: &str) -> &LoadState
    where
        S: TripStore + ?Sized,
    {
        let ticket = self.begin_load(user_id);
        let result = fetch_all(store, user_id).await;
        self.finish_load(ticket, result);
        &self.state
    }

    /// Spawns the fetch for `user_id`; see [`Dashboard::settle`].
    pub fn request(&mut self, store: Arc<dyn TripStore>, user_id: &str) -> LoadTicket {
        let ticket = self.begin_load(user_id);
        let user_id = user_id.to_string();
        let handle = tokio::spawn(async move { fetch_all(store.as_ref(), &user_id).await });
        self.in_flight = Some((ticket, handle));
        ticket
    }

    /// Waits for the latest spawned fetch and applies it.
    pub async fn settle(&mut self) -> &LoadState {
        if let Some((ticket, handle)) = self.in_flight.take() {
            match handle.await {
                Ok(result) => {
                    self.finish_load(ticket, result);
                }
                Err(err) if err.is_cancelled() => {
                    debug!(ticket = ticket.0, "dashboard load was cancelled");
                }
                Err(err) => {
                    error!("dashboard load task failed: {err}");
                    self.current = None;
                    self.state = LoadState::Idle;
                }
            }
        }
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.state {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<&UserStats> {
        self.snapshot().map(|snapshot| &snapshot.stats)
    }

    pub fn trips(&self) -> &[Trip] {
        self.snapshot()
            .map(|snapshot| &snapshot.trips[..])
            .unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&LoadError> {
        match &self.state {
            LoadState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error().map(LoadError::user_message)
    }

    /// Trips matching the current query, re-filtered only when the query
    /// text or the trip snapshot changed.
    pub fn visible_trips(&mut self) -> Vec<&Trip> {
        let LoadState::Loaded(snapshot) = &self.state else {
            return Vec::new();
        };
        let cache = match self.cache.take() {
            Some(cache)
                if cache.query == self.query && Arc::ptr_eq(&cache.trips, &snapshot.trips) =>
            {
                cache
            }
            _ => {
                self.filter_runs += 1;
                VisibleCache {
                    query: self.query.clone(),
                    trips: Arc::clone(&snapshot.trips),
                    positions: self.filter.positions(&snapshot.trips, &self.query),
                }
            }
        };
        let visible = cache
            .positions
            .iter()
            .map(|&idx| &snapshot.trips[idx])
            .collect();
        self.cache = Some(cache);
        visible
    }

    pub fn visible_count(&mut self) -> usize {
        self.visible_trips().len()
    }
}

async fn fetch_all<S>(store: &S, user_id: &str) -> FetchResult
where
    S: TripStore + ?Sized,
{
    let (stats, trips) = tokio::join!(store.fetch_stats(user_id), store.fetch_trips(user_id));
    Ok((stats?, trips?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Resource,
        models::{stats::demo_stats, trip::demo_trips},
        services::store::{StaticTripStore, DEMO_USER_ID},
    };

    fn ids(trips: &[&Trip]) -> Vec<String> {
        trips.iter().map(|trip| trip.id.clone()).collect()
    }

    #[tokio::test]
    async fn idle_then_loaded() {
        let mut dashboard = Dashboard::default();
        assert!(matches!(dashboard.state(), LoadState::Idle));
        assert!(dashboard.visible_trips().is_empty());

        let store = StaticTripStore::demo();
        dashboard.load(&store, DEMO_USER_ID).await;
        assert!(matches!(dashboard.state(), LoadState::Loaded(_)));
        assert_eq!(dashboard.stats(), Some(&demo_stats()));
        assert_eq!(dashboard.visible_count(), 3);
    }

    #[tokio::test]
    async fn failure_keeps_the_coarse_message() {
        let mut dashboard = Dashboard::default();
        dashboard.load(&StaticTripStore::demo(), "stranger").await;
        assert_eq!(dashboard.error_message(), Some("Failed to load user stats"));
        assert_eq!(dashboard.error().map(LoadError::resource), Some(Resource::Stats));
        assert!(dashboard.visible_trips().is_empty());
        assert!(dashboard.stats().is_none());
    }

    #[tokio::test]
    async fn query_changes_refilter_but_repeats_hit_the_cache() {
        let mut dashboard = Dashboard::default();
        dashboard.load(&StaticTripStore::demo(), DEMO_USER_ID).await;

        dashboard.set_query("лондон");
        assert_eq!(ids(&dashboard.visible_trips()), vec!["1"]);
        assert_eq!(ids(&dashboard.visible_trips()), vec!["1"]);
        assert_eq!(dashboard.filter_runs, 1);

        dashboard.set_query("   ");
        assert_eq!(ids(&dashboard.visible_trips()), vec!["1", "2", "3"]);
        assert_eq!(dashboard.filter_runs, 2);

        dashboard.load(&StaticTripStore::demo(), DEMO_USER_ID).await;
        dashboard.visible_trips();
        assert_eq!(dashboard.filter_runs, 3);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut dashboard = Dashboard::default();
        let first = dashboard.begin_load("alice");
        let second = dashboard.begin_load("bob");

        let applied = dashboard.finish_load(first, Ok((demo_stats(), demo_trips())));
        assert!(!applied);
        assert!(dashboard.is_loading());

        assert!(dashboard.finish_load(second, Ok((demo_stats(), Vec::new()))));
        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.user_id, "bob");
        assert!(snapshot.trips.is_empty());

        assert!(!dashboard.finish_load(second, Ok((demo_stats(), demo_trips()))));
    }

    #[tokio::test]
    async fn a_new_request_supersedes_the_in_flight_one() {
        let store: Arc<dyn TripStore> = Arc::new(
            StaticTripStore::demo().with_user("other", demo_stats(), demo_trips()[..1].to_vec()),
        );
        let mut dashboard = Dashboard::default();
        dashboard.request(Arc::clone(&store), DEMO_USER_ID);
        dashboard.request(store, "other");
        dashboard.settle().await;

        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.user_id, "other");
        assert_eq!(snapshot.trips.len(), 1);
    }
}
