use crate::{
    format::{format_departure, DateLocale},
    models::Trip,
};

/// Free-text search over a trip list.
///
/// A trip is visible when the trimmed, lower-cased query is a substring of
/// its origin, destination, ticket number or short departure date. A blank
/// query keeps every trip. Order is always preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripFilter {
    locale: DateLocale,
}

impl TripFilter {
    pub fn new(locale: DateLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> DateLocale {
        self.locale
    }

    pub fn apply<'a>(&self, trips: &'a [Trip], query: &str) -> Vec<&'a Trip> {
        match normalize_query(query) {
            None => trips.iter().collect(),
            Some(needle) => trips
                .iter()
                .filter(|trip| self.matches_normalized(trip, &needle))
                .collect(),
        }
    }

    /// Positions of the visible trips within `trips`.
    pub fn positions(&self, trips: &[Trip], query: &str) -> Vec<usize> {
        match normalize_query(query) {
            None => (0..trips.len()).collect(),
            Some(needle) => trips
                .iter()
                .enumerate()
                .filter(|(_, trip)| self.matches_normalized(trip, &needle))
                .map(|(idx, _)| idx)
                .collect(),
        }
    }

    pub fn matches(&self, trip: &Trip, query: &str) -> bool {
        match normalize_query(query) {
            None => true,
            Some(needle) => self.matches_normalized(trip, &needle),
        }
    }

    pub fn searchable_fields(&self, trip: &Trip) -> [String; 4] {
        [
            trip.origin.to_lowercase(),
            trip.destination.to_lowercase(),
            trip.ticket_number.to_lowercase(),
            format_departure(&trip.departure_date, self.locale).to_lowercase(),
        ]
    }

    fn matches_normalized(&self, trip: &Trip, needle: &str) -> bool {
        self.searchable_fields(trip)
            .iter()
            .any(|field| field.contains(needle))
    }
}

/// Trimmed, lower-cased query, or `None` when nothing is left to match.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub fn filter_trips(trips: &[Trip], query: &str) -> Vec<Trip> {
    TripFilter::default()
        .apply(trips, query)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::demo_trips;

    fn ids(trips: &[&Trip]) -> Vec<String> {
        trips.iter().map(|trip| trip.id.clone()).collect()
    }

    #[test]
    fn destination_match_is_case_insensitive() {
        let trips = demo_trips();
        let filter = TripFilter::default();
        assert_eq!(ids(&filter.apply(&trips, "лондон")), vec!["1"]);
        assert_eq!(ids(&filter.apply(&trips, "ЛОНДОН")), vec!["1"]);
    }

    #[test]
    fn ticket_number_match() {
        let trips = demo_trips();
        assert_eq!(ids(&TripFilter::default().apply(&trips, "tk123456")), vec!["1"]);
    }

    #[test]
    fn blank_query_is_identity() {
        let trips = demo_trips();
        let filter = TripFilter::default();
        assert_eq!(ids(&filter.apply(&trips, "")), vec!["1", "2", "3"]);
        assert_eq!(ids(&filter.apply(&trips, "   ")), vec!["1", "2", "3"]);
        assert_eq!(filter.positions(&trips, "\t"), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_yields_nothing() {
        let trips = demo_trips();
        assert!(TripFilter::default().apply(&trips, "zzz-no-match").is_empty());
    }

    #[test]
    fn departure_date_is_searchable_in_both_locales() {
        let trips = demo_trips();
        let ru = TripFilter::new(DateLocale::Ru);
        assert_eq!(ids(&ru.apply(&trips, "мар. 2")), vec!["1", "2"]);
        let en = TripFilter::new(DateLocale::En);
        assert_eq!(ids(&en.apply(&trips, "  Mar 15, 2024 ")), vec!["3"]);
        assert!(en.apply(&trips, "мар.").is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_but_inner_spaces_count() {
        let trips = demo_trips();
        let filter = TripFilter::new(DateLocale::En);
        assert_eq!(ids(&filter.apply(&trips, "  париж  ")), vec!["2"]);
        assert!(filter.apply(&trips, "пар иж").is_empty());
    }

    #[test]
    fn broken_departure_date_still_filters() {
        let mut trips = demo_trips();
        trips[1].departure_date = "TBD".into();
        let filter = TripFilter::default();
        assert_eq!(ids(&filter.apply(&trips, "tbd")), vec!["2"]);
        assert_eq!(ids(&filter.apply(&trips, "берлин")), vec!["2"]);
    }

    #[test]
    fn result_is_an_ordered_subsequence_and_idempotent() {
        let trips = demo_trips();
        let filter = TripFilter::default();
        for query in ["а", "2024", "T", "мар.", "ль", "x"] {
            let once = filter.apply(&trips, query);
            let positions = filter.positions(&trips, query);
            assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
            assert_eq!(once.len(), positions.len());

            let owned: Vec<Trip> = once.iter().map(|trip| (*trip).clone()).collect();
            let twice = filter.apply(&owned, query);
            assert_eq!(ids(&once), ids(&twice));
            assert_eq!(ids(&once), ids(&filter.apply(&trips, &query.to_uppercase())));

            let needle = normalize_query(query).unwrap();
            for trip in once {
                assert!(filter
                    .searchable_fields(trip)
                    .iter()
                    .any(|field| field.contains(&needle)));
            }
        }
    }

    #[test]
    fn owned_helper_clones_matches() {
        let trips = demo_trips();
        let visible = filter_trips(&trips, "брюссель");
        assert_eq!(visible, vec![trips[2].clone()]);
    }
}
