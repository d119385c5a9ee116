use askama::Template;

use crate::{
    dashboard::{Dashboard, LoadState, Snapshot},
    error::AppError,
    format::{format_amount, format_date_time, format_hours, trip_count_label},
    models::{Trip, UserStats},
};

#[derive(Debug, Clone)]
struct StatCard {
    title: &'static str,
    value: String,
    caption: &'static str,
}

#[derive(Debug, Clone)]
struct TripRow {
    ticket: String,
    transport: &'static str,
    route: String,
    departure: String,
    price: String,
    status: &'static str,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            ticket: trip.ticket_number.clone(),
            transport: trip.transport_type.label(),
            route: trip.route(),
            departure: format_date_time(&trip.departure_date),
            price: format_amount(trip.price),
            status: trip.status.label(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.txt")]
struct DashboardTemplate {
    user_id: String,
    loaded: bool,
    failed: bool,
    message: String,
    cards: Vec<StatCard>,
    query: String,
    count_label: String,
    trips: Vec<TripRow>,
}

fn stat_cards(stats: &UserStats) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Страны",
            value: stats.countries_visited.to_string(),
            caption: "посещено в этом году",
        },
        StatCard {
            title: "Расходы",
            value: format_amount(stats.monthly_expenses),
            caption: "в этом месяце",
        },
        StatCard {
            title: "Предстоящие",
            value: stats.upcoming_rides.to_string(),
            caption: "запланированные поездки",
        },
        StatCard {
            title: "Длительность",
            value: format_hours(stats.yearly_travel_hours),
            caption: "в пути за год",
        },
    ]
}

/// Renders the dashboard screen as plain text.
pub fn render_dashboard(dashboard: &mut Dashboard) -> Result<String, AppError> {
    let (user_id, failed, message) = match dashboard.state() {
        LoadState::Idle => (String::new(), false, String::new()),
        LoadState::Loading { user_id } | LoadState::Loaded(Snapshot { user_id, .. }) => {
            (user_id.clone(), false, String::new())
        }
        LoadState::Failed { user_id, error } => {
            (user_id.clone(), true, error.user_message().to_string())
        }
    };
    let cards = dashboard.stats().map(stat_cards).unwrap_or_default();
    let loaded = dashboard.snapshot().is_some();
    let query = dashboard.query().trim().to_string();

    let trips: Vec<TripRow> = dashboard
        .visible_trips()
        .into_iter()
        .map(TripRow::from)
        .collect();

    let template = DashboardTemplate {
        user_id,
        loaded,
        failed,
        message,
        cards,
        query,
        count_label: trip_count_label(trips.len()),
        trips,
    };
    Ok(template.render()?)
}
