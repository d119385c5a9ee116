use std::{collections::HashSet, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::format::parse_timestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Plane,
    Train,
    Other,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Plane => "plane",
            TransportType::Train => "train",
            TransportType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportType::Plane => "самолёт",
            TransportType::Train => "поезд",
            TransportType::Other => "другое",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Upcoming => "upcoming",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Upcoming => "предстоит",
            TripStatus::Completed => "завершена",
            TripStatus::Cancelled => "отменена",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single booked journey as delivered by `GET /get_trips`.
///
/// Dates stay in their wire form; [`Trip::departure`] and [`Trip::arrival`]
/// parse them on demand so a malformed timestamp never poisons the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub ticket_number: String,
    pub transport_type: TransportType,
    pub departure_date: String,
    pub arrival_date: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub status: TripStatus,
}

impl Trip {
    pub fn departure(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.departure_date)
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.arrival_date)
    }

    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    /// Checks the per-record invariants. Unparseable dates are tolerated.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("trip id must not be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!(
                "trip {} has invalid price {}",
                self.id, self.price
            ));
        }
        match (self.departure(), self.arrival()) {
            (Some(departure), Some(arrival)) if departure > arrival => Err(format!(
                "trip {} departs after it arrives ({} > {})",
                self.id, self.departure_date, self.arrival_date
            )),
            (Some(_), Some(_)) => Ok(()),
            _ => {
                warn!(trip = %self.id, "trip carries an unparseable timestamp");
                Ok(())
            }
        }
    }
}

/// Validates every trip plus the collection-wide id uniqueness.
pub fn validate_trips(trips: &[Trip]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(trips.len());
    for trip in trips {
        trip.validate()?;
        if !seen.insert(trip.id.as_str()) {
            return Err(format!("duplicate trip id {}", trip.id));
        }
    }
    Ok(())
}

pub fn demo_trips() -> Vec<Trip> {
    vec![
        Trip {
            id: "1".into(),
            ticket_number: "TK123456".into(),
            transport_type: TransportType::Plane,
            departure_date: "2024-03-20T10:00:00".into(),
            arrival_date: "2024-03-20T12:00:00".into(),
            origin: "Москва".into(),
            destination: "Лондон".into(),
            price: 450.0,
            status: TripStatus::Upcoming,
        },
        Trip {
            id: "2".into(),
            ticket_number: "TR789012".into(),
            transport_type: TransportType::Train,
            departure_date: "2024-03-25T08:00:00".into(),
            arrival_date: "2024-03-25T14:00:00".into(),
            origin: "Париж".into(),
            destination: "Берлин".into(),
            price: 120.0,
            status: TripStatus::Upcoming,
        },
        Trip {
            id: "3".into(),
            ticket_number: "BA345678".into(),
            transport_type: TransportType::Other,
            departure_date: "2024-03-15T09:00:00".into(),
            arrival_date: "2024-03-15T17:00:00".into(),
            origin: "Амстердам".into(),
            destination: "Брюссель".into(),
            price: 40.0,
            status: TripStatus::Completed,
        },
    ]
}
