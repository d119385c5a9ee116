use serde::{Deserialize, Serialize};

/// Aggregate travel metrics for a user. Sourced independently of the trip
/// list; nothing here is derived from trips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub countries_visited: u32,
    pub monthly_expenses: f64,
    pub upcoming_rides: u32,
    pub yearly_travel_hours: f64,
}

impl UserStats {
    pub fn validate(&self) -> Result<(), String> {
        if !self.monthly_expenses.is_finite() || self.monthly_expenses < 0.0 {
            return Err(format!(
                "monthlyExpenses must be non-negative, got {}",
                self.monthly_expenses
            ));
        }
        if !self.yearly_travel_hours.is_finite() || self.yearly_travel_hours < 0.0 {
            return Err(format!(
                "yearlyTravelHours must be non-negative, got {}",
                self.yearly_travel_hours
            ));
        }
        Ok(())
    }
}

pub fn demo_stats() -> UserStats {
    UserStats {
        countries_visited: 12,
        monthly_expenses: 1250.0,
        upcoming_rides: 3,
        yearly_travel_hours: 156.0,
    }
}
