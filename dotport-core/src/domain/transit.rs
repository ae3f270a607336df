use serde::{Deserialize, Serialize};

use crate::record::TableRecord;

/// One transit agency's annual reporting profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransitAgency {
    pub id: i64,
    pub ntd_id: String,
    pub agency_name: String,
    pub city: String,
    pub state_id: i64,
    pub report_year: i64,
    pub organization_type: Option<String>,
    pub unlinked_passenger_trips: Option<f64>,
    pub vehicle_revenue_miles: Option<f64>,
    pub vehicles_operated_max_service: Option<f64>,
    pub total_operating_expenses: Option<f64>,
    pub fare_revenues_earned: Option<f64>,
}

impl TransitAgency {
    /// Ridership in millions, the way the table shows it: `12.5M`.
    pub fn ridership_label(&self) -> String {
        match self.unlinked_passenger_trips {
            Some(trips) => format!("{:.1}M", trips / 1_000_000.0),
            None => "-".to_string(),
        }
    }
}

impl TableRecord for TransitAgency {
    fn id(&self) -> i64 {
        self.id
    }
}
