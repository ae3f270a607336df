use serde::{Deserialize, Serialize};

use crate::record::TableRecord;

/// One fatal crash case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleFatality {
    pub id: i64,
    pub case_number: String,
    /// Crash date as the wire carries it (date or timestamp text)
    pub crash_date: String,
    pub state_id: i64,
    pub number_of_fatalities: i64,
    pub number_of_vehicles: i64,
    pub manner_of_collision: Option<String>,
    pub land_use: Option<String>,
    pub roadway_function_class: Option<String>,
    pub weather_condition: Option<String>,
    pub involves_speed_related: bool,
    pub number_of_drunk_drivers: Option<i64>,
}

impl TableRecord for VehicleFatality {
    fn id(&self) -> i64 {
        self.id
    }
}
