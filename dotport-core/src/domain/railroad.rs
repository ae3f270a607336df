use serde::{Deserialize, Serialize};

use crate::record::TableRecord;

/// One reported railroad accident, as the data service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RailroadAccident {
    pub id: i64,
    pub reporting_railroad_name: String,
    /// Accident date as the wire carries it (date or timestamp text)
    pub accident_date: String,
    pub state_id: i64,
    pub accident_type: String,
    pub train_speed: Option<f64>,
    pub total_killed: i64,
    pub total_injured: i64,
    pub total_damage: Option<f64>,
    pub hazmat_cars: Option<i64>,
}

impl TableRecord for RailroadAccident {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use serde_json::json;

    #[test]
    fn test_wire_names_are_pascal_case() {
        let record: RailroadAccident = serde_json::from_value(json!({
            "Id": 12,
            "ReportingRailroadName": "Union Pacific",
            "AccidentDate": "2023-08-14",
            "StateId": 31,
            "AccidentType": "Derailment",
            "TrainSpeed": 45.0,
            "TotalKilled": 0,
            "TotalInjured": 3,
            "TotalDamage": 250000.0,
            "HazmatCars": 2
        }))
        .unwrap();

        assert_eq!(record.id, 12);
        assert_eq!(record.reporting_railroad_name, "Union Pacific");
        assert_eq!(record.train_speed, Some(45.0));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["ReportingRailroadName"], json!("Union Pacific"));
        assert_eq!(back["StateId"], json!(31));
    }

    #[test]
    fn test_flattens_to_field_values() {
        let record = RailroadAccident {
            id: 5,
            reporting_railroad_name: "BNSF".into(),
            accident_date: "2024-02-01".into(),
            state_id: 6,
            accident_type: "Collision".into(),
            train_speed: None,
            total_killed: 1,
            total_injured: 4,
            total_damage: Some(90000.0),
            hazmat_cars: None,
        };

        let values = record.to_field_values().unwrap();
        assert_eq!(values["Id"], FieldValue::Number(5.0));
        assert_eq!(values["AccidentType"], FieldValue::Text("Collision".into()));
        assert_eq!(values["TrainSpeed"], FieldValue::Null);
        assert_eq!(values["TotalDamage"], FieldValue::Number(90000.0));
    }
}
