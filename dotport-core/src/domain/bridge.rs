use serde::{Deserialize, Serialize};

use crate::record::TableRecord;

/// One structure from the national bridge inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bridge {
    pub id: i64,
    pub structure_number: String,
    pub state_id: i64,
    pub facility_carried: Option<String>,
    pub features_intersected: Option<String>,
    pub year_built: Option<i64>,
    pub main_structure_type: Option<String>,
    pub overall_condition: Option<String>,
    pub structurally_deficient: bool,
    pub average_daily_traffic: Option<f64>,
    pub average_daily_truck_traffic: Option<f64>,
}

impl Bridge {
    /// Condition shown in the table: deficiency overrides the rating.
    pub fn condition_label(&self) -> &str {
        if self.structurally_deficient {
            return "Deficient";
        }
        self.overall_condition.as_deref().unwrap_or("Unknown")
    }
}

impl TableRecord for Bridge {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge() -> Bridge {
        Bridge {
            id: 1,
            structure_number: "17C0023".into(),
            state_id: 6,
            facility_carried: Some("US-101".into()),
            features_intersected: None,
            year_built: Some(1957),
            main_structure_type: Some("Steel".into()),
            overall_condition: Some("Fair".into()),
            structurally_deficient: false,
            average_daily_traffic: Some(88000.0),
            average_daily_truck_traffic: Some(4200.0),
        }
    }

    #[test]
    fn test_condition_label() {
        let mut b = bridge();
        assert_eq!(b.condition_label(), "Fair");

        b.structurally_deficient = true;
        assert_eq!(b.condition_label(), "Deficient");

        b.structurally_deficient = false;
        b.overall_condition = None;
        assert_eq!(b.condition_label(), "Unknown");
    }
}
