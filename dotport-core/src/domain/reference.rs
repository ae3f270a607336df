use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fields::SelectOption;
use crate::record::TableRecord;

// ===== States =====

/// One row of the State reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct State {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub region: Option<String>,
}

impl TableRecord for State {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Immutable id-to-state lookup shared by column renderers and select
/// fields. Preserves the order the service returned (sorted by name).
#[derive(Debug, Clone, Default)]
pub struct StateDirectory {
    states: Vec<State>,
    by_id: HashMap<i64, usize>,
}

impl StateDirectory {
    pub fn new(states: Vec<State>) -> Self {
        let by_id = states
            .iter()
            .enumerate()
            .map(|(index, state)| (state.id, index))
            .collect();
        Self { states, by_id }
    }

    pub fn get(&self, id: i64) -> Option<&State> {
        self.by_id.get(&id).map(|&index| &self.states[index])
    }

    /// Two-letter code for a state id, `"??"` when unknown.
    pub fn code(&self, id: i64) -> &str {
        self.get(id).map(|state| state.code.as_str()).unwrap_or("??")
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.get(id).map(|state| state.name.as_str())
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Select options in directory order: numeric id values, name labels.
    pub fn options(&self) -> Vec<SelectOption> {
        self.states
            .iter()
            .map(|state| SelectOption::new(state.id, state.name.clone()))
            .collect()
    }
}

// ===== Category Summaries =====

/// One row of the aggregate rollup behind the dashboard: record counts per
/// dataset category, computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategorySummary {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub record_count: i64,
}

impl TableRecord for CategorySummary {
    fn id(&self) -> i64 {
        self.category_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn directory() -> StateDirectory {
        StateDirectory::new(vec![
            State {
                id: 6,
                code: "CA".into(),
                name: "California".into(),
                region: Some("West".into()),
            },
            State {
                id: 48,
                code: "TX".into(),
                name: "Texas".into(),
                region: Some("South".into()),
            },
        ])
    }

    #[test]
    fn test_code_lookup_with_fallback() {
        let directory = directory();
        assert_eq!(directory.code(6), "CA");
        assert_eq!(directory.code(48), "TX");
        assert_eq!(directory.code(999), "??");
    }

    #[test]
    fn test_options_keep_order_and_use_ids() {
        let options = directory().options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "California");
        assert_eq!(options[0].value, FieldValue::Number(6.0));
        assert_eq!(options[1].label, "Texas");
    }

    #[test]
    fn test_summary_wire_shape() {
        let summary: CategorySummary = serde_json::from_value(serde_json::json!({
            "CategoryId": 1,
            "CategoryName": "Railroad Accidents",
            "Description": "FRA accident reports",
            "Icon": "train",
            "Color": "#b45309",
            "RecordCount": 4821
        }))
        .unwrap();

        assert_eq!(summary.category_name, "Railroad Accidents");
        assert_eq!(summary.record_count, 4821);
    }
}
