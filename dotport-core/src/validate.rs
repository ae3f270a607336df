//! Declarative per-field validation producing an error map.

use std::collections::BTreeMap;

use crate::fields::{FieldDef, FieldType};
use crate::format::{format_long_date, parse_wire_date};
use crate::value::{number_text, FieldValue, FieldValues};

/// Field name to message for every field that failed. Empty means valid.
pub type ValidationErrors = BTreeMap<String, String>;

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Check every field and report at most one message per field: the first
/// failing rule wins and later rules for that field never run.
///
/// Required is checked first; an empty optional value passes outright; the
/// custom check runs last and only when every built-in rule passed. The
/// function is pure, so validating the same form twice gives the same map.
pub fn validate(fields: &[FieldDef], values: &FieldValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for field in fields {
        if let Some(message) = check_field(field, values) {
            errors.insert(field.name.clone(), message);
        }
    }

    errors
}

fn check_field(field: &FieldDef, values: &FieldValues) -> Option<String> {
    let value = values.get(&field.name).unwrap_or(&NULL_VALUE);

    if field.required && value.is_empty() {
        return Some(format!("{} is required", field.label));
    }
    if value.is_empty() {
        return None;
    }

    if let Some(message) = check_typed_rules(field, value) {
        return Some(message);
    }

    if let Some(custom) = field.rules.custom {
        if let Some(message) = custom(value, values) {
            return Some(message);
        }
    }

    None
}

fn check_typed_rules(field: &FieldDef, value: &FieldValue) -> Option<String> {
    let rules = &field.rules;

    match field.field_type {
        FieldType::Number => {
            let number = match value.coerce_number() {
                Some(number) => number,
                None => return Some(format!("{} must be a valid number", field.label)),
            };
            if let Some(min) = rules.min {
                if number < min {
                    return Some(format!("{} must be at least {}", field.label, number_text(min)));
                }
            }
            if let Some(max) = rules.max {
                if number > max {
                    return Some(format!("{} must be at most {}", field.label, number_text(max)));
                }
            }
        }
        FieldType::Text | FieldType::TextArea => {
            let text = value.to_string();
            let length = text.chars().count();
            if let Some(min_length) = rules.min_length {
                if length < min_length {
                    return Some(format!(
                        "{} must be at least {} characters",
                        field.label, min_length
                    ));
                }
            }
            if let Some(max_length) = rules.max_length {
                if length > max_length {
                    return Some(format!(
                        "{} must be at most {} characters",
                        field.label, max_length
                    ));
                }
            }
            // Legacy declarations reuse min/max as length bounds on text.
            if let Some(min) = rules.min {
                if (length as f64) < min {
                    return Some(format!(
                        "{} must be at least {} characters",
                        field.label,
                        number_text(min)
                    ));
                }
            }
            if let Some(max) = rules.max {
                if (length as f64) > max {
                    return Some(format!(
                        "{} must be at most {} characters",
                        field.label,
                        number_text(max)
                    ));
                }
            }
            if let Some(pattern) = &rules.pattern {
                if !pattern.is_match(&text) {
                    return Some(
                        rules
                            .pattern_message
                            .clone()
                            .unwrap_or_else(|| format!("{} has an invalid format", field.label)),
                    );
                }
            }
        }
        FieldType::Date => {
            let date = match value.as_text().and_then(parse_wire_date) {
                Some(date) => date,
                None => return Some(format!("{} must be a valid date", field.label)),
            };
            if let Some(min_date) = rules.min_date {
                if date < min_date {
                    return Some(format!(
                        "{} must be on or after {}",
                        field.label,
                        format_long_date(min_date)
                    ));
                }
            }
            if let Some(max_date) = rules.max_date {
                if date > max_date {
                    return Some(format!(
                        "{} must be on or before {}",
                        field.label,
                        format_long_date(max_date)
                    ));
                }
            }
        }
        // Selects and booleans carry no built-in rules beyond required.
        FieldType::Select | FieldType::Boolean => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::SelectOption;
    use chrono::NaiveDate;

    fn values(entries: &[(&str, FieldValue)]) -> FieldValues {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    // ===== Required =====

    #[test]
    fn test_required_missing_value() {
        let fields = vec![FieldDef::text("AgencyName", "Agency Name").required()];

        let errors = validate(&fields, &FieldValues::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["AgencyName"], "Agency Name is required");
    }

    #[test]
    fn test_required_empty_string_and_null() {
        let fields = vec![FieldDef::text("AgencyName", "Agency Name").required()];

        let errors = validate(&fields, &values(&[("AgencyName", FieldValue::Null)]));
        assert_eq!(errors["AgencyName"], "Agency Name is required");

        let errors = validate(
            &fields,
            &values(&[("AgencyName", FieldValue::Text(String::new()))]),
        );
        assert_eq!(errors["AgencyName"], "Agency Name is required");
    }

    #[test]
    fn test_required_short_circuits_other_rules() {
        // The length bound never runs for an empty required field.
        let fields = vec![FieldDef::text("CaseNumber", "Case Number")
            .required()
            .with_min_length(5)];

        let errors = validate(&fields, &FieldValues::new());
        assert_eq!(errors["CaseNumber"], "Case Number is required");
    }

    #[test]
    fn test_optional_empty_is_valid() {
        let fields = vec![
            FieldDef::number("TrainSpeed", "Train Speed").with_min(0.0),
            FieldDef::text("FacilityCarried", "Facility Carried").with_max_length(200),
        ];

        let errors = validate(&fields, &FieldValues::new());
        assert!(errors.is_empty());
    }

    // ===== Numbers =====

    #[test]
    fn test_number_coercion_from_text() {
        let fields = vec![FieldDef::number("YearBuilt", "Year Built").with_min(1800.0)];

        let errors = validate(&fields, &values(&[("YearBuilt", FieldValue::Text("1994".into()))]));
        assert!(errors.is_empty());

        let errors = validate(
            &fields,
            &values(&[("YearBuilt", FieldValue::Text("not a year".into()))]),
        );
        assert_eq!(errors["YearBuilt"], "Year Built must be a valid number");
    }

    #[test]
    fn test_number_bounds() {
        let fields = vec![FieldDef::number("TrainSpeed", "Train Speed (mph)")
            .with_min(0.0)
            .with_max(300.0)];

        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(-5.0))]));
        assert_eq!(errors["TrainSpeed"], "Train Speed (mph) must be at least 0");

        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(350.0))]));
        assert_eq!(errors["TrainSpeed"], "Train Speed (mph) must be at most 300");

        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(300.0))]));
        assert!(errors.is_empty(), "bounds are inclusive");
    }

    #[test]
    fn test_number_inside_range() {
        let fields = vec![FieldDef::number("Count", "Count").with_min(0.0).with_max(10.0)];

        let errors = validate(&fields, &values(&[("Count", FieldValue::Number(5.0))]));
        assert!(errors.is_empty());
    }

    // ===== Text =====

    #[test]
    fn test_text_length_bounds() {
        let fields = vec![FieldDef::text("NtdId", "NTD ID")
            .with_min_length(2)
            .with_max_length(20)];

        let errors = validate(&fields, &values(&[("NtdId", FieldValue::Text("A".into()))]));
        assert_eq!(errors["NtdId"], "NTD ID must be at least 2 characters");

        let long = "X".repeat(21);
        let errors = validate(&fields, &values(&[("NtdId", FieldValue::Text(long))]));
        assert_eq!(errors["NtdId"], "NTD ID must be at most 20 characters");
    }

    #[test]
    fn test_legacy_min_max_as_length_on_text() {
        // Old declarations used min/max for character length on text fields.
        let fields = vec![FieldDef::text("Code", "Code").with_min(2.0).with_max(4.0)];

        let errors = validate(&fields, &values(&[("Code", FieldValue::Text("A".into()))]));
        assert_eq!(errors["Code"], "Code must be at least 2 characters");

        let errors = validate(&fields, &values(&[("Code", FieldValue::Text("ABCDE".into()))]));
        assert_eq!(errors["Code"], "Code must be at most 4 characters");

        let errors = validate(&fields, &values(&[("Code", FieldValue::Text("ABC".into()))]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_pattern_with_and_without_message() {
        let pattern = regex::Regex::new(r"^[A-Z]{2}-\d+$").unwrap();
        let with_message = vec![FieldDef::text("CaseNumber", "Case Number")
            .with_pattern(pattern.clone())
            .with_pattern_message("Case Number must look like XX-123")];

        let errors = validate(
            &with_message,
            &values(&[("CaseNumber", FieldValue::Text("nope".into()))]),
        );
        assert_eq!(errors["CaseNumber"], "Case Number must look like XX-123");

        let without_message =
            vec![FieldDef::text("CaseNumber", "Case Number").with_pattern(pattern)];
        let errors = validate(
            &without_message,
            &values(&[("CaseNumber", FieldValue::Text("nope".into()))]),
        );
        assert_eq!(errors["CaseNumber"], "Case Number has an invalid format");
    }

    // ===== Dates =====

    #[test]
    fn test_date_parse_failure() {
        let fields = vec![FieldDef::date("CrashDate", "Crash Date")];

        let errors = validate(
            &fields,
            &values(&[("CrashDate", FieldValue::Text("yesterday".into()))]),
        );
        assert_eq!(errors["CrashDate"], "Crash Date must be a valid date");
    }

    #[test]
    fn test_date_bounds_use_long_form() {
        let min = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let max = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let fields = vec![FieldDef::date("AccidentDate", "Accident Date")
            .with_min_date(min)
            .with_max_date(max)];

        let errors = validate(
            &fields,
            &values(&[("AccidentDate", FieldValue::Text("2019-06-15".into()))]),
        );
        assert_eq!(
            errors["AccidentDate"],
            "Accident Date must be on or after January 1, 2020"
        );

        let errors = validate(
            &fields,
            &values(&[("AccidentDate", FieldValue::Text("2025-01-01".into()))]),
        );
        assert_eq!(
            errors["AccidentDate"],
            "Accident Date must be on or before December 31, 2024"
        );
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let max = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let fields = vec![FieldDef::date("AccidentDate", "Accident Date").with_max_date(max)];

        let errors = validate(
            &fields,
            &values(&[("AccidentDate", FieldValue::Text("2024-12-31".into()))]),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_date_accepts_timestamp_form() {
        let fields = vec![FieldDef::date("CrashDate", "Crash Date")];

        let errors = validate(
            &fields,
            &values(&[("CrashDate", FieldValue::Text("2023-05-10T00:00:00Z".into()))]),
        );
        assert!(errors.is_empty());
    }

    // ===== Custom Checks =====

    fn reject_high_speed(value: &FieldValue, _form: &FieldValues) -> Option<String> {
        match value.coerce_number() {
            Some(speed) if speed > 100.0 => Some("Speeds above 100 need an incident review".into()),
            _ => None,
        }
    }

    #[test]
    fn test_custom_runs_after_builtins() {
        let fields = vec![FieldDef::number("TrainSpeed", "Train Speed")
            .with_min(0.0)
            .with_max(300.0)
            .with_custom(reject_high_speed)];

        // Built-in failure wins; custom never runs.
        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(400.0))]));
        assert_eq!(errors["TrainSpeed"], "Train Speed must be at most 300");

        // Built-ins pass, custom rejects.
        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(150.0))]));
        assert_eq!(errors["TrainSpeed"], "Speeds above 100 need an incident review");

        let errors = validate(&fields, &values(&[("TrainSpeed", FieldValue::Number(60.0))]));
        assert!(errors.is_empty());
    }

    fn fatalities_need_vehicles(_value: &FieldValue, form: &FieldValues) -> Option<String> {
        let vehicles = form.get("NumberOfVehicles").and_then(FieldValue::coerce_number);
        match vehicles {
            Some(v) if v >= 1.0 => None,
            _ => Some("Fatalities require at least one vehicle".into()),
        }
    }

    #[test]
    fn test_custom_sees_whole_form() {
        let fields =
            vec![FieldDef::number("NumberOfFatalities", "Fatalities").with_custom(fatalities_need_vehicles)];

        let errors = validate(
            &fields,
            &values(&[("NumberOfFatalities", FieldValue::Number(2.0))]),
        );
        assert_eq!(
            errors["NumberOfFatalities"],
            "Fatalities require at least one vehicle"
        );

        let errors = validate(
            &fields,
            &values(&[
                ("NumberOfFatalities", FieldValue::Number(2.0)),
                ("NumberOfVehicles", FieldValue::Number(1.0)),
            ]),
        );
        assert!(errors.is_empty());
    }

    // ===== Purity =====

    #[test]
    fn test_validation_is_idempotent() {
        let fields = vec![
            FieldDef::text("StructureNumber", "Structure Number").required(),
            FieldDef::number("YearBuilt", "Year Built").with_min(1800.0),
        ];
        let form = values(&[("YearBuilt", FieldValue::Number(1700.0))]);

        let first = validate(&fields, &form);
        let second = validate(&fields, &form);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_select_only_checks_required() {
        let fields = vec![FieldDef::select(
            "OverallCondition",
            "Condition",
            vec![SelectOption::new("Good", "Good"), SelectOption::new("Poor", "Poor")],
        )];

        // Any non-empty value passes: option membership is a UI concern.
        let errors = validate(
            &fields,
            &values(&[("OverallCondition", FieldValue::Text("Fair".into()))]),
        );
        assert!(errors.is_empty());
    }
}
