use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, FieldValues};

// ===== Field Types =====

/// Input widget and validation family for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextArea,
    Number,
    Date,
    Select,
    Boolean,
}

/// One choice in a select field. Values are scalars, not labels: state
/// selects carry numeric ids while category selects carry their text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: FieldValue,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

// ===== Validation Rules =====

/// Signature for custom per-field checks. The check sees the candidate
/// value and the whole in-progress form, so cross-field rules are possible;
/// a returned string is used verbatim as the error message.
pub type CustomCheck = fn(&FieldValue, &FieldValues) -> Option<String>;

/// Declarative constraints evaluated by [`validate`](crate::validate::validate).
///
/// `min`/`max` carry a historical double meaning: value bounds on number
/// fields, character-length bounds on text fields. New field types must not
/// extend that overload.
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub pattern_message: Option<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub custom: Option<CustomCheck>,
}

// ===== Field Definitions =====

/// Static metadata for one editable/displayable attribute of a dataset.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Wire name of the column (PascalCase, as the data service exposes it)
    pub name: String,
    /// Human-facing label used in prompts and error messages
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Displayed but never prompted for or submitted from a form
    pub read_only: bool,
    /// Choices for select fields; empty otherwise
    pub options: Vec<SelectOption>,
    pub rules: ValidationRules,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            read_only: false,
            options: Vec::new(),
            rules: ValidationRules::default(),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Text)
    }

    pub fn text_area(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::TextArea)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Number)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Date)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldType::Select);
        field.options = options;
        field
    }

    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Boolean)
    }

    // ===== Builder Methods =====

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.rules.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.rules.max = Some(max);
        self
    }

    pub fn with_min_length(mut self, length: usize) -> Self {
        self.rules.min_length = Some(length);
        self
    }

    pub fn with_max_length(mut self, length: usize) -> Self {
        self.rules.max_length = Some(length);
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.rules.pattern = Some(pattern);
        self
    }

    pub fn with_pattern_message(mut self, message: impl Into<String>) -> Self {
        self.rules.pattern_message = Some(message.into());
        self
    }

    pub fn with_min_date(mut self, date: NaiveDate) -> Self {
        self.rules.min_date = Some(date);
        self
    }

    pub fn with_max_date(mut self, date: NaiveDate) -> Self {
        self.rules.max_date = Some(date);
        self
    }

    pub fn with_custom(mut self, check: CustomCheck) -> Self {
        self.rules.custom = Some(check);
        self
    }

    /// Label for a raw option value, if the value is a known option.
    pub fn option_label(&self, value: &FieldValue) -> Option<&str> {
        self.options
            .iter()
            .find(|option| &option.value == value)
            .map(|option| option.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let field = FieldDef::number("TrainSpeed", "Train Speed (mph)")
            .with_min(0.0)
            .with_max(300.0);

        assert_eq!(field.name, "TrainSpeed");
        assert_eq!(field.field_type, FieldType::Number);
        assert!(!field.required);
        assert_eq!(field.rules.min, Some(0.0));
        assert_eq!(field.rules.max, Some(300.0));
    }

    #[test]
    fn test_required_flag() {
        let field = FieldDef::text("CaseNumber", "Case Number")
            .required()
            .with_max_length(50);

        assert!(field.required);
        assert_eq!(field.rules.max_length, Some(50));
    }

    #[test]
    fn test_option_label() {
        let field = FieldDef::select(
            "StateId",
            "State",
            vec![
                SelectOption::new(6i64, "California"),
                SelectOption::new(48i64, "Texas"),
            ],
        );

        assert_eq!(field.option_label(&FieldValue::Number(6.0)), Some("California"));
        assert_eq!(field.option_label(&FieldValue::Number(99.0)), None);
    }
}
