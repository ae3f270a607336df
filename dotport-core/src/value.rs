use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{CoreError, Result};

// ===== Field Values =====

/// A single scalar form value: string, number, boolean, or null.
///
/// Records and form state exchange data through this type; nested JSON
/// structures are deliberately unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Form state and flattened records: field name to scalar value.
pub type FieldValues = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// True for the values the validator treats as "not provided".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric coercion used by the validator: numbers pass through, text
    /// is parsed. Anything that does not parse to a real number is `None`.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Convert a JSON scalar. Arrays and objects are rejected: records are
    /// flat by construction.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Number)
                .ok_or_else(|| CoreError::UnsupportedValue(format!("non-finite number {}", n))),
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Array(_) => Err(CoreError::UnsupportedValue("nested array".to_string())),
            Value::Object(_) => Err(CoreError::UnsupportedValue("nested object".to_string())),
        }
    }

    /// Convert back to JSON. Whole numbers become integer literals so the
    /// data service accepts them for integer columns.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9e15 {
                    Value::Number(Number::from(*n as i64))
                } else {
                    Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)
                }
            }
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "-"),
            FieldValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            FieldValue::Number(n) => write!(f, "{}", number_text(*n)),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

// ===== Conversions =====

/// Flatten a JSON object into scalar form values.
pub fn values_from_object(value: &Value) -> Result<FieldValues> {
    let map = value
        .as_object()
        .ok_or_else(|| CoreError::UnsupportedValue("expected a JSON object".to_string()))?;

    let mut values = FieldValues::new();
    for (name, entry) in map {
        values.insert(name.clone(), FieldValue::from_json(entry)?);
    }
    Ok(values)
}

/// Build a JSON object payload from form values.
pub fn values_to_object(values: &FieldValues) -> Value {
    let mut map = Map::new();
    for (name, value) in values {
        map.insert(name.clone(), value.to_json());
    }
    Value::Object(map)
}

/// Plain numeric rendering: whole numbers without a decimal point.
pub fn number_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_deserialization() {
        let value: FieldValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(value, FieldValue::Null);

        let value: FieldValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(value, FieldValue::Bool(true));

        let value: FieldValue = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(value, FieldValue::Number(42.0));

        let value: FieldValue = serde_json::from_value(json!("Derailment")).unwrap();
        assert_eq!(value, FieldValue::Text("Derailment".to_string()));
    }

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(!FieldValue::Text(" ".to_string()).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(FieldValue::Number(3.5).coerce_number(), Some(3.5));
        assert_eq!(FieldValue::Text("42".to_string()).coerce_number(), Some(42.0));
        assert_eq!(FieldValue::Text(" 42 ".to_string()).coerce_number(), Some(42.0));
        assert_eq!(FieldValue::Text("abc".to_string()).coerce_number(), None);
        assert_eq!(FieldValue::Text("NaN".to_string()).coerce_number(), None);
        assert_eq!(FieldValue::Bool(true).coerce_number(), None);
        assert_eq!(FieldValue::Null.coerce_number(), None);
    }

    #[test]
    fn test_from_json_rejects_nested() {
        assert!(FieldValue::from_json(&json!([1, 2])).is_err());
        assert!(FieldValue::from_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_to_json_integer_form() {
        assert_eq!(FieldValue::Number(5.0).to_json(), json!(5));
        assert_eq!(FieldValue::Number(5.5).to_json(), json!(5.5));
        assert_eq!(FieldValue::Null.to_json(), json!(null));
    }

    #[test]
    fn test_object_round_trip() {
        let object = json!({
            "Id": 7,
            "ReportingRailroadName": "BNSF",
            "TrainSpeed": null,
            "StructurallyDeficient": false
        });

        let values = values_from_object(&object).unwrap();
        assert_eq!(values["Id"], FieldValue::Number(7.0));
        assert_eq!(values["TrainSpeed"], FieldValue::Null);

        let back = values_to_object(&values);
        assert_eq!(back["Id"], json!(7));
        assert_eq!(back["StructurallyDeficient"], json!(false));
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(300.0), "300");
        assert_eq!(number_text(0.0), "0");
        assert_eq!(number_text(2.5), "2.5");
        assert_eq!(number_text(-12.0), "-12");
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Null.to_string(), "-");
        assert_eq!(FieldValue::Bool(true).to_string(), "Yes");
        assert_eq!(FieldValue::Bool(false).to_string(), "No");
        assert_eq!(FieldValue::Number(120.0).to_string(), "120");
        assert_eq!(FieldValue::Text("Urban".to_string()).to_string(), "Urban");
    }
}
