//! Read-query construction for the OData-style endpoints.

use serde::Deserialize;

/// Options for a bounded dataset read.
///
/// Rendered as `$top`/`$skip`/`$orderby`/`$filter` query parameters;
/// `$count=true` is always appended so the response envelope can carry the
/// service-side total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadQuery {
    /// Maximum rows to return
    pub top: Option<u32>,
    /// Rows to skip (server-side; unused by snapshot fetches)
    pub skip: Option<u32>,
    /// Ordering expression, e.g. `AccidentDate desc`
    pub order_by: Option<String>,
    /// Filter expression, e.g. `StateId eq 6`
    pub filter: Option<String>,
}

impl ReadQuery {
    /// An empty query (still sends `$count=true`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of rows returned.
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Skip rows server-side.
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Order results server-side.
    pub fn with_order_by(mut self, expression: impl Into<String>) -> Self {
        self.order_by = Some(expression.into());
        self
    }

    /// Filter results server-side.
    pub fn with_filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    /// Key/value pairs for the request query string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip", skip.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("$orderby", order_by.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("$filter", filter.clone()));
        }
        params.push(("$count", "true".to_string()));
        params
    }
}

/// The `value` envelope wrapping every collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueEnvelope<T> {
    /// The records themselves
    pub value: Vec<T>,
    /// Total matching rows server-side, when the service reports it
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_order_and_count() {
        let query = ReadQuery::new()
            .with_top(500)
            .with_order_by("AccidentDate desc");

        let params = query.params();
        assert_eq!(
            params,
            vec![
                ("$top", "500".to_string()),
                ("$orderby", "AccidentDate desc".to_string()),
                ("$count", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_still_counts() {
        assert_eq!(ReadQuery::new().params(), vec![("$count", "true".to_string())]);
    }

    #[test]
    fn test_envelope_with_and_without_count() {
        let body = r#"{"value": [1, 2, 3], "@odata.count": 63}"#;
        let envelope: ValueEnvelope<i64> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.value, vec![1, 2, 3]);
        assert_eq!(envelope.count, Some(63));

        let body = r#"{"value": []}"#;
        let envelope: ValueEnvelope<i64> = serde_json::from_str(body).unwrap();
        assert!(envelope.value.is_empty());
        assert_eq!(envelope.count, None);
    }
}
