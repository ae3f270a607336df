//! Typed access to one entity collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use dotport_core::TableRecord;

use crate::client::HttpClient;
use crate::error::{PortalError, PortalResult};
use crate::query::{ReadQuery, ValueEnvelope};

/// Client for one entity path (`/RailroadAccident`, `/Bridge`, ...).
///
/// Reads go to the collection path; mutations address single records as
/// `<entity>/Id/<id>`, the key-path form the data service exposes for
/// single-column keys.
#[derive(Debug, Clone)]
pub struct RecordsClient<T> {
    client: Arc<HttpClient>,
    entity: String,
    _marker: PhantomData<fn() -> T>,
}

/// Mutation responses arrive either bare or wrapped in a one-element
/// `value` envelope, depending on the service version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MutationResponse<T> {
    Enveloped { value: Vec<T> },
    Bare(T),
}

impl<T> MutationResponse<T> {
    fn into_record(self) -> Option<T> {
        match self {
            MutationResponse::Enveloped { value } => value.into_iter().next(),
            MutationResponse::Bare(record) => Some(record),
        }
    }
}

impl<T: TableRecord> RecordsClient<T> {
    /// Create a records client for an entity name.
    pub fn new(client: Arc<HttpClient>, entity: impl Into<String>) -> Self {
        Self {
            client,
            entity: entity.into(),
            _marker: PhantomData,
        }
    }

    /// The entity name this client addresses.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    fn path(&self) -> String {
        format!("/{}", self.entity.trim_start_matches('/'))
    }

    fn record_path(&self, id: i64) -> String {
        format!("{}/Id/{}", self.path(), id)
    }

    /// Bounded list. The whole result is the dataset snapshot; pagination
    /// never comes back here for sub-ranges.
    pub async fn list(&self, query: &ReadQuery) -> PortalResult<ValueEnvelope<T>> {
        self.client.get_with_query(&self.path(), &query.params()).await
    }

    /// Create a record from a JSON payload of column values.
    pub async fn create(&self, payload: &Value) -> PortalResult<T> {
        let response: MutationResponse<T> = self.client.post(&self.path(), payload).await?;
        response
            .into_record()
            .ok_or_else(|| PortalError::UnexpectedResponse("empty mutation response".to_string()))
    }

    /// Partial update by id: the payload carries only column values.
    pub async fn update(&self, id: i64, payload: &Value) -> PortalResult<T> {
        let response: MutationResponse<T> =
            self.client.patch(&self.record_path(id), payload).await?;
        response
            .into_record()
            .ok_or_else(|| PortalError::UnexpectedResponse("empty mutation response".to_string()))
    }

    /// Delete by id.
    pub async fn delete(&self, id: i64) -> PortalResult<()> {
        self.client.delete(&self.record_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotport_core::RailroadAccident;
    use serde_json::json;

    #[test]
    fn test_mutation_response_shapes() {
        let enveloped: MutationResponse<i64> =
            serde_json::from_value(json!({"value": [7]})).unwrap();
        assert_eq!(enveloped.into_record(), Some(7));

        let bare: MutationResponse<i64> = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(bare.into_record(), Some(7));

        let empty: MutationResponse<i64> = serde_json::from_value(json!({"value": []})).unwrap();
        assert_eq!(empty.into_record(), None);
    }

    #[test]
    fn test_record_paths() {
        let client = Arc::new(
            HttpClient::new(
                crate::config::PortalConfig::new("http://localhost:5000/api"),
                Arc::new(crate::auth::StaticToken::new("t")),
            )
            .unwrap(),
        );
        let records: RecordsClient<RailroadAccident> =
            RecordsClient::new(client, "RailroadAccident");

        assert_eq!(records.path(), "/RailroadAccident");
        assert_eq!(records.record_path(42), "/RailroadAccident/Id/42");
    }
}
