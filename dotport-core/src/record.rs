//! Bridging between typed dataset rows and scalar form values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::value::{values_from_object, FieldValues};

/// A dataset row the generic table can manage.
///
/// Implementors are plain serde structs mirroring the data service's
/// PascalCase columns. The default conversion flattens a row into the
/// scalar form values a modal session edits; rows are flat, so it cannot
/// fail for well-formed records.
pub trait TableRecord:
    DeserializeOwned + Serialize + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// The record's primary key.
    fn id(&self) -> i64;

    /// Flatten into form values, keyed by wire field name.
    fn to_field_values(&self) -> Result<FieldValues> {
        let json = serde_json::to_value(self)?;
        values_from_object(&json)
    }
}
