//! Domain-layer errors. Form validation failures are not errors here;
//! they travel as per-field message maps.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A JSON value with no scalar form (nested structures, non-finite
    /// numbers)
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
