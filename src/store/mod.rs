//! Record store interface
//!
//! The engine only ever sees this trait. Calls are blocking and made from
//! worker threads owned by the runtime, so implementations must be `Send + Sync`.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{load_seed, parse_seed_csv, parse_seed_json, SeedError};

use thiserror::Error;

use crate::grid::ColumnFilters;
use crate::model::{PartialFields, Record, RecordId, SchemaError};

/// Failure to load the baseline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Failure of a single per-record update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<SchemaError> for UpdateError {
    fn from(err: SchemaError) -> Self {
        UpdateError::Validation(err.to_string())
    }
}

pub trait RecordStore: Send + Sync {
    /// Fetch records in store order, optionally narrowed by a server-side filter
    fn list(&self, filter: Option<&ColumnFilters>) -> Result<Vec<Record>, FetchError>;

    /// Apply a partial update and return the full updated record
    fn update(&self, id: &RecordId, fields: &PartialFields) -> Result<Record, UpdateError>;
}
