use crate::spatial::error::{BoundaryError, EnrichmentError};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThaiwaterError {
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error("Failed to flatten records into table rows")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build data frame")]
    Frame(#[from] PolarsError),
}
