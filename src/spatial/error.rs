use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a boundary layer.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Failed to read boundary file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse boundary GeoJSON")]
    Parse(#[from] serde_json::Error),

    #[error("Unrecognized CRS identifier '{0}'")]
    UnrecognizedCrs(String),

    #[error("Feature {feature} has invalid geometry: {reason}")]
    InvalidGeometry { feature: usize, reason: String },
}

/// Configuration error of one enrichment call.
///
/// None of these is fatal to a run: the caller gets the table back
/// unenriched together with the error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrichmentError {
    #[error("Table '{table}' is missing coordinate column(s) {missing:?}")]
    MissingCoordinateColumns { table: String, missing: Vec<String> },

    #[error("Boundary layer is missing region attribute(s) {missing:?}")]
    MissingRegionAttributes { missing: Vec<String> },

    #[error("No reprojection from {from} to {to}")]
    UnsupportedCrs { from: String, to: String },

    #[error("Failed to reproject feature {feature}: {reason}")]
    Reprojection { feature: usize, reason: String },
}
