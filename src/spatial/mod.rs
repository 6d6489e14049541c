//! Geospatial enrichment: boundary layers, CRS reconciliation and the
//! point-in-polygon join that assigns administrative regions to stations.

pub mod boundary;
pub mod crs;
pub mod enrich;
pub mod error;
pub mod index;

pub use boundary::{Boundary, BoundaryLayer};
pub use crs::Crs;
pub use enrich::{
    enrich, CoordinateIssue, EnrichedTable, Enricher, QuarantinedRecord, RegionAttributes,
    Unenriched,
};
pub use error::{BoundaryError, EnrichmentError};
