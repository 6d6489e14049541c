mod aggregate;
mod domains;
mod error;
mod frame;
mod join;
mod normalize;
mod reconcile;
mod spatial;
mod types;

pub use error::ThaiwaterError;
pub use reconcile::*;

pub use aggregate::registry::{Entry, Registry, Upsert, COLLECTED_AT_COLUMN};
pub use aggregate::{aggregate, Aggregation};
pub use join::{inner_join, join};
pub use normalize::Feed;

pub use domains::dam::{DamObservation, DamSource, DamStation, LARGE_RESERVOIR, MEDIUM_RESERVOIR};
pub use domains::rainfall::{RainfallObservation, RainfallSource, RainfallStation};
pub use domains::water_gate::{WaterGateObservation, WaterGateSource, WaterGateStation};
pub use domains::water_level::{WaterLevelObservation, WaterLevelSource, WaterLevelStation};
pub use domains::{Dam, Domain, DomainKind, Rainfall, WaterGate, WaterLevel};

pub use types::quality::{DataQualityEvent, QualityReport};
pub use types::station_key::StationKey;
pub use types::table::{Row, Table};

pub use aggregate::merge::Record;
pub use normalize::Normalized;

pub use spatial::enrich::{
    validate_coordinates, AMPHUR_COLUMN, LAT_COLUMN, LNG_COLUMN, PROVINCE_COLUMN, TAMBON_COLUMN,
};
pub use spatial::{
    enrich, Boundary, BoundaryError, BoundaryLayer, CoordinateIssue, Crs, EnrichedTable,
    EnrichmentError, Enricher, QuarantinedRecord, RegionAttributes, Unenriched,
};
