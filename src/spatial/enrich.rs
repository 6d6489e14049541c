//! Point-in-polygon enrichment of station tables with province, district
//! (amphur) and subdistrict (tambon) attributes.

use crate::normalize::value::as_f64;
use crate::spatial::boundary::BoundaryLayer;
use crate::spatial::crs::Crs;
use crate::spatial::error::EnrichmentError;
use crate::spatial::index::BoundaryIndex;
use crate::types::table::{Row, Table};
use bon::bon;
use geo::Point;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const LAT_COLUMN: &str = "lat";
pub const LNG_COLUMN: &str = "lng";
pub const PROVINCE_COLUMN: &str = "province";
pub const AMPHUR_COLUMN: &str = "amphur";
pub const TAMBON_COLUMN: &str = "tambon";

/// Names of the boundary properties that hold the three region levels.
///
/// Defaults to the GADM level-3 names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionAttributes {
    pub province: String,
    pub amphur: String,
    pub tambon: String,
}

impl Default for RegionAttributes {
    fn default() -> Self {
        Self {
            province: "NAME_1".to_string(),
            amphur: "NAME_2".to_string(),
            tambon: "NAME_3".to_string(),
        }
    }
}

impl RegionAttributes {
    fn required(&self) -> [&str; 3] {
        [
            self.province.as_str(),
            self.amphur.as_str(),
            self.tambon.as_str(),
        ]
    }
}

/// Why a record could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateIssue {
    Missing,
    NotNumeric,
    OutOfRange { lat: f64, lng: f64 },
}

impl fmt::Display for CoordinateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateIssue::Missing => write!(f, "missing latitude or longitude"),
            CoordinateIssue::NotNumeric => write!(f, "non-numeric latitude or longitude"),
            CoordinateIssue::OutOfRange { lat, lng } => {
                write!(f, "coordinates ({}, {}) out of range", lat, lng)
            }
        }
    }
}

/// A row excluded from enrichment, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    pub row: Row,
    pub issue: CoordinateIssue,
}

/// Result of a successful enrichment call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    /// Every row with valid coordinates, with the region columns appended.
    /// Unmatched rows carry null region values.
    pub table: Table,
    /// Rows dropped for invalid coordinates. They appear nowhere else.
    pub invalid_coordinates: Vec<QuarantinedRecord>,
    /// Rows with valid coordinates that fell in no polygon, as they appear in
    /// `table`.
    pub unmatched: Vec<Row>,
}

impl EnrichedTable {
    pub fn matched(&self) -> usize {
        self.table.len().saturating_sub(self.unmatched.len())
    }
}

/// The input table handed back after a configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct Unenriched {
    pub table: Table,
    pub error: EnrichmentError,
}

/// Checks one row's coordinates. Both must coerce to finite numbers within
/// latitude [-90, 90] and longitude [-180, 180].
pub fn validate_coordinates(row: &Row) -> Result<Point<f64>, CoordinateIssue> {
    let lat = row.get(LAT_COLUMN).filter(|v| !v.is_null());
    let lng = row.get(LNG_COLUMN).filter(|v| !v.is_null());
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(CoordinateIssue::Missing);
    };
    let (Some(lat), Some(lng)) = (as_f64(lat), as_f64(lng)) else {
        return Err(CoordinateIssue::NotNumeric);
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(CoordinateIssue::OutOfRange { lat, lng });
    }
    Ok(Point::new(lng, lat))
}

/// A boundary layer prepared for repeated enrichment: attribute names checked,
/// polygons in the point CRS and indexed.
#[derive(Debug, Clone)]
pub struct Enricher {
    index: BoundaryIndex,
    attributes: RegionAttributes,
}

#[bon]
impl Enricher {
    /// Station coordinates are WGS84, so the layer is reprojected to WGS84
    /// when it declares another CRS.
    #[builder]
    pub fn new(
        layer: BoundaryLayer,
        #[builder(default)] attributes: RegionAttributes,
    ) -> Result<Self, EnrichmentError> {
        let missing = layer.missing_attributes(&attributes.required());
        if !missing.is_empty() {
            return Err(EnrichmentError::MissingRegionAttributes { missing });
        }

        let layer = layer.reprojected(Crs::Wgs84)?;
        Ok(Self {
            index: BoundaryIndex::new(layer),
            attributes,
        })
    }
}

impl Enricher {
    pub fn attributes(&self) -> &RegionAttributes {
        &self.attributes
    }

    pub fn layer(&self) -> &BoundaryLayer {
        self.index.layer()
    }

    /// Appends `province`, `amphur` and `tambon` to every row with valid
    /// coordinates.
    ///
    /// Rows with missing, non-numeric or out-of-range coordinates are
    /// quarantined and left out of the output. A table without `lat`/`lng`
    /// columns is returned unchanged as [`Unenriched`].
    pub fn enrich(&self, table: Table) -> Result<EnrichedTable, Unenriched> {
        let missing = table.missing_columns(&[LAT_COLUMN, LNG_COLUMN]);
        if !missing.is_empty() {
            let error = EnrichmentError::MissingCoordinateColumns {
                table: table.name.clone(),
                missing,
            };
            warn!("Not enriching {}: {}", table.name, error);
            return Err(Unenriched { table, error });
        }

        let mut columns = table.columns.clone();
        for column in [PROVINCE_COLUMN, AMPHUR_COLUMN, TAMBON_COLUMN] {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }

        let mut enriched = Table::new(table.name.clone(), columns);
        let mut invalid_coordinates = Vec::new();
        let mut unmatched = Vec::new();

        for mut row in table.rows {
            let point = match validate_coordinates(&row) {
                Ok(point) => point,
                Err(issue) => {
                    invalid_coordinates.push(QuarantinedRecord { row, issue });
                    continue;
                }
            };

            let region = self.index.locate(point).map(|(_, boundary)| {
                [
                    boundary.attribute(&self.attributes.province),
                    boundary.attribute(&self.attributes.amphur),
                    boundary.attribute(&self.attributes.tambon),
                ]
            });
            let matched = region.is_some();
            let [province, amphur, tambon] = region.unwrap_or_default();
            row.insert(PROVINCE_COLUMN.to_string(), province.unwrap_or(Value::Null));
            row.insert(AMPHUR_COLUMN.to_string(), amphur.unwrap_or(Value::Null));
            row.insert(TAMBON_COLUMN.to_string(), tambon.unwrap_or(Value::Null));

            enriched.push(row);
            if !matched {
                if let Some(last) = enriched.rows.last() {
                    unmatched.push(last.clone());
                }
            }
        }

        if !invalid_coordinates.is_empty() {
            warn!(
                "{}: {} record(s) quarantined for invalid coordinates",
                enriched.name,
                invalid_coordinates.len()
            );
        }
        info!(
            "Enriched {}: {} matched, {} unmatched, {} quarantined",
            enriched.name,
            enriched.len() - unmatched.len(),
            unmatched.len(),
            invalid_coordinates.len()
        );

        Ok(EnrichedTable {
            table: enriched,
            invalid_coordinates,
            unmatched,
        })
    }
}

/// One-shot enrichment. Configuration errors of the layer come back as
/// [`Unenriched`] just like those of the table.
pub fn enrich(
    table: Table,
    layer: BoundaryLayer,
    attributes: RegionAttributes,
) -> Result<EnrichedTable, Unenriched> {
    match Enricher::builder().layer(layer).attributes(attributes).build() {
        Ok(enricher) => enricher.enrich(table),
        Err(error) => {
            warn!("Not enriching {}: {}", table.name, error);
            Err(Unenriched { table, error })
        }
    }
}
