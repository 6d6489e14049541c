//! This module provides the main entry point of the crate. A [`Reconciler`]
//! takes the raw feeds of one domain and produces its station, observation,
//! combined and enriched tables in a single call.

use crate::aggregate::aggregate;
use crate::domains::Domain;
use crate::error::ThaiwaterError;
use crate::join::join;
use crate::normalize::Feed;
use crate::spatial::boundary::BoundaryLayer;
use crate::spatial::enrich::{EnrichedTable, Enricher, RegionAttributes, Unenriched};
use crate::spatial::error::EnrichmentError;
use crate::types::quality::QualityReport;
use crate::types::table::Table;
use bon::bon;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_json::Value;

/// What happened to the combined table in the enrichment stage.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Region columns were attached. Quarantined and unmatched rows are
    /// available on the [`EnrichedTable`].
    Enriched(EnrichedTable),
    /// A configuration error stopped enrichment; the combined table is
    /// returned as it was.
    Unenriched(Unenriched),
    /// No boundary layer was configured.
    Skipped,
}

impl EnrichmentOutcome {
    pub fn enriched(&self) -> Option<&EnrichedTable> {
        match self {
            EnrichmentOutcome::Enriched(enriched) => Some(enriched),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EnrichmentError> {
        match self {
            EnrichmentOutcome::Unenriched(unenriched) => Some(&unenriched.error),
            _ => None,
        }
    }
}

/// Every table produced for one domain, plus the data-quality events seen
/// while aggregating it.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainOutput {
    /// `<domain>_station`
    pub stations: Table,
    /// `<domain>_data`
    pub observations: Table,
    /// `combined_<domain>`: stations and observations sharing a key.
    pub combined: Table,
    pub enrichment: EnrichmentOutcome,
    pub quality: QualityReport,
}

/// Runs aggregation, the cross-source join and geospatial enrichment for one
/// domain at a time.
///
/// # Examples
///
/// ```
/// use thaiwater::{Feed, Reconciler, WaterLevel};
/// use serde_json::json;
///
/// let reconciler = Reconciler::builder().build();
/// let feeds = vec![Feed::new(
///     "waterlevel_load",
///     vec![json!({
///         "station": {
///             "id": 42,
///             "tele_station_name": {"th": "สะพานพระราม 7"},
///             "tele_station_lat": 13.81,
///             "tele_station_long": 100.52
///         },
///         "waterlevel_msl": 1.2
///     })],
/// )];
///
/// let output = reconciler.reconcile::<WaterLevel>(&feeds).unwrap();
/// assert_eq!(output.combined.len(), 1);
/// assert!(output.enrichment.enriched().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler {
    enricher: Option<Result<Enricher, EnrichmentError>>,
    collected_at: Option<DateTime<Utc>>,
}

#[bon]
impl Reconciler {
    /// Creates a new `Reconciler`.
    ///
    /// # Arguments
    ///
    /// * `boundaries` - Administrative boundary layer. Without one, enrichment
    ///   is skipped.
    /// * `region_attributes` - Boundary properties holding the province,
    ///   amphur and tambon names. Defaults to `NAME_1`, `NAME_2`, `NAME_3`.
    /// * `collected_at` - Timestamp stamped on every registry entry. Defaults
    ///   to the time of each [`Reconciler::reconcile`] call.
    ///
    /// The layer is checked and reprojected here, once. A layer that fails
    /// those checks does not fail construction: every run then reports the
    /// error through [`EnrichmentOutcome::Unenriched`].
    #[builder]
    pub fn new(
        boundaries: Option<BoundaryLayer>,
        #[builder(default)] region_attributes: RegionAttributes,
        collected_at: Option<DateTime<Utc>>,
    ) -> Self {
        let enricher = boundaries.map(|layer| {
            Enricher::builder()
                .layer(layer)
                .attributes(region_attributes)
                .build()
        });
        if let Some(Err(error)) = &enricher {
            warn!("Boundary layer rejected, enrichment disabled: {}", error);
        }
        Self {
            enricher,
            collected_at,
        }
    }
}

impl Reconciler {
    /// Folds `feeds` into the registries of `D`, joins them and enriches the
    /// combined table.
    pub fn reconcile<D: Domain>(&self, feeds: &[Feed]) -> Result<DomainOutput, ThaiwaterError> {
        let collected_at = self.collected_at.unwrap_or_else(Utc::now);
        let aggregation = aggregate::<D>(feeds, collected_at);

        let stations = aggregation.station_table()?;
        let observations = aggregation.observation_table()?;
        let combined = join(&aggregation)?;

        let enrichment = match &self.enricher {
            None => EnrichmentOutcome::Skipped,
            Some(Err(error)) => EnrichmentOutcome::Unenriched(Unenriched {
                table: combined.clone(),
                error: error.clone(),
            }),
            Some(Ok(enricher)) => match enricher.enrich(combined.clone()) {
                Ok(enriched) => EnrichmentOutcome::Enriched(enriched),
                Err(unenriched) => EnrichmentOutcome::Unenriched(unenriched),
            },
        };

        info!(
            "Reconciled {}: {} station rows, {} observation rows, {} combined rows",
            D::KIND,
            stations.len(),
            observations.len(),
            combined.len()
        );

        Ok(DomainOutput {
            stations,
            observations,
            combined,
            enrichment,
            quality: aggregation.quality,
        })
    }

    /// Splits upstream response bodies into feeds with
    /// [`Domain::feeds_from_response`], then runs [`Reconciler::reconcile`].
    ///
    /// Each response is paired with the tag of the endpoint it came from.
    pub fn reconcile_responses<D: Domain>(
        &self,
        responses: &[(&str, &Value)],
    ) -> Result<DomainOutput, ThaiwaterError> {
        let feeds: Vec<Feed> = responses
            .iter()
            .flat_map(|(tag, response)| D::feeds_from_response(tag, response))
            .collect();
        self.reconcile::<D>(&feeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{Dam, Rainfall, WaterLevel};
    use crate::spatial::boundary::Boundary;
    use crate::spatial::crs::Crs;
    use chrono::TimeZone;
    use geo::{LineString, MultiPolygon, Polygon};
    use serde_json::{json, Map};

    fn bangkok() -> Boundary {
        let mut properties = Map::new();
        properties.insert("NAME_1".into(), json!("กรุงเทพมหานคร"));
        properties.insert("NAME_2".into(), json!("บางซื่อ"));
        properties.insert("NAME_3".into(), json!("บางซื่อ"));
        Boundary {
            geometry: MultiPolygon(vec![Polygon::new(
                LineString::from(vec![
                    (100.3, 13.5),
                    (100.95, 13.5),
                    (100.95, 14.0),
                    (100.3, 14.0),
                    (100.3, 13.5),
                ]),
                vec![],
            )]),
            properties,
        }
    }

    fn gauge(id: i64, lat: Value, lng: f64) -> Value {
        json!({
            "station": {
                "id": id,
                "tele_station_name": {"th": format!("สถานี {}", id)},
                "tele_station_lat": lat,
                "tele_station_long": lng
            },
            "waterlevel_msl": 1.5
        })
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_full_run_enriches_combined_table() {
        let reconciler = Reconciler::builder()
            .boundaries(BoundaryLayer::new(Crs::Wgs84, vec![bangkok()]))
            .collected_at(fixed_time())
            .build();
        let feeds = vec![Feed::new(
            "waterlevel_load",
            vec![
                gauge(1, json!(13.81), 100.52),
                gauge(2, json!(18.79), 98.98),
                gauge(3, json!(95.0), 100.5),
                gauge(4, Value::Null, 100.5),
            ],
        )];

        let output = reconciler.reconcile::<WaterLevel>(&feeds).unwrap();

        assert_eq!(output.stations.name, "water_level_station");
        assert_eq!(output.observations.name, "water_level_data");
        // Station 4 has no latitude, so it never becomes a station record.
        assert_eq!(output.stations.len(), 3);
        assert_eq!(output.observations.len(), 4);
        assert_eq!(output.combined.len(), 3);
        assert_eq!(output.quality.missing_locations(), 1);

        let enriched = output.enrichment.enriched().unwrap();
        assert_eq!(enriched.table.len(), 2);
        assert_eq!(enriched.matched(), 1);
        assert_eq!(enriched.unmatched.len(), 1);
        assert_eq!(enriched.invalid_coordinates.len(), 1);
        assert_eq!(enriched.table.rows[0]["province"], json!("กรุงเทพมหานคร"));
        assert_eq!(enriched.table.rows[0]["collected_at"], json!("2024-10-01T08:00:00Z"));
        assert_eq!(enriched.table.rows[1]["province"], Value::Null);
    }

    #[test]
    fn test_without_boundaries_enrichment_is_skipped() {
        let reconciler = Reconciler::builder().collected_at(fixed_time()).build();
        let feeds = vec![Feed::new("waterlevel_load", vec![gauge(1, json!(13.8), 100.5)])];

        let output = reconciler.reconcile::<WaterLevel>(&feeds).unwrap();
        assert_eq!(output.enrichment, EnrichmentOutcome::Skipped);
        assert_eq!(output.combined.len(), 1);
    }

    #[test]
    fn test_layer_without_subdistrict_returns_combined_unchanged() {
        let mut boundary = bangkok();
        boundary.properties.remove("NAME_3");
        let reconciler = Reconciler::builder()
            .boundaries(BoundaryLayer::new(Crs::Wgs84, vec![boundary]))
            .collected_at(fixed_time())
            .build();
        let feeds = vec![Feed::new("waterlevel_load", vec![gauge(1, json!(13.8), 100.5)])];

        let output = reconciler.reconcile::<WaterLevel>(&feeds).unwrap();
        match &output.enrichment {
            EnrichmentOutcome::Unenriched(unenriched) => {
                assert_eq!(unenriched.table, output.combined);
                assert_eq!(
                    unenriched.error,
                    EnrichmentError::MissingRegionAttributes {
                        missing: vec!["NAME_3".to_string()]
                    }
                );
            }
            other => panic!("expected unenriched output, got {:?}", other),
        }
        assert!(!output.combined.has_column("province"));
    }

    #[test]
    fn test_unsupported_layer_crs_is_reported_per_run() {
        let reconciler = Reconciler::builder()
            .boundaries(BoundaryLayer::new(Crs::Epsg(24047), vec![bangkok()]))
            .build();

        let output = reconciler.reconcile::<WaterLevel>(&[]).unwrap();
        assert!(matches!(
            output.enrichment.error(),
            Some(EnrichmentError::UnsupportedCrs { .. })
        ));
        assert!(output.combined.is_empty());
    }

    #[test]
    fn test_custom_region_attributes() {
        let mut boundary = bangkok();
        boundary.properties = Map::new();
        boundary.properties.insert("PROV".into(), json!("Bangkok"));
        boundary.properties.insert("DIST".into(), json!("Bang Sue"));
        boundary.properties.insert("SUBDIST".into(), json!("Bang Sue"));
        let reconciler = Reconciler::builder()
            .boundaries(BoundaryLayer::new(Crs::Wgs84, vec![boundary]))
            .region_attributes(RegionAttributes {
                province: "PROV".into(),
                amphur: "DIST".into(),
                tambon: "SUBDIST".into(),
            })
            .collected_at(fixed_time())
            .build();
        let feeds = vec![Feed::new("waterlevel_load", vec![gauge(1, json!(13.8), 100.5)])];

        let output = reconciler.reconcile::<WaterLevel>(&feeds).unwrap();
        let enriched = output.enrichment.enriched().unwrap();
        assert_eq!(enriched.table.rows[0]["province"], json!("Bangkok"));
        assert_eq!(enriched.table.rows[0]["tambon"], json!("Bang Sue"));
    }

    #[test]
    fn test_rainfall_responses_merge_across_sub_feeds() {
        let daily = json!({"data": [{
            "station": {
                "id": 7,
                "tele_station_name": {"th": "แม่แตง"},
                "tele_station_lat": 19.12,
                "tele_station_long": 98.94
            },
            "basin": {"basin_code": 6},
            "rainfall_value": 12.5,
            "rainfall_datetime": "2024-10-01 07:00"
        }]});
        let monthly = json!({"data": [{
            "tele_station_id": 7,
            "tele_station_name": {"th": "แม่แตง"},
            "tele_station_lat": 19.12,
            "tele_station_long": 98.94,
            "rainfall_value": 180.0
        }]});
        let reconciler = Reconciler::builder().collected_at(fixed_time()).build();

        let output = reconciler
            .reconcile_responses::<Rainfall>(&[
                ("rainfall_daily", &daily),
                ("rainfall_monthly", &monthly),
            ])
            .unwrap();

        assert_eq!(output.stations.len(), 1);
        assert_eq!(output.combined.len(), 1);
        assert_eq!(output.stations.rows[0]["basin_code"], json!("06"));
        assert_eq!(output.combined.name, "combined_rainfall");
        assert_eq!(output.observations.rows[0]["rain_daily_value"], json!(12.5));
        assert_eq!(output.observations.rows[0]["rain_monthly_value"], json!(180.0));
    }

    #[test]
    fn test_dam_response_yields_three_feeds() {
        let response = json!({"data": {
            "dam_hourly": [{
                "dam": {"dam_name": {"th": "เขื่อนภูมิพล"}, "dam_lat": 17.24, "dam_long": 98.97},
                "dam_storage": 7000.0
            }],
            "dam_daily": [{
                "dam": {"dam_name": {"th": "เขื่อนสิริกิติ์"}, "dam_lat": 17.76, "dam_long": 100.56},
                "dam_storage": 6000.0
            }],
            "dam_medium": []
        }});
        let reconciler = Reconciler::builder().collected_at(fixed_time()).build();

        let output = reconciler
            .reconcile_responses::<Dam>(&[("dam", &response)])
            .unwrap();

        assert_eq!(output.combined.len(), 2);
        assert!(output.quality.is_clean());
    }
}
