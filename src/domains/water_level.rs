//! Water-level telemetry (`waterlevel_load`).

use crate::aggregate::merge::impl_record;
use crate::domains::{Domain, DomainKind};
use crate::normalize::paths::{telemetry, water_level as paths};
use crate::normalize::probe::Probe;
use crate::normalize::{Feed, Normalized};
use crate::types::station_key::StationKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const SOURCE_TAG: &str = "waterlevel_load";

/// Static metadata of a water-level gauge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterLevelStation {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub station_oldcode: Option<String>,
    pub left_bank: Option<f64>,
    pub right_bank: Option<f64>,
    pub min_bank: Option<f64>,
    pub ground_level: Option<f64>,
    #[serde(rename = "offset_")]
    pub offset: Option<f64>,
    pub basin_name: Option<String>,
    pub agency_name: Option<String>,
    pub is_key_station: Option<bool>,
    pub warning_level_m: Option<f64>,
    pub critical_level_m: Option<f64>,
    pub critical_level_msl: Option<f64>,
}

impl_record!(WaterLevelStation {
    name,
    lat,
    lng,
    station_oldcode,
    left_bank,
    right_bank,
    min_bank,
    ground_level,
    offset,
    basin_name,
    agency_name,
    is_key_station,
    warning_level_m,
    critical_level_m,
    critical_level_msl,
});

/// Latest reading of a water-level gauge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterLevelObservation {
    pub datetime: Option<String>,
    pub waterlevel_m: Option<f64>,
    pub waterlevel_msl: Option<f64>,
    pub waterlevel_msl_previous: Option<f64>,
    pub flow_rate: Option<f64>,
    pub discharge: Option<f64>,
    pub storage_percent: Option<f64>,
    pub situation_level: Option<i64>,
}

impl_record!(WaterLevelObservation {
    datetime,
    waterlevel_m,
    waterlevel_msl,
    waterlevel_msl_previous,
    flow_rate,
    discharge,
    storage_percent,
    situation_level,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterLevelSource {
    Load,
}

impl fmt::Display for WaterLevelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SOURCE_TAG)
    }
}

pub struct WaterLevel;

impl Domain for WaterLevel {
    const KIND: DomainKind = DomainKind::WaterLevel;
    const KEY_COLUMN: &'static str = "id";

    type Source = WaterLevelSource;
    type Station = WaterLevelStation;
    type Observation = WaterLevelObservation;

    fn parse_source(tag: &str) -> Option<Self::Source> {
        (tag == SOURCE_TAG).then_some(WaterLevelSource::Load)
    }

    fn key(item: &Value) -> Option<StationKey> {
        Probe::new(item)
            .first(telemetry::ID)
            .and_then(StationKey::from_id_value)
    }

    fn normalize(
        _source: Self::Source,
        item: &Value,
    ) -> Option<Normalized<Self::Station, Self::Observation>> {
        let key = Self::key(item)?;
        let probe = Probe::new(item);

        let station = WaterLevelStation {
            name: probe.text(telemetry::NAME),
            lat: probe.number(telemetry::LAT),
            lng: probe.number(telemetry::LNG),
            station_oldcode: probe.text(telemetry::OLDCODE),
            left_bank: probe.number(telemetry::LEFT_BANK),
            right_bank: probe.number(telemetry::RIGHT_BANK),
            min_bank: probe.number(telemetry::MIN_BANK),
            ground_level: probe.number(telemetry::GROUND_LEVEL),
            offset: probe.number(telemetry::OFFSET),
            basin_name: probe.text(telemetry::BASIN_NAME),
            agency_name: probe.text(telemetry::AGENCY_NAME),
            is_key_station: probe.flag(telemetry::IS_KEY_STATION),
            warning_level_m: probe.number(telemetry::WARNING_LEVEL_M),
            critical_level_m: probe.number(telemetry::CRITICAL_LEVEL_M),
            critical_level_msl: probe.number(telemetry::CRITICAL_LEVEL_MSL),
        };
        // A gauge is only registered with both coordinates and a Thai name.
        let admitted = station.lat.is_some() && station.lng.is_some() && station.name.is_some();

        let observation = WaterLevelObservation {
            datetime: probe.text(paths::DATETIME),
            waterlevel_m: probe.number(paths::WATERLEVEL_M),
            waterlevel_msl: probe.number(paths::WATERLEVEL_MSL),
            waterlevel_msl_previous: probe.number(paths::WATERLEVEL_MSL_PREVIOUS),
            flow_rate: probe.number(paths::FLOW_RATE),
            discharge: probe.number(paths::DISCHARGE),
            storage_percent: probe.number(paths::STORAGE_PERCENT),
            situation_level: probe.integer(paths::SITUATION_LEVEL),
        };

        Some(Normalized {
            key,
            station: admitted.then_some(station),
            observation,
        })
    }

    fn feeds_from_response(_tag: &str, response: &Value) -> Vec<Feed> {
        vec![Feed::from_envelope(SOURCE_TAG, response, paths::ENVELOPE)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Value {
        json!({
            "station": {
                "id": 15,
                "tele_station_name": {"th": "สะพานนวรัฐ"},
                "tele_station_lat": 18.787,
                "tele_station_long": 98.999,
                "tele_station_oldcode": "P.1",
                "left_bank": 304.1,
                "ground_level": "296.0",
                "offset": 0,
                "is_key_station": true,
                "critical_level_msl": 304.2
            },
            "basin": {"basin_name": {"th": "แม่น้ำปิง"}},
            "agency": {"agency_name": {"th": "กรมชลประทาน"}},
            "waterlevel_datetime": "2024-10-01 07:00",
            "waterlevel_msl": 301.5,
            "situation_level": 2
        })
    }

    #[test]
    fn test_normalize_extracts_station_and_observation() {
        let normalized = WaterLevel::normalize(WaterLevelSource::Load, &item()).unwrap();
        assert_eq!(normalized.key, StationKey::Id(15));

        let station = normalized.station.unwrap();
        assert_eq!(station.name.as_deref(), Some("สะพานนวรัฐ"));
        assert_eq!(station.ground_level, Some(296.0));
        assert_eq!(station.offset, Some(0.0));
        assert_eq!(station.is_key_station, Some(true));
        assert_eq!(station.basin_name.as_deref(), Some("แม่น้ำปิง"));
        assert_eq!(station.min_bank, None);

        assert_eq!(normalized.observation.waterlevel_msl, Some(301.5));
        assert_eq!(normalized.observation.situation_level, Some(2));
        assert_eq!(normalized.observation.discharge, None);
    }

    #[test]
    fn test_station_without_coordinates_is_not_admitted() {
        let mut raw = item();
        raw["station"]
            .as_object_mut()
            .unwrap()
            .remove("tele_station_long");

        let normalized = WaterLevel::normalize(WaterLevelSource::Load, &raw).unwrap();
        assert!(normalized.station.is_none());
        assert_eq!(normalized.observation.waterlevel_msl, Some(301.5));
    }

    #[test]
    fn test_item_without_station_id_is_dropped() {
        let raw = json!({"station": {"tele_station_lat": 1.0}, "waterlevel_msl": 2.0});
        assert!(WaterLevel::normalize(WaterLevelSource::Load, &raw).is_none());
    }

    #[test]
    fn test_feeds_from_response() {
        let body = json!({"waterlevel_data": {"data": [item(), item()]}});
        let feeds = WaterLevel::feeds_from_response("anything", &body);
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].tag, SOURCE_TAG);
        assert_eq!(feeds[0].len(), 2);
        assert_eq!(WaterLevel::parse_source("watergate_load"), None);
    }
}
