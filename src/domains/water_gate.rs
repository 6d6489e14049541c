//! Gate and pump stations (`watergate_load`).

use crate::aggregate::merge::impl_record;
use crate::domains::{Domain, DomainKind};
use crate::normalize::paths::{telemetry, water_gate as paths};
use crate::normalize::probe::Probe;
use crate::normalize::{Feed, Normalized};
use crate::types::station_key::StationKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const SOURCE_TAG: &str = "watergate_load";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterGateStation {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub station_oldcode: Option<String>,
    pub left_bank: Option<f64>,
    pub right_bank: Option<f64>,
    pub is_key_station: Option<bool>,
    pub warning_level_m: Option<f64>,
    pub critical_level_m: Option<f64>,
    pub critical_level_msl: Option<f64>,
    pub basin_name: Option<String>,
    pub agency_name: Option<String>,
}

impl_record!(WaterGateStation {
    name,
    lat,
    lng,
    station_oldcode,
    left_bank,
    right_bank,
    is_key_station,
    warning_level_m,
    critical_level_m,
    critical_level_msl,
    basin_name,
    agency_name,
});

/// Upstream/downstream levels and pump/floodgate state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterGateObservation {
    pub watergate_in: Option<f64>,
    pub watergate_out: Option<f64>,
    pub watergate_datetime_in: Option<String>,
    pub watergate_datetime_out: Option<String>,
    pub pump_on: Option<i64>,
    pub pump: Option<i64>,
    pub floodgate_open: Option<i64>,
    pub floodgate: Option<i64>,
    pub floodgate_height: Option<f64>,
}

impl_record!(WaterGateObservation {
    watergate_in,
    watergate_out,
    watergate_datetime_in,
    watergate_datetime_out,
    pump_on,
    pump,
    floodgate_open,
    floodgate,
    floodgate_height,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterGateSource {
    Load,
}

impl fmt::Display for WaterGateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SOURCE_TAG)
    }
}

pub struct WaterGate;

impl Domain for WaterGate {
    const KIND: DomainKind = DomainKind::WaterGate;
    const KEY_COLUMN: &'static str = "id";
    // Gate readings are only kept for gates with a location.
    const OBSERVATION_NEEDS_STATION: bool = true;

    type Source = WaterGateSource;
    type Station = WaterGateStation;
    type Observation = WaterGateObservation;

    fn parse_source(tag: &str) -> Option<Self::Source> {
        (tag == SOURCE_TAG).then_some(WaterGateSource::Load)
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

        let station = WaterGateStation {
            name: probe.text(telemetry::NAME),
            lat: probe.number(telemetry::LAT),
            lng: probe.number(telemetry::LNG),
            station_oldcode: probe.text(telemetry::OLDCODE),
            left_bank: probe.number(telemetry::LEFT_BANK),
            right_bank: probe.number(telemetry::RIGHT_BANK),
            is_key_station: probe.flag(telemetry::IS_KEY_STATION),
            warning_level_m: probe.number(telemetry::WARNING_LEVEL_M),
            critical_level_m: probe.number(telemetry::CRITICAL_LEVEL_M),
            critical_level_msl: probe.number(telemetry::CRITICAL_LEVEL_MSL),
            basin_name: probe.text(telemetry::BASIN_NAME),
            agency_name: probe.text(telemetry::AGENCY_NAME),
        };
        let admitted = station.lat.is_some() && station.lng.is_some();

        let observation = WaterGateObservation {
            watergate_in: probe.number(paths::WATERGATE_IN),
            watergate_out: probe.number(paths::WATERGATE_OUT),
            watergate_datetime_in: probe.text(paths::DATETIME_IN),
            watergate_datetime_out: probe.text(paths::DATETIME_OUT),
            pump_on: probe.integer(paths::PUMP_ON),
            pump: probe.integer(paths::PUMP),
            floodgate_open: probe.integer(paths::FLOODGATE_OPEN),
            floodgate: probe.integer(paths::FLOODGATE),
            floodgate_height: probe.number(paths::FLOODGATE_HEIGHT),
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
    use crate::aggregate::aggregate;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_normalize_gate_item() {
        let raw = json!({
            "station": {
                "id": "88",
                "tele_station_name": {"th": "ประตูระบายน้ำคลองด่าน"},
                "tele_station_lat": "13.52",
                "tele_station_long": "100.84",
                "is_key_station": 0
            },
            "watergate_in": 0.42,
            "watergate_out": -0.15,
            "watergate_datetime_in": "2024-10-01 06:00",
            "pump_on": 3,
            "pump": 6,
            "floodgate_open": "1",
            "floodgate_height": null
        });

        let normalized = WaterGate::normalize(WaterGateSource::Load, &raw).unwrap();
        assert_eq!(normalized.key, StationKey::Id(88));

        let station = normalized.station.unwrap();
        assert_eq!(station.lat, Some(13.52));
        assert_eq!(station.is_key_station, Some(false));
        assert_eq!(station.basin_name, None);

        let obs = normalized.observation;
        assert_eq!(obs.pump_on, Some(3));
        assert_eq!(obs.floodgate_open, Some(1));
        assert_eq!(obs.floodgate_height, None);
        assert_eq!(obs.watergate_out, Some(-0.15));
    }

    #[test]
    fn test_gate_without_coordinates_is_dropped_whole() {
        let raw = json!({"station": {"id": 5}, "pump_on": 1});
        let normalized = WaterGate::normalize(WaterGateSource::Load, &raw).unwrap();
        assert!(normalized.station.is_none());

        let collected_at = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let feeds = vec![Feed::new(SOURCE_TAG, vec![raw])];
        let aggregation = aggregate::<WaterGate>(&feeds, collected_at);

        assert!(aggregation.stations.is_empty());
        assert!(aggregation.observations.is_empty());
        assert_eq!(aggregation.quality.missing_locations(), 1);
    }
}
