//! Rain gauges, fed by seven sub-feeds that disagree on nesting.
//!
//! Every sub-feed carries the same station block, so the station record is
//! extracted identically for all of them. The observation record spans the
//! fields of all seven; each sub-feed only fills its own pair (or triple).

use crate::aggregate::merge::impl_record;
use crate::domains::{Domain, DomainKind};
use crate::normalize::paths::rainfall as paths;
use crate::normalize::probe::Probe;
use crate::normalize::{Feed, Normalized};
use crate::types::station_key::StationKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RainfallStation {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub station_oldcode: Option<String>,
    /// Always two digits, e.g. `"05"`.
    pub basin_code: Option<String>,
    pub sub_basin_code: Option<String>,
    pub basin_name: Option<String>,
    pub agency_name: Option<String>,
}

impl_record!(RainfallStation {
    name,
    lat,
    lng,
    station_oldcode,
    basin_code,
    sub_basin_code,
    basin_name,
    agency_name,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RainfallObservation {
    pub rain_24h_value: Option<f64>,
    pub rain_24h_datetime: Option<String>,
    pub rain_daily_value: Option<f64>,
    pub rain_daily_datetime: Option<String>,
    pub rain_yesterday_value: Option<f64>,
    pub rain_yesterday_datetime: Option<String>,
    pub rain_3days_value: Option<f64>,
    pub rain_3days_startdate: Option<String>,
    pub rain_3days_enddate: Option<String>,
    pub rain_7days_value: Option<f64>,
    pub rain_7days_startdate: Option<String>,
    pub rain_7days_enddate: Option<String>,
    pub rain_monthly_value: Option<f64>,
    pub rain_monthly_datetime: Option<String>,
    pub rain_yearly_value: Option<f64>,
    pub rain_yearly_datetime: Option<String>,
}

impl_record!(RainfallObservation {
    rain_24h_value,
    rain_24h_datetime,
    rain_daily_value,
    rain_daily_datetime,
    rain_yesterday_value,
    rain_yesterday_datetime,
    rain_3days_value,
    rain_3days_startdate,
    rain_3days_enddate,
    rain_7days_value,
    rain_7days_startdate,
    rain_7days_enddate,
    rain_monthly_value,
    rain_monthly_datetime,
    rain_yearly_value,
    rain_yearly_datetime,
});

/// The seven rainfall sub-feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RainfallSource {
    Last24Hours,
    Today,
    Yesterday,
    ThreeDays,
    SevenDays,
    Monthly,
    Yearly,
}

impl RainfallSource {
    pub const ALL: [RainfallSource; 7] = [
        RainfallSource::Last24Hours,
        RainfallSource::Today,
        RainfallSource::Yesterday,
        RainfallSource::ThreeDays,
        RainfallSource::SevenDays,
        RainfallSource::Monthly,
        RainfallSource::Yearly,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            RainfallSource::Last24Hours => "rainfall_24h",
            RainfallSource::Today => "rainfall_daily",
            RainfallSource::Yesterday => "rainfall_yesterday",
            RainfallSource::ThreeDays => "rainfall_3days",
            RainfallSource::SevenDays => "rainfall_7days",
            RainfallSource::Monthly => "rainfall_monthly",
            RainfallSource::Yearly => "rainfall_yearly",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.tag() == tag)
    }

    /// Builds the observation fragment this sub-feed owns. Every other field
    /// stays null.
    fn observation(&self, probe: &Probe) -> RainfallObservation {
        let mut obs = RainfallObservation::default();
        match self {
            RainfallSource::Last24Hours => {
                obs.rain_24h_value = probe.number(paths::RAIN_24H);
                obs.rain_24h_datetime = probe.text(paths::RAINFALL_DATETIME);
            }
            RainfallSource::Today => {
                obs.rain_daily_value = probe.number(paths::RAINFALL_VALUE);
                obs.rain_daily_datetime = probe.text(paths::RAINFALL_DATETIME);
            }
            RainfallSource::Yesterday => {
                obs.rain_yesterday_value = probe.number(paths::RAINFALL_VALUE);
                obs.rain_yesterday_datetime = probe.text(paths::RAINFALL_DATETIME);
            }
            RainfallSource::ThreeDays => {
                obs.rain_3days_value = probe.number(paths::RAIN_3D);
                obs.rain_3days_startdate = probe.text(paths::START_DATE);
                obs.rain_3days_enddate = probe.text(paths::END_DATE);
            }
            RainfallSource::SevenDays => {
                obs.rain_7days_value = probe.number(paths::RAIN_7D);
                obs.rain_7days_startdate = probe.text(paths::START_DATE);
                obs.rain_7days_enddate = probe.text(paths::END_DATE);
            }
            RainfallSource::Monthly => {
                obs.rain_monthly_value = probe.number(paths::RAINFALL_VALUE);
                obs.rain_monthly_datetime = probe.text(paths::RAINFALL_DATETIME);
            }
            RainfallSource::Yearly => {
                obs.rain_yearly_value = probe.number(paths::RAINFALL_VALUE);
                obs.rain_yearly_datetime = probe.text(paths::RAINFALL_DATETIME);
            }
        }
        obs
    }
}

impl fmt::Display for RainfallSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

pub struct Rainfall;

impl Domain for Rainfall {
    const KIND: DomainKind = DomainKind::Rainfall;
    const KEY_COLUMN: &'static str = "id";

    type Source = RainfallSource;
    type Station = RainfallStation;
    type Observation = RainfallObservation;

    fn parse_source(tag: &str) -> Option<Self::Source> {
        RainfallSource::from_tag(tag)
    }

    fn key(item: &Value) -> Option<StationKey> {
        let probe = Probe::new(item);
        paths::ID
            .iter()
            .find_map(|path| probe.resolve(path).and_then(StationKey::from_id_value))
    }

    fn normalize(
        source: Self::Source,
        item: &Value,
    ) -> Option<Normalized<Self::Station, Self::Observation>> {
        let key = Self::key(item)?;
        let probe = Probe::new(item);

        let station = RainfallStation {
            name: probe.text(paths::NAME),
            lat: probe.number(paths::LAT),
            lng: probe.number(paths::LNG),
            station_oldcode: probe.text(paths::OLDCODE),
            basin_code: probe.basin_code(paths::BASIN_CODE),
            sub_basin_code: probe.text(paths::SUB_BASIN_CODE),
            basin_name: probe.text(paths::BASIN_NAME),
            agency_name: probe.text(paths::AGENCY_NAME),
        };

        Some(Normalized {
            key,
            station: Some(station),
            observation: source.observation(&probe),
        })
    }

    fn feeds_from_response(tag: &str, response: &Value) -> Vec<Feed> {
        vec![Feed::from_envelope(tag, response, paths::ENVELOPE)]
    }
}
