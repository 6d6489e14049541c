//! Reservoirs, keyed by their Thai display name.
//!
//! The dam endpoint bundles three feeds in one body: large reservoirs reported
//! hourly and daily, and medium reservoirs. Each feed fills a different subset
//! of the observation fields.

use crate::aggregate::merge::impl_record;
use crate::domains::{Domain, DomainKind};
use crate::normalize::paths::dam as paths;
use crate::normalize::probe::Probe;
use crate::normalize::{Feed, Normalized};
use crate::types::station_key::StationKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const LARGE_RESERVOIR: &str = "อ่างขนาดใหญ่";
pub const MEDIUM_RESERVOIR: &str = "อ่างขนาดกลาง";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamStation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub oldcode: Option<String>,
    pub min_storage: Option<f64>,
    pub max_storage: Option<f64>,
    pub normal_storage: Option<f64>,
    pub agency: Option<String>,
    pub basin: Option<String>,
    pub cctv: Option<String>,
    /// [`LARGE_RESERVOIR`] or [`MEDIUM_RESERVOIR`].
    pub station_type: Option<String>,
}

impl_record!(DamStation {
    lat,
    lng,
    oldcode,
    min_storage,
    max_storage,
    normal_storage,
    agency,
    basin,
    cctv,
    station_type,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamObservation {
    pub datetime: Option<String>,
    pub storage: Option<f64>,
    pub storage_percent: Option<f64>,
    pub inflow: Option<f64>,
    pub uses_water: Option<f64>,
    /// Tag of the first feed that reported this dam.
    #[serde(rename = "type")]
    pub dam_type: Option<String>,
    pub inflow_acc_percent: Option<f64>,
    pub uses_water_percent: Option<f64>,
    pub level: Option<f64>,
    pub released: Option<f64>,
    pub spilled: Option<f64>,
    pub losses: Option<f64>,
    pub evap: Option<f64>,
    pub inflow_avg: Option<f64>,
    pub inflow_acc: Option<f64>,
    pub uses_water_percent_calc: Option<f64>,
    pub released_acc: Option<f64>,
}

impl_record!(DamObservation {
    datetime,
    storage,
    storage_percent,
    inflow,
    uses_water,
    dam_type,
    inflow_acc_percent,
    uses_water_percent,
    level,
    released,
    spilled,
    losses,
    evap,
    inflow_avg,
    inflow_acc,
    uses_water_percent_calc,
    released_acc,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamSource {
    Hourly,
    Daily,
    Medium,
}

impl DamSource {
    pub const ALL: [DamSource; 3] = [DamSource::Hourly, DamSource::Daily, DamSource::Medium];

    pub fn tag(&self) -> &'static str {
        match self {
            DamSource::Hourly => "dam_hourly",
            DamSource::Daily => "dam_daily",
            DamSource::Medium => "dam_medium",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.tag() == tag)
    }

    pub fn station_type(&self) -> &'static str {
        match self {
            DamSource::Hourly | DamSource::Daily => LARGE_RESERVOIR,
            DamSource::Medium => MEDIUM_RESERVOIR,
        }
    }

    fn observation(&self, probe: &Probe) -> DamObservation {
        let mut obs = DamObservation {
            datetime: probe.text(paths::DATE),
            storage: probe.number(paths::STORAGE),
            storage_percent: probe.number(paths::STORAGE_PERCENT),
            inflow: probe.number(paths::INFLOW),
            uses_water: probe.number(paths::USES_WATER),
            dam_type: Some(self.tag().to_string()),
            ..Default::default()
        };

        if matches!(self, DamSource::Hourly | DamSource::Daily) {
            obs.inflow_acc_percent = probe.number(paths::INFLOW_ACC_PERCENT);
            obs.uses_water_percent = probe.number(paths::USES_WATER_PERCENT);
            obs.level = probe.number(paths::LEVEL);
            obs.released = probe.number(paths::RELEASED);
            obs.spilled = probe.number(paths::SPILLED);
            obs.losses = probe.number(paths::LOSSES);
            obs.evap = probe.number(paths::EVAP);
        }
        if *self == DamSource::Daily {
            obs.inflow_avg = probe.number(paths::INFLOW_AVG);
            obs.inflow_acc = probe.number(paths::INFLOW_ACC);
            obs.uses_water_percent_calc = probe.number(paths::USES_WATER_PERCENT_CALC);
            obs.released_acc = probe.number(paths::RELEASED_ACC);
        }
        obs
    }
}

impl fmt::Display for DamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

pub struct Dam;

impl Domain for Dam {
    const KIND: DomainKind = DomainKind::Dam;
    const KEY_COLUMN: &'static str = "name";
    // Large dams appear in both the hourly and the daily feed with different
    // readings. Name collisions still surface through the station record.
    const OBSERVATION_CONFLICTS: bool = false;

    type Source = DamSource;
    type Station = DamStation;
    type Observation = DamObservation;

    fn parse_source(tag: &str) -> Option<Self::Source> {
        DamSource::from_tag(tag)
    }

    fn key(item: &Value) -> Option<StationKey> {
        Probe::new(item)
            .text(paths::NAME)
            .and_then(|name| StationKey::from_name(&name))
    }

    fn normalize(
        source: Self::Source,
        item: &Value,
    ) -> Option<Normalized<Self::Station, Self::Observation>> {
        let key = Self::key(item)?;
        let probe = Probe::new(item);

        let station = DamStation {
            lat: probe.number(paths::LAT),
            lng: probe.number(paths::LNG),
            oldcode: probe.text(paths::OLDCODE),
            min_storage: probe.number(paths::MIN_STORAGE),
            max_storage: probe.number(paths::MAX_STORAGE),
            normal_storage: probe.number(paths::NORMAL_STORAGE),
            agency: probe.text(paths::AGENCY),
            basin: probe.text(paths::BASIN),
            cctv: probe.text(paths::CCTV),
            station_type: Some(source.station_type().to_string()),
        };

        Some(Normalized {
            key,
            station: Some(station),
            observation: source.observation(&probe),
        })
    }

    fn feeds_from_response(_tag: &str, response: &Value) -> Vec<Feed> {
        DamSource::ALL
            .iter()
            .map(|source| {
                let envelope = format!("{}.{}", paths::ENVELOPE, source.tag());
                Feed::from_envelope(source.tag(), response, &envelope)
            })
            .collect()
    }
}
