//! Field lookup tables, one block per source family.
//!
//! Each constant is the ordered fallback chain for one logical field. Keeping
//! them declarative lets the adapters stay free of ad hoc conditionals.

use crate::normalize::probe::Fallback;

// ---------------------------------------------------------------------------
// Telemetry stations (water level, water gate)
// ---------------------------------------------------------------------------

pub mod telemetry {
    use super::Fallback;

    pub const ID: Fallback = &["station.id"];
    pub const NAME: Fallback = &["station.tele_station_name.th"];
    pub const LAT: Fallback = &["station.tele_station_lat"];
    pub const LNG: Fallback = &["station.tele_station_long"];
    pub const OLDCODE: Fallback = &["station.tele_station_oldcode"];
    pub const LEFT_BANK: Fallback = &["station.left_bank"];
    pub const RIGHT_BANK: Fallback = &["station.right_bank"];
    pub const MIN_BANK: Fallback = &["station.min_bank"];
    pub const GROUND_LEVEL: Fallback = &["station.ground_level"];
    pub const OFFSET: Fallback = &["station.offset"];
    pub const IS_KEY_STATION: Fallback = &["station.is_key_station"];
    pub const WARNING_LEVEL_M: Fallback = &["station.warning_level_m"];
    pub const CRITICAL_LEVEL_M: Fallback = &["station.critical_level_m"];
    pub const CRITICAL_LEVEL_MSL: Fallback = &["station.critical_level_msl"];
    pub const BASIN_NAME: Fallback = &["basin.basin_name.th"];
    pub const AGENCY_NAME: Fallback = &["agency.agency_name.th"];
}

pub mod water_level {
    use super::Fallback;

    pub const DATETIME: Fallback = &["waterlevel_datetime"];
    pub const WATERLEVEL_M: Fallback = &["waterlevel_m"];
    pub const WATERLEVEL_MSL: Fallback = &["waterlevel_msl"];
    pub const WATERLEVEL_MSL_PREVIOUS: Fallback = &["waterlevel_msl_previous"];
    pub const FLOW_RATE: Fallback = &["flow_rate"];
    pub const DISCHARGE: Fallback = &["discharge"];
    pub const STORAGE_PERCENT: Fallback = &["storage_percent"];
    pub const SITUATION_LEVEL: Fallback = &["situation_level"];

    pub const ENVELOPE: &str = "waterlevel_data.data";
}

pub mod water_gate {
    use super::Fallback;

    pub const WATERGATE_IN: Fallback = &["watergate_in"];
    pub const WATERGATE_OUT: Fallback = &["watergate_out"];
    pub const DATETIME_IN: Fallback = &["watergate_datetime_in"];
    pub const DATETIME_OUT: Fallback = &["watergate_datetime_out"];
    pub const PUMP_ON: Fallback = &["pump_on"];
    pub const PUMP: Fallback = &["pump"];
    pub const FLOODGATE_OPEN: Fallback = &["floodgate_open"];
    pub const FLOODGATE: Fallback = &["floodgate"];
    pub const FLOODGATE_HEIGHT: Fallback = &["floodgate_height"];

    pub const ENVELOPE: &str = "watergate_data.data";
}

// ---------------------------------------------------------------------------
// Rainfall: the seven sub-feeds disagree on nesting, so every station field
// probes the nested `station.*` location before the flattened one.
// ---------------------------------------------------------------------------

pub mod rainfall {
    use super::Fallback;

    pub const ID: Fallback = &["station.id", "tele_station_id"];
    pub const NAME: Fallback = &["station.tele_station_name.th", "tele_station_name.th"];
    pub const LAT: Fallback = &["station.tele_station_lat", "tele_station_lat"];
    pub const LNG: Fallback = &["station.tele_station_long", "tele_station_long"];
    pub const OLDCODE: Fallback = &["station.tele_station_oldcode", "tele_station_oldcode"];
    pub const BASIN_CODE: Fallback = &["basin.basin_code", "station.basin_id", "basin_id"];
    pub const SUB_BASIN_CODE: Fallback = &["station.sub_basin_id", "sub_basin_id"];
    pub const BASIN_NAME: Fallback = &["basin.basin_name.th"];
    pub const AGENCY_NAME: Fallback = &["agency.agency_name.th", "agency_name.th"];

    pub const RAIN_24H: Fallback = &["rain_24h"];
    pub const RAIN_3D: Fallback = &["rain_3d"];
    pub const RAIN_7D: Fallback = &["rain_7d"];
    pub const RAINFALL_VALUE: Fallback = &["rainfall_value"];
    pub const RAINFALL_DATETIME: Fallback = &["rainfall_datetime"];
    pub const START_DATE: Fallback = &["rainfall_start_date"];
    pub const END_DATE: Fallback = &["rainfall_end_date"];

    pub const ENVELOPE: &str = "data";
}

pub mod dam {
    use super::Fallback;

    pub const NAME: Fallback = &["dam.dam_name.th"];
    pub const LAT: Fallback = &["dam.dam_lat"];
    pub const LNG: Fallback = &["dam.dam_long"];
    pub const OLDCODE: Fallback = &["dam.dam_oldcode"];
    pub const MIN_STORAGE: Fallback = &["dam.min_storage"];
    pub const MAX_STORAGE: Fallback = &["dam.max_storage"];
    pub const NORMAL_STORAGE: Fallback = &["dam.normal_storage"];
    pub const AGENCY: Fallback = &["agency.agency_name.th"];
    pub const BASIN: Fallback = &["basin.basin_name.th"];
    pub const CCTV: Fallback = &["cctv.url"];

    pub const DATE: Fallback = &["dam_date"];
    pub const STORAGE: Fallback = &["dam_storage"];
    pub const STORAGE_PERCENT: Fallback = &["dam_storage_percent"];
    pub const INFLOW: Fallback = &["dam_inflow"];
    pub const USES_WATER: Fallback = &["dam_uses_water"];
    pub const INFLOW_ACC_PERCENT: Fallback = &["dam_inflow_acc_percent"];
    pub const USES_WATER_PERCENT: Fallback = &["dam_uses_water_percent"];
    pub const LEVEL: Fallback = &["dam_level"];
    pub const RELEASED: Fallback = &["dam_released"];
    pub const SPILLED: Fallback = &["dam_spilled"];
    pub const LOSSES: Fallback = &["dam_losses"];
    pub const EVAP: Fallback = &["dam_evap"];
    pub const INFLOW_AVG: Fallback = &["dam_inflow_avg"];
    pub const INFLOW_ACC: Fallback = &["dam_inflow_acc"];
    pub const USES_WATER_PERCENT_CALC: Fallback = &["dam_uses_water_percent_calc"];
    pub const RELEASED_ACC: Fallback = &["dam_released_acc"];

    /// Parent of the per-size arrays (`dam_hourly`, `dam_daily`, `dam_medium`).
    pub const ENVELOPE: &str = "data";
}
