use crate::normalize::value::{as_bool, as_f64, as_i64, as_text, pad_basin_code};
use serde_json::Value;

/// An ordered list of dotted lookup paths for one logical field.
///
/// Paths are tried in order and the first one that resolves to a usable value
/// wins, e.g. `&["station.tele_station_lat", "tele_station_lat"]` prefers the
/// nested location and falls back to the flattened one.
pub type Fallback = &'static [&'static str];

/// Read-only view over one raw feed item.
///
/// A path that does not resolve (missing key, null, or a non-object along the
/// way) yields `None`; it is never an error.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    item: &'a Value,
}

impl<'a> Probe<'a> {
    pub fn new(item: &'a Value) -> Self {
        Self { item }
    }

    /// Resolves a single dotted path. Null leaves count as absent.
    pub fn resolve(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.item;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    }

    pub fn first(&self, chain: Fallback) -> Option<&'a Value> {
        chain.iter().find_map(|path| self.resolve(path))
    }

    /// Applies `coerce` along the chain and keeps the first success, so a
    /// malformed value at a preferred path does not mask a usable fallback.
    fn first_as<T>(&self, chain: Fallback, coerce: impl Fn(&Value) -> Option<T>) -> Option<T> {
        chain
            .iter()
            .find_map(|path| self.resolve(path).and_then(&coerce))
    }

    pub fn text(&self, chain: Fallback) -> Option<String> {
        self.first_as(chain, as_text)
    }

    pub fn number(&self, chain: Fallback) -> Option<f64> {
        self.first_as(chain, as_f64)
    }

    pub fn integer(&self, chain: Fallback) -> Option<i64> {
        self.first_as(chain, as_i64)
    }

    pub fn flag(&self, chain: Fallback) -> Option<bool> {
        self.first_as(chain, as_bool)
    }

    /// A basin code rendered as two digits. Numeric codes are read as
    /// integers, so `5` and `5.0` both give `"05"`.
    pub fn basin_code(&self, chain: Fallback) -> Option<String> {
        self.first_as(chain, |value| match value {
            Value::Number(_) => as_i64(value).map(|code| code.to_string()),
            _ => as_text(value),
        })
        .map(pad_basin_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_tolerates_missing_nesting() {
        let item = json!({"station": {"id": 1}, "basin": null, "agency": "flat"});
        let probe = Probe::new(&item);

        assert_eq!(probe.resolve("station.id"), Some(&json!(1)));
        assert_eq!(probe.resolve("station.tele_station_name.th"), None);
        assert_eq!(probe.resolve("basin.basin_code"), None);
        assert_eq!(probe.resolve("agency.agency_name.th"), None);
    }

    #[test]
    fn test_fallback_prefers_earlier_paths() {
        let item = json!({
            "station": {"tele_station_lat": 13.1},
            "tele_station_lat": 14.2,
            "tele_station_long": 100.3
        });
        let probe = Probe::new(&item);
        let lat: Fallback = &["station.tele_station_lat", "tele_station_lat"];
        let lng: Fallback = &["station.tele_station_long", "tele_station_long"];

        assert_eq!(probe.number(lat), Some(13.1));
        assert_eq!(probe.number(lng), Some(100.3));
    }

    #[test]
    fn test_malformed_preferred_value_falls_through() {
        let item = json!({"station": {"tele_station_lat": "unknown"}, "tele_station_lat": "14.5"});
        let probe = Probe::new(&item);
        assert_eq!(
            probe.number(&["station.tele_station_lat", "tele_station_lat"]),
            Some(14.5)
        );
    }

    #[test]
    fn test_basin_code_is_padded_at_extraction() {
        let single = json!({"basin": {"basin_code": 5}});
        let float = json!({"basin": {"basin_code": 5.0}});
        let double = json!({"basin": {"basin_code": 12}});
        let absent = json!({"basin": {}});
        let chain: Fallback = &["basin.basin_code", "station.basin_id"];

        assert_eq!(Probe::new(&single).basin_code(chain), Some("05".to_string()));
        assert_eq!(Probe::new(&float).basin_code(chain), Some("05".to_string()));
        assert_eq!(Probe::new(&double).basin_code(chain), Some("12".to_string()));
        assert_eq!(Probe::new(&absent).basin_code(chain), None);
    }
}
