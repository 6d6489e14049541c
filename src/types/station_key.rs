//! Identity keys used to colocate records about the same station or dam
//! across feeds.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// The identity of a station within one domain's registry.
///
/// Telemetry stations carry a numeric id, which upstream sometimes renders as
/// a string. Dams have no numeric id and are keyed by their Thai display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StationKey {
    /// Numeric station id (`station.id`, `tele_station_id`).
    Id(i64),
    /// Non-numeric station code, kept verbatim.
    Code(String),
    /// Display name, used where no id exists.
    Name(String),
}

impl StationKey {
    /// Builds an id key from a JSON scalar.
    ///
    /// Integers and integer-valued strings become [`StationKey::Id`], any other
    /// non-empty string or number becomes [`StationKey::Code`], so `1024.5`
    /// and `"1024.5"` share a key. Nulls, empty strings, booleans and
    /// containers yield `None`.
    pub fn from_id_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                    .map(StationKey::Id)
                    .unwrap_or_else(|| StationKey::Code(n.to_string())),
            ),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else if let Ok(id) = trimmed.parse::<i64>() {
                    Some(StationKey::Id(id))
                } else {
                    Some(StationKey::Code(trimmed.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Builds a name key. Blank names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| StationKey::Name(trimmed.to_string()))
    }

    /// The key as a JSON scalar, the way it is written into table rows.
    pub fn to_value(&self) -> Value {
        match self {
            StationKey::Id(id) => Value::from(*id),
            StationKey::Code(code) => Value::from(code.as_str()),
            StationKey::Name(name) => Value::from(name.as_str()),
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationKey::Id(id) => write!(f, "{}", id),
            StationKey::Code(code) => write!(f, "{}", code),
            StationKey::Name(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for StationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StationKey::Id(id) => serializer.serialize_i64(*id),
            StationKey::Code(code) => serializer.serialize_str(code),
            StationKey::Name(name) => serializer.serialize_str(name),
        }
    }
}
