//! The four telemetry domains and their source adapters.
//!
//! Each domain fixes its feed tags, its key column and the typed records its
//! registries hold. The adapters translate one raw item into a
//! [`Normalized`] candidate using the lookup tables in
//! [`crate::normalize::paths`].

pub mod dam;
pub mod rainfall;
pub mod water_gate;
pub mod water_level;

use crate::aggregate::merge::Record;
use crate::normalize::{Feed, Normalized};
use crate::types::station_key::StationKey;
use serde_json::Value;
use std::fmt;

pub use dam::Dam;
pub use rainfall::Rainfall;
pub use water_gate::WaterGate;
pub use water_level::WaterLevel;

/// Identifies a domain in logs, reports and table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    WaterLevel,
    WaterGate,
    Rainfall,
    Dam,
}

impl DomainKind {
    /// Snake-case name used as the table name stem.
    pub fn slug(&self) -> &'static str {
        match self {
            DomainKind::WaterLevel => "water_level",
            DomainKind::WaterGate => "water_gate",
            DomainKind::Rainfall => "rainfall",
            DomainKind::Dam => "dam",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A telemetry domain: its sources, identity rule and record types.
pub trait Domain {
    const KIND: DomainKind;
    /// Column that carries the [`StationKey`] in every table of this domain.
    const KEY_COLUMN: &'static str;
    /// Whether a disagreeing observation value is a data-quality event. Off
    /// where several feeds legitimately report different readings for the
    /// same key.
    const OBSERVATION_CONFLICTS: bool = true;
    /// Whether an item whose station record is not admitted is dropped
    /// whole, observation included.
    const OBSERVATION_NEEDS_STATION: bool = false;

    /// The source types (feed tags) this domain has handlers for.
    type Source: Copy + fmt::Debug + fmt::Display;
    type Station: Record;
    type Observation: Record;

    /// Maps a feed tag to a handled source, or `None` when no handler exists.
    fn parse_source(tag: &str) -> Option<Self::Source>;

    /// Extracts the identity key, independent of the source type.
    fn key(item: &Value) -> Option<StationKey>;

    /// Extracts the candidate records. `None` when the item has no usable key.
    fn normalize(
        source: Self::Source,
        item: &Value,
    ) -> Option<Normalized<Self::Station, Self::Observation>>;

    /// Splits one upstream response body into the feeds it contains.
    ///
    /// `tag` names the endpoint the body came from; domains whose endpoint
    /// bundles several feeds ignore it.
    fn feeds_from_response(tag: &str, response: &Value) -> Vec<Feed>;
}
