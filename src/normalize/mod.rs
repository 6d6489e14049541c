//! Raw feed normalization: turning one loosely shaped API item into a typed
//! candidate station record and observation record.
//!
//! The per-domain adapters live next to their record types in
//! [`crate::domains`]; this module holds the shared lookup machinery.

pub mod paths;
pub mod probe;
pub mod value;

use crate::types::station_key::StationKey;
use serde_json::Value;

/// One source feed: the source-type tag and its raw items, in arrival order.
///
/// A feed whose retrieval failed upstream should be passed as an empty feed;
/// the core does not distinguish the two.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feed {
    pub tag: String,
    pub items: Vec<Value>,
}

impl Feed {
    pub fn new(tag: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            tag: tag.into(),
            items,
        }
    }

    /// Builds a feed from the array found at `envelope` (a dotted path) inside
    /// a response body. Anything other than an array there yields an empty
    /// feed.
    pub fn from_envelope(tag: impl Into<String>, response: &Value, envelope: &str) -> Self {
        let items = probe::Probe::new(response)
            .resolve(envelope)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self::new(tag, items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The flat candidate extracted from one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<S, O> {
    pub key: StationKey,
    /// `None` when the item lacks the data a station record requires; the
    /// observation is still usable.
    pub station: Option<S>,
    pub observation: O,
}
