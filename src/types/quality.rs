//! Data-quality events recorded while folding feeds into registries.
//!
//! These are never errors: the offending item is dropped or partially used,
//! and the event is kept so callers can assert on counts.

use crate::domains::DomainKind;
use crate::types::station_key::StationKey;
use std::fmt;

/// A non-fatal problem found in one raw item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQualityEvent {
    /// No usable identity key could be extracted; the item was dropped.
    MissingKey { source: String },
    /// The feed tag has no handler in this domain; the item was ignored.
    UnhandledSource { source: String, key: StationKey },
    /// The item lacked the location data a station record requires. The
    /// observation was still registered, except in domains that drop such
    /// items whole.
    MissingLocation { source: String, key: StationKey },
    /// A later source disagreed with an already resolved value. The first
    /// value was kept.
    FieldConflict {
        source: String,
        key: StationKey,
        field: &'static str,
    },
}

impl fmt::Display for DataQualityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityEvent::MissingKey { source } => {
                write!(f, "item without identity key in {}", source)
            }
            DataQualityEvent::UnhandledSource { source, key } => {
                write!(f, "no handler for source {} (key {})", source, key)
            }
            DataQualityEvent::MissingLocation { source, key } => {
                write!(f, "station {} in {} has no usable location", key, source)
            }
            DataQualityEvent::FieldConflict { source, key, field } => write!(
                f,
                "{} disagrees on {} for {}; keeping first value",
                source, field, key
            ),
        }
    }
}

/// Every data-quality event seen while aggregating one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub domain: DomainKind,
    pub events: Vec<DataQualityEvent>,
}

impl QualityReport {
    pub fn new(domain: DomainKind) -> Self {
        Self {
            domain,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: DataQualityEvent) {
        match &event {
            DataQualityEvent::FieldConflict { .. } => log::debug!("{}: {}", self.domain, event),
            _ => log::warn!("{}: {}", self.domain, event),
        }
        self.events.push(event);
    }

    /// Items dropped because no key could be extracted.
    pub fn missing_keys(&self) -> usize {
        self.count(|e| matches!(e, DataQualityEvent::MissingKey { .. }))
    }

    /// Items ignored because their feed tag had no handler.
    pub fn unhandled(&self) -> usize {
        self.count(|e| matches!(e, DataQualityEvent::UnhandledSource { .. }))
    }

    /// Station records skipped for lack of location data.
    pub fn missing_locations(&self) -> usize {
        self.count(|e| matches!(e, DataQualityEvent::MissingLocation { .. }))
    }

    pub fn conflicts(&self) -> usize {
        self.count(|e| matches!(e, DataQualityEvent::FieldConflict { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.events.is_empty()
    }

    fn count(&self, predicate: impl Fn(&DataQualityEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}
