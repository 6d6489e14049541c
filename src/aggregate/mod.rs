//! Entity aggregation: folding (source, item) pairs into a station registry
//! and an observation registry for one domain.

pub mod merge;
pub mod registry;

use crate::domains::Domain;
use crate::normalize::{Feed, Normalized};
use crate::types::quality::{DataQualityEvent, QualityReport};
use crate::types::station_key::StationKey;
use crate::types::table::Table;
use chrono::{DateTime, Utc};
use log::info;
use registry::{Registry, Upsert};
use serde_json::Value;

/// The two registries of one domain plus every data-quality event seen while
/// building them.
pub struct Aggregation<D: Domain> {
    pub stations: Registry<D::Station>,
    pub observations: Registry<D::Observation>,
    pub quality: QualityReport,
    collected_at: DateTime<Utc>,
}

impl<D: Domain> Aggregation<D> {
    /// Empty registries. `collected_at` stamps every entry created in this run.
    pub fn new(collected_at: DateTime<Utc>) -> Self {
        Self {
            stations: Registry::new(),
            observations: Registry::new(),
            quality: QualityReport::new(D::KIND),
            collected_at,
        }
    }

    /// Reducer form of [`Aggregation::ingest`], for folding.
    pub fn apply(mut self, source: &str, item: &Value) -> Self {
        self.ingest(source, item);
        self
    }

    /// Normalizes one item from the feed tagged `source` and upserts it into
    /// both registries. Returns the key it was filed under, or `None` when the
    /// item was dropped.
    pub fn ingest(&mut self, source: &str, item: &Value) -> Option<StationKey> {
        let Some(kind) = D::parse_source(source) else {
            let event = match D::key(item) {
                Some(key) => DataQualityEvent::UnhandledSource {
                    source: source.to_string(),
                    key,
                },
                None => DataQualityEvent::MissingKey {
                    source: source.to_string(),
                },
            };
            self.quality.record(event);
            return None;
        };

        let Some(Normalized {
            key,
            station,
            observation,
        }) = D::normalize(kind, item)
        else {
            self.quality.record(DataQualityEvent::MissingKey {
                source: source.to_string(),
            });
            return None;
        };

        match station {
            Some(station) => {
                let outcome = self.stations.upsert(key.clone(), station, self.collected_at);
                self.record_conflicts(source, &key, outcome);
            }
            None => {
                self.quality.record(DataQualityEvent::MissingLocation {
                    source: source.to_string(),
                    key: key.clone(),
                });
                if D::OBSERVATION_NEEDS_STATION {
                    return None;
                }
            }
        }

        let outcome = self
            .observations
            .upsert(key.clone(), observation, self.collected_at);
        if D::OBSERVATION_CONFLICTS {
            self.record_conflicts(source, &key, outcome);
        }

        Some(key)
    }

    fn record_conflicts(&mut self, source: &str, key: &StationKey, outcome: Upsert) {
        if let Upsert::Updated { conflicts } = outcome {
            for field in conflicts {
                self.quality.record(DataQualityEvent::FieldConflict {
                    source: source.to_string(),
                    key: key.clone(),
                    field,
                });
            }
        }
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    /// The station registry as `<domain>_station`.
    pub fn station_table(&self) -> Result<Table, serde_json::Error> {
        self.stations
            .to_table(&format!("{}_station", D::KIND.slug()), D::KEY_COLUMN)
    }

    /// The observation registry as `<domain>_data`.
    pub fn observation_table(&self) -> Result<Table, serde_json::Error> {
        self.observations
            .to_table(&format!("{}_data", D::KIND.slug()), D::KEY_COLUMN)
    }
}

/// Left-folds every item of every feed, in order, into fresh registries.
pub fn aggregate<D: Domain>(feeds: &[Feed], collected_at: DateTime<Utc>) -> Aggregation<D> {
    let aggregation = feeds
        .iter()
        .flat_map(|feed| feed.items.iter().map(move |item| (feed.tag.as_str(), item)))
        .fold(Aggregation::<D>::new(collected_at), |acc, (source, item)| {
            acc.apply(source, item)
        });

    info!(
        "Aggregated {} feed(s) for {}: {} stations, {} observation records, {} data-quality events",
        feeds.len(),
        D::KIND,
        aggregation.stations.len(),
        aggregation.observations.len(),
        aggregation.quality.events.len()
    );
    aggregation
}
