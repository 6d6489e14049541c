use crate::aggregate::merge::Record;
use crate::types::station_key::StationKey;
use crate::types::table::{Row, Table};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub const COLLECTED_AT_COLUMN: &str = "collected_at";

/// A registry entry: the merged record and when it was first created.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<R> {
    pub collected_at: DateTime<Utc>,
    pub record: R,
}

/// Outcome of one [`Registry::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    /// The key was new; a null record was created and filled.
    Created,
    /// The key existed; absent fields were filled. Lists fields whose
    /// incoming value disagreed with the kept one.
    Updated { conflicts: Vec<&'static str> },
}

impl Upsert {
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created)
    }
}

/// Key → record mapping with create-if-absent and non-clobbering merge.
///
/// Keys are unique and iterate in key order, which makes every table built
/// from a registry deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<R> {
    entries: BTreeMap<StationKey, Entry<R>>,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R: Record> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or merges `record` under `key`.
    ///
    /// On first sight the entry starts as `R::default()` (all fields null)
    /// stamped with `collected_at`. Every sighting then fills only fields that
    /// are still null; a present value is never replaced, so repeating an
    /// upsert changes nothing.
    pub fn upsert(&mut self, key: StationKey, record: R, collected_at: DateTime<Utc>) -> Upsert {
        match self.entries.get_mut(&key) {
            Some(entry) => Upsert::Updated {
                conflicts: entry.record.merge(record),
            },
            None => {
                let mut fresh = R::default();
                fresh.merge(record);
                self.entries.insert(
                    key,
                    Entry {
                        collected_at,
                        record: fresh,
                    },
                );
                Upsert::Created
            }
        }
    }

    pub fn get(&self, key: &StationKey) -> Option<&R> {
        self.entries.get(key).map(|entry| &entry.record)
    }

    pub fn entry(&self, key: &StationKey) -> Option<&Entry<R>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &StationKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StationKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StationKey, &Entry<R>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the registry as a table: key column, record fields, then
    /// `collected_at`.
    pub fn to_table(&self, name: &str, key_column: &str) -> Result<Table, serde_json::Error> {
        let mut columns = vec![key_column.to_string()];
        columns.extend(record_columns::<R>()?);
        columns.push(COLLECTED_AT_COLUMN.to_string());

        let mut table = Table::new(name, columns);
        for (key, entry) in self.iter() {
            let mut row = Row::new();
            row.insert(key_column.to_string(), key.to_value());
            row.extend(record_fields(&entry.record)?);
            row.insert(
                COLLECTED_AT_COLUMN.to_string(),
                timestamp_value(&entry.collected_at),
            );
            table.push(row);
        }
        Ok(table)
    }
}

/// Column names of a record type, in declaration order.
pub(crate) fn record_columns<R: Record>() -> Result<Vec<String>, serde_json::Error> {
    Ok(record_fields(&R::default())?.into_iter().map(|(k, _)| k).collect())
}

/// A record flattened to ordered `(column, value)` pairs.
pub(crate) fn record_fields<R: Record>(record: &R) -> Result<Row, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Row::new()),
    }
}

pub(crate) fn timestamp_value(at: &DateTime<Utc>) -> Value {
    Value::from(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}
