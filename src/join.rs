//! Cross-source join of a domain's station and observation registries.

use crate::aggregate::merge::Record;
use crate::aggregate::registry::{
    record_columns, record_fields, timestamp_value, Registry, COLLECTED_AT_COLUMN,
};
use crate::aggregate::Aggregation;
use crate::domains::Domain;
use crate::types::table::{Row, Table};
use log::info;

/// Inner-joins `stations` and `observations` on their key.
///
/// Only keys present in both registries produce a row; the rest are dropped.
/// A row holds the key column, the station fields, the observation fields and
/// the station's `collected_at`. Should both records share a column name, the
/// station value is kept. Rows come out in key order.
pub fn inner_join<S: Record, O: Record>(
    name: &str,
    key_column: &str,
    stations: &Registry<S>,
    observations: &Registry<O>,
) -> Result<Table, serde_json::Error> {
    let mut columns = vec![key_column.to_string()];
    for column in record_columns::<S>()?
        .into_iter()
        .chain(record_columns::<O>()?)
    {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns.push(COLLECTED_AT_COLUMN.to_string());

    let mut table = Table::new(name, columns);
    for (key, station) in stations.iter() {
        let Some(observation) = observations.get(key) else {
            continue;
        };

        let mut row = Row::new();
        row.insert(key_column.to_string(), key.to_value());
        row.extend(record_fields(&station.record)?);
        for (column, value) in record_fields(observation)? {
            row.entry(column).or_insert(value);
        }
        row.insert(
            COLLECTED_AT_COLUMN.to_string(),
            timestamp_value(&station.collected_at),
        );
        table.push(row);
    }

    info!(
        "Joined {}: {} rows ({} stations, {} observation records)",
        name,
        table.len(),
        stations.len(),
        observations.len()
    );
    Ok(table)
}

/// Joins one domain's aggregation into `combined_<domain>`.
pub fn join<D: Domain>(aggregation: &Aggregation<D>) -> Result<Table, serde_json::Error> {
    inner_join(
        &format!("combined_{}", D::KIND.slug()),
        D::KEY_COLUMN,
        &aggregation.stations,
        &aggregation.observations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domains::{Dam, WaterLevel};
    use crate::normalize::Feed;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn gauge(id: i64, lat: Option<f64>) -> Value {
        json!({
            "station": {
                "id": id,
                "tele_station_name": {"th": "สถานี"},
                "tele_station_lat": lat,
                "tele_station_long": 100.5
            },
            "waterlevel_msl": 1.25
        })
    }

    #[test]
    fn test_join_keeps_only_keys_in_both_registries() {
        let collected_at = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        // Station 2 has no location, so only its observation is registered.
        let feeds = vec![Feed::new(
            "waterlevel_load",
            vec![gauge(1, Some(13.7)), gauge(2, None), gauge(3, Some(14.0))],
        )];
        let aggregation = aggregate::<WaterLevel>(&feeds, collected_at);
        assert_eq!(aggregation.observations.len(), 3);
        assert_eq!(aggregation.stations.len(), 2);

        let combined = join(&aggregation).unwrap();
        assert_eq!(combined.name, "combined_water_level");
        assert_eq!(combined.len(), 2);
        let ids: Vec<&Value> = combined.column("id");
        assert_eq!(ids, vec![&json!(1), &json!(3)]);
        assert_eq!(combined.rows[0]["waterlevel_msl"], json!(1.25));
        assert_eq!(combined.rows[0]["lat"], json!(13.7));
        assert_eq!(combined.columns.last().map(String::as_str), Some("collected_at"));
    }

    #[test]
    fn test_join_count_matches_key_intersection() {
        let collected_at = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let mut aggregation = crate::aggregate::Aggregation::<WaterLevel>::new(collected_at);
        for id in 1..=5 {
            aggregation.ingest("waterlevel_load", &gauge(id, Some(13.0)));
        }
        for id in 6..=8 {
            aggregation.ingest("waterlevel_load", &gauge(id, None));
        }

        let expected = aggregation
            .stations
            .keys()
            .filter(|key| aggregation.observations.contains_key(key))
            .count();
        assert_eq!(join(&aggregation).unwrap().len(), expected);
        assert_eq!(expected, 5);
    }

    #[test]
    fn test_dam_join_uses_name_column() {
        let collected_at = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let feeds = vec![Feed::new(
            "dam_hourly",
            vec![json!({
                "dam": {"dam_name": {"th": "เขื่อนศรีนครินทร์"}, "dam_lat": 14.4, "dam_long": 99.1},
                "dam_storage": 12000.0
            })],
        )];
        let combined = join(&aggregate::<Dam>(&feeds, collected_at)).unwrap();

        assert_eq!(combined.columns[0], "name");
        assert_eq!(combined.rows[0]["name"], json!("เขื่อนศรีนครินทร์"));
        assert_eq!(combined.rows[0]["type"], json!("dam_hourly"));
        assert_eq!(combined.rows[0]["storage"], json!(12000.0));
    }
}
