use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{json, Map};
use thaiwater::{Boundary, BoundaryLayer, Crs, Enricher, Table};

/// A 40 x 40 grid of 0.25 degree cells over Thailand's extent.
fn grid_layer() -> BoundaryLayer {
    let mut boundaries = Vec::new();
    for i in 0..40 {
        for j in 0..40 {
            let x0 = 97.0 + i as f64 * 0.25;
            let y0 = 5.5 + j as f64 * 0.25;
            let mut properties = Map::new();
            properties.insert("NAME_1".into(), json!(format!("P{}", i)));
            properties.insert("NAME_2".into(), json!(format!("A{}-{}", i, j)));
            properties.insert("NAME_3".into(), json!(format!("T{}-{}", i, j)));
            boundaries.push(Boundary {
                geometry: MultiPolygon(vec![Polygon::new(
                    LineString::from(vec![
                        (x0, y0),
                        (x0 + 0.25, y0),
                        (x0 + 0.25, y0 + 0.25),
                        (x0, y0 + 0.25),
                        (x0, y0),
                    ]),
                    vec![],
                )]),
                properties,
            });
        }
    }
    BoundaryLayer::new(Crs::Wgs84, boundaries)
}

fn station_table(count: usize) -> Table {
    let mut table = Table::new("water_level_station", vec!["id".into(), "lat".into(), "lng".into()]);
    for id in 0..count {
        let lat = 5.6 + (id % 97) as f64 * 0.1;
        let lng = 97.1 + (id % 89) as f64 * 0.1;
        if let Some(row) = json!({"id": id, "lat": lat, "lng": lng}).as_object() {
            table.push(row.clone());
        }
    }
    table
}

fn bench_enrich(c: &mut Criterion) {
    let enricher = Enricher::builder()
        .layer(grid_layer())
        .build()
        .expect("grid layer has all region attributes");
    let table = station_table(2_000);

    c.bench_function("enrich_2000_stations", |b| {
        b.iter(|| enricher.enrich(black_box(table.clone())))
    });
    c.bench_function("build_enricher", |b| {
        b.iter(|| Enricher::builder().layer(black_box(grid_layer())).build())
    });
}

criterion_group!(benches, bench_enrich);
criterion_main!(benches);
