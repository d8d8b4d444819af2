//! Common GBIF response fixtures.
//!
//! Bodies mirror the shape of the public API closely enough for the parts
//! the services read; unrelated fields are included so parsers are tested
//! against realistic noise.

use serde_json::{json, Value};

/// Species search body whose first result has the given key.
pub fn species_hit(key: u64) -> Value {
    json!({
        "offset": 0,
        "limit": 20,
        "endOfRecords": true,
        "results": [
            {
                "key": key,
                "scientificName": "Salmo salar Linnaeus, 1758",
                "rank": "SPECIES",
                "kingdom": "Animalia"
            },
            {
                "key": key + 1,
                "scientificName": "Salmo trutta Linnaeus, 1758",
                "rank": "SPECIES"
            }
        ]
    })
}

/// Species search body with no results.
pub fn species_empty() -> Value {
    json!({
        "offset": 0,
        "limit": 20,
        "endOfRecords": true,
        "results": []
    })
}

/// Occurrence search body with one record per entry.
///
/// `Some((lat, lon))` produces a georeferenced record; `None` a record
/// with no coordinate fields at all.
pub fn occurrences(points: &[Option<(f64, f64)>]) -> Value {
    let results: Vec<Value> = points
        .iter()
        .enumerate()
        .map(|(i, point)| match point {
            Some((lat, lon)) => json!({
                "key": 1000 + i,
                "basisOfRecord": "HUMAN_OBSERVATION",
                "decimalLatitude": lat,
                "decimalLongitude": lon,
                "country": "United States of America"
            }),
            None => json!({
                "key": 1000 + i,
                "basisOfRecord": "PRESERVED_SPECIMEN"
            }),
        })
        .collect();

    json!({
        "offset": 0,
        "limit": 300,
        "endOfRecords": true,
        "count": results.len(),
        "results": results
    })
}
