//! Leaflet map document for occurrence records.

use serde_json::{Map, Value};
use std::fmt::Write;

use fish_common::{FishError, FishResult};

use super::escape::escape_html;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_MAX_ZOOM: u8 = 19;

/// Initial map view (geographic centre of the contiguous US).
pub const MAP_CENTER: (f64, f64) = (39.8283, -98.5795);
pub const MAP_ZOOM: u8 = 3;

/// A georeferenced occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
}

impl Marker {
    /// The `L.marker(...)` statement for this point.
    ///
    /// `{:?}` keeps the shortest round-trip form and always includes a
    /// fractional part, so 40 prints as `40.0`.
    pub fn statement(&self) -> String {
        format!(
            "L.marker([{:?}, {:?}]).addTo(map);\n",
            self.latitude, self.longitude
        )
    }
}

/// Markers for every record carrying both coordinates, in input order.
///
/// Records missing either field (or holding `null`) are skipped. Numeric
/// strings are accepted. A record that is not an object, or a coordinate that
/// is neither a number nor a numeric string, is an error.
pub fn extract_markers(records: &[Value]) -> FishResult<Vec<Marker>> {
    let mut markers = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| {
            FishError::Render(format!("Occurrence record {} is not an object", index))
        })?;

        let latitude = coordinate(object, "decimalLatitude", index)?;
        let longitude = coordinate(object, "decimalLongitude", index)?;

        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            markers.push(Marker {
                latitude,
                longitude,
            });
        }
    }

    Ok(markers)
}

fn coordinate(object: &Map<String, Value>, field: &str, index: usize) -> FishResult<Option<f64>> {
    let value = match object.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(FishError::Render(format!(
            "Occurrence record {} has non-numeric {}: {}",
            index, field, value
        ))),
    }
}

/// Self-contained HTML page plotting the occurrences of one species.
pub fn render_map_html(records: &[Value], fish_name: &str) -> FishResult<String> {
    let markers = extract_markers(records)?;

    let mut marker_block = String::new();
    for marker in &markers {
        marker_block.push_str(&marker.statement());
    }

    let name = escape_html(fish_name);
    let mut html = String::with_capacity(1024 + marker_block.len());

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Fish Distribution - {name}</title>
  <link rel="stylesheet" href="{css}" />
  <script src="{js}"></script>
  <style>#map {{ width: 100%; height: 100%; }}</style>
</head>
<body>
  <h1>Distribution of {name}</h1>
  <div id="map" style="width: 100%; height: 500px;"></div>
  <script>
    var map = L.map('map').setView([{lat:?}, {lon:?}], {zoom});
    L.tileLayer('{tiles}', {{ maxZoom: {max_zoom} }}).addTo(map);
{markers}  </script>
</body>
</html>
"#,
        name = name,
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        lat = MAP_CENTER.0,
        lon = MAP_CENTER.1,
        zoom = MAP_ZOOM,
        tiles = TILE_URL,
        max_zoom = TILE_MAX_ZOOM,
        markers = marker_block,
    );

    Ok(html)
}
