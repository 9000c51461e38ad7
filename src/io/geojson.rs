use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::OverlapError;
use crate::geom::check_ring;
use crate::overlap::{OverlapRecord, Report};
use crate::types::{County, CountyInfo, GeoId, GeoType};

use super::fs::write_atomic;

/// Property keys that may carry a congressional district number, in lookup order.
const DISTRICT_KEYS: [&str; 5] = ["CD119FP", "CD118FP", "CDNUM", "CD", "DISTRICT"];

/// A GeoJSON feature with an areal geometry.
#[derive(Debug, Clone)]
pub struct Feature {
    pub properties: Map<String, Value>,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    /// Property value as text; numbers are rendered without a fractional part when integral.
    pub fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => i.to_string(),
                None => n.to_string(),
            }),
            _ => None,
        }
    }
}

/// Read all Polygon/MultiPolygon features of a FeatureCollection file.
pub fn read_features(path: &Path) -> Result<Vec<Feature>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read GeoJSON file: {}", path.display()))?;
    parse_features(&bytes)
        .with_context(|| format!("Failed to parse GeoJSON file: {}", path.display()))
}

/// Parse FeatureCollection bytes. Features without an areal geometry are skipped.
pub fn parse_features(bytes: &[u8]) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("Expected a FeatureCollection with a `features` array"))?;

    let mut parsed = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let properties = feature["properties"].as_object().cloned().unwrap_or_default();
        let geometry = &feature["geometry"];
        let coords = geometry["coordinates"].as_array();

        let multipolygon = match (geometry["type"].as_str(), coords) {
            (Some("Polygon"), Some(coords)) => MultiPolygon(vec![parse_polygon(coords, idx, 0)?]),
            (Some("MultiPolygon"), Some(coords)) => parse_multipolygon(coords, idx)?,
            (ty, _) => {
                warn!("[parse_features] skipping feature {idx}: unsupported geometry {ty:?}");
                continue;
            }
        };
        parsed.push(Feature { properties, geometry: multipolygon });
    }
    Ok(parsed)
}

/// Parse MultiPolygon coordinates: `[[ring, ...], ...]`.
fn parse_multipolygon(coords: &[Value], feature: usize) -> Result<MultiPolygon<f64>> {
    let polygons = coords.iter().enumerate()
        .map(|(part, polygon)| {
            let rings = polygon.as_array()
                .ok_or_else(|| anyhow!("feature {feature}: part {part} is not an array of rings"))?;
            parse_polygon(rings, feature, part)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MultiPolygon(polygons))
}

/// Parse Polygon coordinates: exterior ring followed by holes.
fn parse_polygon(rings: &[Value], feature: usize, part: usize) -> Result<Polygon<f64>> {
    if rings.is_empty() {
        bail!("feature {feature}: part {part} has no exterior ring");
    }

    let mut parsed = rings.iter().enumerate()
        .map(|(ring, coords)| parse_ring(coords, feature, part, ring))
        .collect::<Result<Vec<_>>>()?;
    let exterior = parsed.remove(0);
    Ok(Polygon::new(exterior, parsed))
}

/// Parse one ring `[[x, y], ...]`, enforcing closure and the minimum vertex count.
fn parse_ring(coords: &Value, feature: usize, part: usize, ring: usize) -> Result<LineString<f64>> {
    let positions = coords.as_array()
        .ok_or_else(|| anyhow!("feature {feature}: ring {ring} of part {part} is not an array"))?;

    let mut points = Vec::with_capacity(positions.len());
    for position in positions {
        let (x, y) = match position.as_array().map(|p| p.as_slice()) {
            Some([x, y, ..]) => (x.as_f64(), y.as_f64()),
            _ => (None, None),
        };
        let (Some(x), Some(y)) = (x, y) else {
            bail!("feature {feature}: invalid position {position} in ring {ring} of part {part}");
        };
        points.push(Coord { x, y });
    }

    check_ring(&points).map_err(|defect| OverlapError::MalformedRegion {
        record: format!("feature {feature}"),
        reason: defect.at(part, ring),
    })?;
    Ok(LineString(points))
}

/// Find the feature for district `number` ("06" and "6" are equivalent).
pub fn select_district<'a>(features: &'a [Feature], number: &str) -> Result<&'a Feature> {
    let wanted = normalize_number(number);
    features.iter()
        .find(|feature| DISTRICT_KEYS.iter()
            .find_map(|key| feature.property(key))
            .is_some_and(|value| normalize_number(&value) == wanted))
        .ok_or_else(|| anyhow!("District {number} not found among {} features", features.len()))
}

#[inline]
fn normalize_number(number: &str) -> &str {
    let trimmed = number.trim().trim_start_matches('0');
    if trimmed.is_empty() && !number.trim().is_empty() { "0" } else { trimmed }
}

/// Build counties from TIGER-style features, keeping only those in `state_fips`.
///
/// Reads `NAME` (or `NAMELSAD`), `GEOID` (or `STATEFP` + `COUNTYFP`) and
/// `STATEFP`, deriving the state from the GEOID prefix when absent.
pub fn counties_from_features(features: &[Feature], state_fips: &str) -> Result<Vec<County>> {
    let mut counties = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        let geo_id = feature.property("GEOID")
            .or_else(|| Some(feature.property("STATEFP")? + &feature.property("COUNTYFP")?))
            .ok_or_else(|| anyhow!("County feature {idx} has no GEOID"))?;
        let geo_id = GeoId::county(geo_id);
        let state = match feature.property("STATEFP") {
            Some(state) => GeoId::state(state),
            None => geo_id.to_parent(GeoType::State),
        };
        if state.id() != state_fips { continue }

        let name = feature.property("NAME")
            .or_else(|| feature.property("NAMELSAD"))
            .ok_or_else(|| anyhow!("County feature {idx} ({}) has no NAME", geo_id.id()))?;
        let info = CountyInfo::new(name, geo_id).with_state(state);
        counties.push(County::new(info, feature.geometry.clone()));
    }
    Ok(counties)
}

/// Convert a MultiPolygon into a GeoJSON geometry object.
pub fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

/// Render the report as a FeatureCollection: the district boundary first, then
/// one feature per intersecting county (its overlap geometry) in report order.
pub fn report_to_geojson(report: &Report, boundary: &MultiPolygon<f64>, records: &[OverlapRecord]) -> Value {
    let by_geo_id = records.iter()
        .map(|record| (record.county().geo_id.id(), record))
        .collect::<HashMap<_, _>>();

    let mut features = Vec::with_capacity(report.counties.len() + 1);
    features.push(json!({
        "type": "Feature",
        "geometry": multipolygon_to_geojson(boundary),
        "properties": {
            "district": report.district,
            "total_counties": report.total_counties,
            "full_counties": report.full_counties,
            "partial_counties": report.partial_counties,
        },
    }));

    for entry in &report.counties {
        let Some(record) = by_geo_id.get(entry.geo_id.as_str()) else {
            warn!("[report_to_geojson] no overlap geometry for {}", entry.geo_id);
            continue;
        };
        features.push(json!({
            "type": "Feature",
            "id": entry.geo_id,
            "geometry": multipolygon_to_geojson(record.intersection()),
            "properties": {
                "name": entry.name,
                "geo_id": entry.geo_id,
                "coverage_ratio": entry.coverage_ratio,
                "coverage": entry.coverage.to_str(),
            },
        }));
    }

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Serialize `value` compactly to `path`.
pub fn write_json(path: &Path, value: &Value, force: bool) -> Result<()> {
    let bytes = serde_json::to_vec(value).context("Failed to serialize JSON")?;
    write_atomic(path, &bytes, force)
}
