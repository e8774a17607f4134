use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, PolygonType, Position, Value};
use tracing::{info, warn};

use crate::geo::{GeoCoordinate, LineString, LinearRing};
use crate::map::renderer::{MapRenderer, Shape};

/// Coastline files in order of preference; the first one present is used.
const COASTLINE_FILES: [&str; 3] = ["ne_50m_coastline.json", "ne_110m_coastline.json", "natural-earth.json"];
const BORDER_FILES: [&str; 1] = ["ne_50m_borders.json"];

/// Load the available Natural Earth GeoJSON data into the map renderer.
/// Returns the number of shapes added. Unreadable files are logged and skipped.
pub fn load_all_geojson(renderer: &mut MapRenderer, data_dir: &Path) -> Result<usize> {
    let mut shapes = Vec::new();

    if let Some(path) = COASTLINE_FILES.iter().map(|f| data_dir.join(f)).find(|p| p.exists()) {
        match load_shapes(&path) {
            Ok(loaded) => shapes.extend(loaded),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load coastlines"),
        }
    }

    for path in BORDER_FILES.iter().map(|f| data_dir.join(f)).filter(|p| p.exists()) {
        match load_shapes(&path) {
            Ok(loaded) => shapes.extend(loaded),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load borders"),
        }
    }

    let count = shapes.len();
    info!(count, dir = %data_dir.display(), "loaded GeoJSON shapes");
    renderer.extend(shapes);
    Ok(count)
}

/// Read and parse one GeoJSON file
pub fn load_shapes(path: &Path) -> Result<Vec<Shape>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_geojson(&mut bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Parse GeoJSON in place (simd-json mutates its input) into renderable shapes.
/// Polygon rings become [`Shape::Ring`], everything line-like a [`Shape::Line`].
pub fn parse_geojson(bytes: &mut [u8]) -> Result<Vec<Shape>> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;
    let mut shapes = Vec::new();
    match &geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_shapes(geometry, &mut shapes);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_shapes(geometry, &mut shapes);
            }
        }
        GeoJson::Geometry(geometry) => collect_shapes(geometry, &mut shapes),
    }
    Ok(shapes)
}

fn to_line(positions: &[Position]) -> LineString {
    positions
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| GeoCoordinate::from_degrees(c[0], c[1]).with_altitude(c.get(2).copied().unwrap_or(0.0)))
        .collect()
}

fn push_line(positions: &[Position], shapes: &mut Vec<Shape>) {
    let line = to_line(positions);
    if line.len() >= 2 {
        shapes.push(Shape::Line(line));
    }
}

fn push_polygon(rings: &PolygonType, shapes: &mut Vec<Shape>) {
    for positions in rings {
        let ring = LinearRing::new(to_line(positions));
        if ring.len() >= 3 {
            shapes.push(Shape::Ring(ring));
        }
    }
}

fn collect_shapes(geometry: &Geometry, shapes: &mut Vec<Shape>) {
    match &geometry.value {
        Value::LineString(coords) => push_line(coords, shapes),
        Value::MultiLineString(lines) => {
            for coords in lines {
                push_line(coords, shapes);
            }
        }
        Value::Polygon(rings) => push_polygon(rings, shapes),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                push_polygon(rings, shapes);
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_shapes(g, shapes);
            }
        }
        _ => {}
    }
}

/// Generate a simple world map outline for when no data file is available
pub fn generate_simple_world(renderer: &mut MapRenderer) {
    let rings: [&[(f64, f64)]; 6] = [
        // North America
        &[
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
            (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
            (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
            (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
            (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
            (-168.0, 65.0),
        ],
        // South America
        &[
            (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0),
            (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
            (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
            (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0),
            (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0), (-70.0, -15.0),
            (-80.0, -5.0), (-80.0, 0.0), (-80.0, 10.0),
        ],
        // Europe
        &[
            (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
            (10.0, 44.0), (15.0, 45.0), (20.0, 40.0), (25.0, 37.0),
            (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0),
            (30.0, 60.0), (25.0, 65.0), (20.0, 70.0), (10.0, 71.0),
            (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0),
            (-5.0, 48.0), (-5.0, 43.0), (-10.0, 36.0),
        ],
        // Africa
        &[
            (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
            (10.0, 37.0), (20.0, 33.0), (25.0, 32.0), (35.0, 30.0),
            (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0),
            (40.0, -5.0), (40.0, -15.0), (35.0, -25.0), (30.0, -30.0),
            (20.0, -35.0), (18.0, -35.0), (15.0, -30.0), (12.0, -15.0),
            (10.0, 0.0), (5.0, 5.0), (-5.0, 5.0), (-10.0, 8.0),
            (-17.0, 15.0),
        ],
        // Asia
        &[
            (35.0, 42.0), (40.0, 43.0), (50.0, 40.0), (55.0, 37.0),
            (60.0, 25.0), (65.0, 25.0), (70.0, 20.0), (75.0, 15.0),
            (80.0, 8.0), (80.0, 15.0), (88.0, 22.0), (92.0, 22.0),
            (95.0, 16.0), (100.0, 14.0), (105.0, 10.0), (110.0, 20.0),
            (115.0, 22.0), (120.0, 22.0), (122.0, 25.0), (125.0, 30.0),
            (130.0, 35.0), (135.0, 35.0), (140.0, 40.0), (145.0, 45.0),
            (145.0, 50.0), (140.0, 55.0), (135.0, 55.0), (130.0, 52.0),
            (130.0, 43.0), (120.0, 40.0), (110.0, 45.0), (90.0, 50.0),
            (70.0, 55.0), (60.0, 55.0), (50.0, 50.0), (40.0, 43.0),
            (35.0, 42.0),
        ],
        // Australia
        &[
            (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
            (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
            (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
            (125.0, -32.0), (115.0, -35.0), (115.0, -25.0), (115.0, -20.0),
        ],
    ];

    renderer.extend(rings.iter().map(|ring| Shape::Ring(LinearRing::from_degrees(ring))));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "coast"},
                "geometry": {"type": "LineString", "coordinates": [[0, 0], [10, 5], [20, 0]]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [5, 5]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [[3, 3]]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_lines_and_rings() {
        let mut bytes = SAMPLE.as_bytes().to_vec();
        let shapes = parse_geojson(&mut bytes).expect("valid GeoJSON");
        assert_eq!(shapes.len(), 2);
        match &shapes[0] {
            Shape::Line(line) => assert_eq!(line.len(), 3),
            other => panic!("expected a line, got {other:?}"),
        }
        match &shapes[1] {
            // closing duplicate dropped
            Shape::Ring(ring) => assert_eq!(ring.len(), 4),
            other => panic!("expected a ring, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let mut bytes = b"{ not json".to_vec();
        assert!(parse_geojson(&mut bytes).is_err());
    }

    #[test]
    fn test_missing_data_dir_loads_nothing() {
        let mut renderer = MapRenderer::new();
        let count = load_all_geojson(&mut renderer, Path::new("/nonexistent/tui-globe-data")).expect("missing files are skipped");
        assert_eq!(count, 0);
        assert!(!renderer.has_data());
    }

    #[test]
    fn test_simple_world() {
        let mut renderer = MapRenderer::new();
        generate_simple_world(&mut renderer);
        assert_eq!(renderer.len(), 6);
    }
}
