//! Loading tracks from GeoJSON.

use geo::Point;
use geojson::GeoJson;

use super::WaypointTrack;
use crate::error::{ChaseError, Result};

impl WaypointTrack {
    /// Build a track from a GeoJSON document.
    ///
    /// Accepts a `LineString`, a `Polygon` (its exterior ring) or a
    /// `MultiPoint`, either bare or as the only geometry of a Feature or
    /// FeatureCollection. A closing point that repeats the first waypoint is
    /// dropped, since the track already wraps around.
    pub fn from_geojson(text: &str) -> Result<Self> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| ChaseError::InvalidTrack(e.to_string()))?;

        let mut points = waypoints_of(single_geometry(geojson)?)?;
        if points.len() > 2 && points.first() == points.last() {
            points.pop();
        }

        tracing::debug!(waypoints = points.len(), "parsed track from geojson");
        Self::new(points)
    }
}

fn single_geometry(geojson: GeoJson) -> Result<geojson::Value> {
    match geojson {
        GeoJson::Geometry(geom) => Ok(geom.value),
        GeoJson::Feature(feature) => feature
            .geometry
            .map(|geom| geom.value)
            .ok_or_else(|| ChaseError::InvalidTrack("feature has no geometry".into())),
        GeoJson::FeatureCollection(fc) => {
            let count = fc.features.len();
            match fc.features.into_iter().next() {
                Some(feature) if count == 1 => single_geometry(GeoJson::Feature(feature)),
                _ => Err(ChaseError::InvalidTrack(format!(
                    "expected exactly one feature, found {count}"
                ))),
            }
        }
    }
}

fn waypoints_of(value: geojson::Value) -> Result<Vec<Point>> {
    match value {
        geojson::Value::LineString(coords) | geojson::Value::MultiPoint(coords) => {
            positions_to_points(&coords)
        }
        geojson::Value::Polygon(rings) => match rings.first() {
            Some(exterior) => positions_to_points(exterior),
            None => Err(ChaseError::InvalidTrack("polygon has no rings".into())),
        },
        _ => Err(ChaseError::InvalidTrack(
            "expected a LineString, Polygon or MultiPoint".into(),
        )),
    }
}

fn positions_to_points(coords: &[Vec<f64>]) -> Result<Vec<Point>> {
    coords
        .iter()
        .map(|c| match c.as_slice() {
            [lon, lat, ..] => Ok(Point::new(*lon, *lat)),
            _ => Err(ChaseError::InvalidTrack(
                "position needs longitude and latitude".into(),
            )),
        })
        .collect()
}
