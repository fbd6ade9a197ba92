//! Line features handed to the checker by a source

use crate::tags::{TagView, Tags};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resolved node location (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Line geometry of a way
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON style `[[lon, lat], ...]`
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lon, p.lat]).collect()
    }

    /// Well-known text, e.g. `LINESTRING(8.1 50.2,8.2 50.3)`
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{} {}", p.lon, p.lat))
            .collect();
        format!("LINESTRING({})", coords.join(","))
    }
}

/// The geometry of a way cannot be derived
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("only {resolved} of {total} node locations resolvable, need 2 distinct points")]
    TooFewPoints { resolved: usize, total: usize },
}

/// Edit provenance of a way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Author of the last edit
    pub user: String,
    pub changeset: i64,
    /// ISO-8601 edit timestamp
    pub timestamp: String,
    pub version: u32,
}

/// One way: identity, tags, node locations and provenance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub id: i64,
    pub tags: Tags,
    /// Node locations in way order; `None` where the node could not be resolved
    pub nodes: Vec<Option<Point>>,
    pub provenance: Provenance,
}

impl Feature {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Option<Point>>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Read-only typed view over the tags
    pub fn tags(&self) -> TagView<'_> {
        TagView::new(&self.tags)
    }

    /// Derive the line geometry from the resolvable node locations
    ///
    /// Unresolved nodes and consecutive duplicate locations are skipped.
    pub fn geometry(&self) -> Result<LineString, GeometryError> {
        let mut points: Vec<Point> = Vec::with_capacity(self.nodes.len());
        let mut resolved = 0;

        for point in self.nodes.iter().flatten() {
            resolved += 1;
            if points.last() != Some(point) {
                points.push(*point);
            }
        }

        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                resolved,
                total: self.nodes.len(),
            });
        }

        Ok(LineString { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_skips_unresolved() {
        let feature = Feature::new(1).with_nodes(vec![
            Some(Point::new(8.0, 50.0)),
            None,
            Some(Point::new(8.1, 50.1)),
        ]);
        let line = feature.geometry().unwrap();
        assert_eq!(line.len(), 2);
        assert_eq!(line.to_wkt(), "LINESTRING(8 50,8.1 50.1)");
        assert_eq!(line.coordinates(), vec![[8.0, 50.0], [8.1, 50.1]]);
    }

    #[test]
    fn test_geometry_too_few_points() {
        let feature = Feature::new(1).with_nodes(vec![Some(Point::new(8.0, 50.0)), None]);
        assert_eq!(
            feature.geometry(),
            Err(GeometryError::TooFewPoints {
                resolved: 1,
                total: 2
            })
        );
    }

    #[test]
    fn test_geometry_degenerate_duplicate() {
        let p = Point::new(8.0, 50.0);
        let feature = Feature::new(1).with_nodes(vec![Some(p), Some(p)]);
        assert!(matches!(
            feature.geometry(),
            Err(GeometryError::TooFewPoints { resolved: 2, .. })
        ));
    }

    #[test]
    fn test_tags_view() {
        let feature = Feature::new(5)
            .with_tag("highway", "residential")
            .with_tag("lanes", "2");
        let tags = feature.tags();
        assert!(tags.has_value("highway", "residential"));
        assert_eq!(tags.as_int("lanes"), Some(Ok(2)));
    }
}
