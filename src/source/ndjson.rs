//! Newline-delimited JSON features

use super::SourceError;
use crate::feature::{Feature, Point, Provenance};
use crate::tags::Tags;
use serde::Deserialize;
use std::io::BufRead;

/// One feature per line:
///
/// ```json
/// {"id": 1, "tags": {"highway": "track"}, "coordinates": [[8.1, 50.2], null], "user": "u", "changeset": 3, "timestamp": "...", "version": 1}
/// ```
///
/// `null` coordinates are unresolved nodes.
pub struct NdjsonSource<R: BufRead> {
    lines: std::io::Lines<R>,
    line: usize,
    failed: bool,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    coordinates: Vec<Option<[f64; 2]>>,
    #[serde(default)]
    user: String,
    #[serde(default)]
    changeset: i64,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    version: u32,
}

impl<R: BufRead> NdjsonSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            failed: false,
        }
    }

    fn parse(&self, text: &str) -> Result<Feature, SourceError> {
        let record: Record = serde_json::from_str(text).map_err(|source| SourceError::Json {
            line: self.line,
            source,
        })?;

        let mut nodes = Vec::with_capacity(record.coordinates.len());
        for coordinate in record.coordinates {
            nodes.push(match coordinate {
                Some([lon, lat]) => {
                    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                        return Err(SourceError::Malformed {
                            record: format!("way {} (line {})", record.id, self.line),
                            reason: format!("coordinate [{}, {}] out of range", lon, lat),
                        });
                    }
                    Some(Point::new(lon, lat))
                }
                None => None,
            });
        }

        Ok(Feature::new(record.id)
            .with_tags(record.tags)
            .with_nodes(nodes)
            .with_provenance(Provenance {
                user: record.user,
                changeset: record.changeset,
                timestamp: record.timestamp,
                version: record.version,
            }))
    }
}

impl<R: BufRead> Iterator for NdjsonSource<R> {
    type Item = Result<Feature, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(SourceError::Io(e)));
                }
            };
            self.line += 1;

            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(self.parse(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(input: &str) -> Vec<Result<Feature, SourceError>> {
        NdjsonSource::new(Cursor::new(input.to_string())).collect()
    }

    #[test]
    fn test_reads_features() {
        let input = r#"{"id": 1, "tags": {"highway": "track", "lanes": "abc"}, "coordinates": [[8.0, 50.0], [8.1, 50.1]], "user": "mapper", "changeset": 7, "timestamp": "2020-01-01T00:00:00Z", "version": 3}

{"id": 2, "tags": {"highway": "footway"}, "coordinates": [[8.0, 50.0], null]}
"#;
        let features: Vec<Feature> = read(input).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].id, 1);
        assert_eq!(features[0].tags().get("lanes"), Some("abc"));
        assert_eq!(features[0].provenance.user, "mapper");
        assert_eq!(features[0].provenance.version, 3);
        assert!(features[0].geometry().is_ok());

        assert_eq!(features[1].nodes, vec![Some(Point::new(8.0, 50.0)), None]);
        assert!(features[1].geometry().is_err());
    }

    #[test]
    fn test_bad_line_is_record_error() {
        let input = "{\"id\": 1}\nnot json\n{\"id\": 3}\n";
        let results = read(input);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(e @ SourceError::Json { line, .. }) => {
                assert_eq!(*line, 2);
                assert!(e.is_record_error());
            }
            other => panic!("expected JSON error, got {:?}", other),
        }
        assert_eq!(results[2].as_ref().unwrap().id, 3);
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let results = read(r#"{"id": 4, "coordinates": [[200.0, 50.0], [8.0, 50.0]]}"#);
        assert!(matches!(&results[0], Err(SourceError::Malformed { .. })));
    }
}
