//! Feature sources
//!
//! A source is any iterator of `Result<Feature, SourceError>`. Record errors
//! (one bad line, one malformed way) are reported per item and the stream
//! continues; any other error means the stream itself is broken.

mod ndjson;
mod osm_xml;

pub use ndjson::NdjsonSource;
pub use osm_xml::OsmXmlSource;

use crate::feature::Feature;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Source error
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed record {record}: {reason}")]
    Malformed { record: String, reason: String },
}

impl SourceError {
    /// True when only the current record is affected and reading can go on
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Json { .. } | Self::Malformed { .. })
    }
}

/// Boxed stream of features
pub type FeatureStream = Box<dyn Iterator<Item = Result<Feature, SourceError>>>;

/// Input formats recognized by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    OsmXml,
    Ndjson,
}

impl SourceFormat {
    /// Guess the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "osm" | "xml" => Some(Self::OsmXml),
            "ndjson" | "jsonl" | "geojsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }
}

/// Open a file as a feature stream
pub fn open(path: &Path, format: SourceFormat) -> Result<FeatureStream, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    log::info!("reading {} as {:?}", path.display(), format);
    Ok(match format {
        SourceFormat::OsmXml => Box::new(OsmXmlSource::new(reader)),
        SourceFormat::Ndjson => Box::new(NdjsonSource::new(reader)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("extract.osm")),
            Some(SourceFormat::OsmXml)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("ways.JSONL")),
            Some(SourceFormat::Ndjson)
        );
        assert_eq!(SourceFormat::from_path(Path::new("ways.pbf")), None);
        assert_eq!(SourceFormat::from_path(Path::new("ways")), None);
    }

    #[test]
    fn test_record_errors() {
        let malformed = SourceError::Malformed {
            record: "way 1".to_string(),
            reason: "missing id".to_string(),
        };
        assert!(malformed.is_record_error());

        let io = SourceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "gone"));
        assert!(!io.is_record_error());
    }

    #[test]
    fn test_open_missing_file() {
        let result = open(Path::new("/nonexistent/ways.osm"), SourceFormat::OsmXml);
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
