//! SQLite sink: one table per layer, geometry stored as WKT

use super::{DiagnosticSink, SinkError};
use crate::diagnostic::Diagnostic;
use crate::feature::LineString;
use crate::layer::LayerRegistry;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

/// Writes diagnostics into a SQLite database inside a single transaction
pub struct SqliteSink {
    conn: Connection,
    layers: HashSet<String>,
    in_transaction: bool,
}

/// Quote an identifier for use as a table name
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SqliteSink {
    /// Open (or create) a database file and create a table for every layer
    ///
    /// Existing tables are kept and appended to.
    pub fn create<P: AsRef<Path>>(path: P, registry: &LayerRegistry) -> Result<Self, SinkError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn, registry)
    }

    /// In-memory database (for testing)
    pub fn open_in_memory(registry: &LayerRegistry) -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, registry)
    }

    fn init(conn: Connection, registry: &LayerRegistry) -> Result<Self, SinkError> {
        conn.execute_batch("PRAGMA synchronous = OFF;")?;

        for layer in registry.iter() {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER NOT NULL,
                    key TEXT,
                    value TEXT,
                    changeset INTEGER,
                    user TEXT,
                    timestamp TEXT,
                    version INTEGER,
                    problem TEXT NOT NULL,
                    style TEXT NOT NULL,
                    rule TEXT NOT NULL,
                    geometry TEXT NOT NULL
                );",
                quote_ident(&layer.name)
            ))?;
        }

        conn.execute_batch("BEGIN;")?;

        Ok(Self {
            conn,
            layers: registry.names().into_iter().map(String::from).collect(),
            in_transaction: true,
        })
    }

    /// Underlying connection, e.g. for reading results back
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DiagnosticSink for SqliteSink {
    fn record(&mut self, diagnostic: &Diagnostic, geometry: &LineString) -> Result<(), SinkError> {
        if !self.layers.contains(&diagnostic.layer) {
            return Err(SinkError::UnknownLayer(diagnostic.layer.clone()));
        }
        if !self.in_transaction {
            self.conn.execute_batch("BEGIN;")?;
            self.in_transaction = true;
        }

        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO {} (id, key, value, changeset, user, timestamp, version, problem, style, rule, geometry)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            quote_ident(&diagnostic.layer)
        ))?;

        stmt.execute(params![
            diagnostic.feature_id,
            diagnostic.key,
            diagnostic.value,
            diagnostic.provenance.changeset,
            diagnostic.provenance.user,
            diagnostic.provenance.timestamp,
            diagnostic.provenance.version,
            diagnostic.message,
            diagnostic.style.to_string(),
            diagnostic.rule_id,
            geometry.to_wkt(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT;")?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, Point};
    use crate::finding::{Finding, FindingKind, TagPair};
    use crate::layer;

    fn line() -> LineString {
        Feature::new(1)
            .with_nodes(vec![Some(Point::new(8.0, 50.0)), Some(Point::new(8.1, 50.1))])
            .geometry()
            .unwrap()
    }

    #[test]
    fn test_creates_table_per_layer() {
        let registry = LayerRegistry::standard();
        let sink = SqliteSink::open_in_memory(&registry).unwrap();

        let count: i64 = sink
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count as usize, registry.len());
    }

    #[test]
    fn test_record_and_commit() {
        let mut sink = SqliteSink::open_in_memory(&LayerRegistry::standard()).unwrap();
        let feature = Feature::new(5);
        let finding = Finding::reference(FindingKind::Missing {
            key: "ref".to_string(),
            context: TagPair::new("highway", "primary"),
        });
        let diag = Diagnostic::from_finding("ref-missing", &finding, &feature);

        sink.record(&diag, &line()).unwrap();
        sink.finish().unwrap();

        let (id, problem, style, geometry): (i64, String, String, String) = sink
            .connection()
            .query_row(
                "SELECT id, problem, style, geometry FROM \"ref\"",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(id, 5);
        assert_eq!(problem, "highway=primary without ref tag");
        assert_eq!(style, "ref");
        assert_eq!(geometry, "LINESTRING(8 50,8.1 50.1)");
    }

    #[test]
    fn test_unknown_layer_rejected() {
        let mut registry = LayerRegistry::new();
        registry.register(layer::WAYPROBLEMS, "problems");
        let mut sink = SqliteSink::open_in_memory(&registry).unwrap();

        let finding = Finding::redundant(FindingKind::Redundant {
            tag: TagPair::new("oneway", "no"),
            context: None,
        });
        let diag = Diagnostic::from_finding("falsy-default", &finding, &Feature::new(1));
        assert!(matches!(
            sink.record(&diag, &line()),
            Err(SinkError::UnknownLayer(layer)) if layer == "redundant"
        ));
    }
}
