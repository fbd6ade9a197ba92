//! Integration tests for waylint

use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use waylint::{
    config::Config,
    diagnostic::{Diagnostic, Style},
    engine::Engine,
    layer,
    sink::{JsonLinesSink, MemorySink, SqliteSink},
    source::{self, NdjsonSource, OsmXmlSource, SourceFormat},
    AccessCombinations, Feature,
};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn serial_config() -> Config {
    let mut config = Config::default();
    config.engine.parallel = false;
    config
}

fn run_fixture(name: &str, config: Config) -> (waylint::RunSummary, MemorySink) {
    let path = fixtures_path().join(name);
    let format = SourceFormat::from_path(&path).unwrap();
    let engine = Engine::new(config).unwrap();
    let mut sink = MemorySink::new();
    let summary = engine
        .run(source::open(&path, format).unwrap(), &mut sink)
        .unwrap();
    (summary, sink)
}

/// feature id -> rendered messages, sorted
fn by_feature(diagnostics: &[Diagnostic]) -> BTreeMap<i64, Vec<String>> {
    let mut map: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for d in diagnostics {
        map.entry(d.feature_id).or_default().push(d.message.clone());
    }
    for messages in map.values_mut() {
        messages.sort();
    }
    map
}

#[test]
fn test_osm_fixture_summary() {
    let (summary, sink) = run_fixture("sample.osm", serial_config());

    assert_eq!(summary.features_read, 9);
    assert_eq!(summary.skipped_by_gate, 1);
    assert_eq!(summary.evaluated, 8);
    assert_eq!(summary.with_findings, 7);
    assert_eq!(summary.geometry_failures, 1);
    assert_eq!(summary.malformed_records, 0);
    assert_eq!(summary.diagnostics(), 6);
    assert_eq!(summary.per_layer.get(layer::WAYPROBLEMS), Some(&3));
    assert_eq!(summary.per_layer.get(layer::FOOTWAY), Some(&2));
    assert_eq!(summary.per_layer.get(layer::REDUNDANT), Some(&1));
    assert!(sink.is_finished());
}

#[test]
fn test_osm_fixture_diagnostics() {
    let (_, sink) = run_fixture("sample.osm", serial_config());
    let diagnostics: Vec<Diagnostic> = sink.diagnostics().cloned().collect();
    let map = by_feature(&diagnostics);

    let ids: Vec<i64> = map.keys().copied().collect();
    assert_eq!(ids, vec![100, 101, 102, 103, 104, 105]);

    assert_eq!(
        map[&101],
        vec!["oneway=no is redundant".to_string()]
    );
    assert_eq!(map[&102], vec!["lanes=abc is not an integer".to_string()]);
    assert_eq!(
        map[&103],
        vec!["lanes=12 is implausibly high (maximum 8)".to_string()]
    );
    assert_eq!(
        map[&105],
        vec!["highway=footway with foot=yes is redundant".to_string()]
    );

    let living: Vec<&Diagnostic> = sink.diagnostics().filter(|d| d.feature_id == 100).collect();
    assert_eq!(living.len(), 1);
    assert_eq!(living[0].layer, layer::WAYPROBLEMS);
    assert!(living[0].message.contains("maxspeed"));
    assert!(living[0].message.contains("living_street"));
    assert_eq!(living[0].provenance.user, "anna");
    assert_eq!(living[0].provenance.changeset, 1001);

    let footway: Vec<&Diagnostic> = sink.in_layer(layer::FOOTWAY).collect();
    assert_eq!(footway.len(), 2);
    assert_eq!(footway[0].feature_id, 104);
    assert_eq!(footway[0].key.as_deref(), Some("bicycle"));
    assert_eq!(footway[1].style, Style::Redundant);
}

#[test]
fn test_ndjson_matches_osm() {
    let (osm_summary, osm) = run_fixture("sample.osm", serial_config());
    let (ndjson_summary, ndjson) = run_fixture("sample.ndjson", serial_config());

    let osm: Vec<Diagnostic> = osm.into_diagnostics();
    let ndjson: Vec<Diagnostic> = ndjson.into_diagnostics();
    assert_eq!(by_feature(&osm), by_feature(&ndjson));

    assert_eq!(ndjson_summary.malformed_records, 1);
    assert_eq!(ndjson_summary.features_read, osm_summary.features_read);
}

#[test]
fn test_parallel_run_is_deterministic() {
    let mut config = Config::default();
    config.engine.jobs = 3;
    config.engine.batch_size = 2;

    let (_, first) = run_fixture("sample.osm", config.clone());
    let (_, second) = run_fixture("sample.osm", config);
    let (_, serial) = run_fixture("sample.osm", serial_config());

    let first = first.into_diagnostics();
    assert_eq!(first, second.into_diagnostics());
    assert_eq!(first, serial.into_diagnostics());
}

#[test]
fn test_sqlite_sink_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out/problems.db");

    let engine = Engine::new(serial_config()).unwrap();
    let mut sink = SqliteSink::create(&db, engine.registry()).unwrap();
    let path = fixtures_path().join("sample.osm");
    let features = OsmXmlSource::new(BufReader::new(File::open(path).unwrap()));
    engine.run(features, &mut sink).unwrap();
    drop(sink);

    let conn = rusqlite::Connection::open(&db).unwrap();
    let count = |table: &str| -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    };
    assert_eq!(count("wayproblems"), 3);
    assert_eq!(count("footway"), 2);
    assert_eq!(count("redundant"), 1);
    assert_eq!(count("ref"), 0);
    assert_eq!(count("cycling"), 0);
    assert_eq!(count("strange"), 0);

    let (user, geometry): (String, String) = conn
        .query_row(
            "SELECT user, geometry FROM redundant WHERE id = 101",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(user, "ben");
    assert_eq!(geometry, "LINESTRING(8.001 50.001,8.002 50.002)");
}

#[test]
fn test_json_sink_lines() {
    let engine = Engine::new(serial_config()).unwrap();
    let path = fixtures_path().join("sample.ndjson");
    let features = NdjsonSource::new(BufReader::new(File::open(path).unwrap()));

    let mut sink = JsonLinesSink::new(Vec::new());
    engine.run(features, &mut sink).unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|l| l["geometry"]["type"] == "LineString"));
    assert_eq!(lines[2]["properties"]["id"], 102);
    assert_eq!(lines[2]["properties"]["rule"], "lanes-value");
}

#[test]
fn test_lenient_preset_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".waylintrc.yaml");
    std::fs::write(
        &path,
        "extends:\n  - lenient\nrules:\n  disabled:\n    - access-value\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    let engine = Engine::new(config).unwrap();
    assert!(!engine.is_active("access-value"));

    let way = Feature::new(1)
        .with_tag("highway", "residential")
        .with_tag("access", "private")
        .with_tag("goods", "yes");
    let diagnostics = engine.evaluate(&way);

    let restrictive: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.rule_id == "public-restrictive-access")
        .collect();
    assert_eq!(restrictive.len(), 1);
    assert_eq!(restrictive[0].style, Style::Redundant);
    assert_eq!(restrictive[0].layer, layer::WAYPROBLEMS);

    let strict = Engine::new(Config::default()).unwrap().evaluate(&way);
    let restrictive = strict
        .iter()
        .find(|d| d.rule_id == "public-restrictive-access")
        .unwrap();
    assert_eq!(restrictive.style, Style::Default);
}

#[test]
fn test_offending_value_is_verbatim() {
    let engine = Engine::new(Config::default()).unwrap();
    for value in ["1,5", " 2", "zwei", "2.0"] {
        let way = Feature::new(1)
            .with_tag("highway", "track")
            .with_tag("lanes", value);
        let diagnostics = engine.evaluate(&way);
        assert_eq!(diagnostics.len(), 1, "lanes={:?}", value);
        assert!(diagnostics[0].message.contains(&format!("lanes={}", value)));
        assert_eq!(diagnostics[0].value.as_deref(), Some(value));
    }
}

#[test]
fn test_combinations_over_fixture() {
    let path = fixtures_path().join("sample.osm");
    let mut stats = AccessCombinations::default();
    for feature in source::open(&path, SourceFormat::OsmXml).unwrap() {
        stats.add(&feature.unwrap());
    }

    assert_eq!(stats.total(), 8);
    let sorted = stats.sorted();
    assert_eq!(sorted[0].count, 3);
    assert_eq!(sorted[0].to_string(), "       3 highway=residential");
}

#[test]
fn test_unresolved_geometry_keeps_other_features() {
    let engine = Engine::new(serial_config()).unwrap();
    let broken = Feature::new(1)
        .with_tag("highway", "residential")
        .with_tag("oneway", "no");
    let fine = broken.clone().with_nodes(vec![
        Some(waylint::Point::new(8.0, 50.0)),
        Some(waylint::Point::new(8.1, 50.0)),
    ]);
    let mut fine = fine;
    fine.id = 2;

    let mut sink = MemorySink::new();
    let summary = engine
        .run(vec![Ok::<Feature, waylint::SourceError>(broken), Ok(fine)], &mut sink)
        .unwrap();
    assert_eq!(summary.geometry_failures, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.diagnostics().next().unwrap().feature_id, 2);
}
