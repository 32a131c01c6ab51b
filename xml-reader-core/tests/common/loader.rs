//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;
use xml_reader_core::ReaderConfig;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub xml: String,
    /// Reader options; omitted fields keep their defaults
    #[serde(default)]
    pub config: ReaderConfig,
    /// Expected event names, in publication order
    pub events: Vec<String>,
    /// Expected `dump` of the completed document, if any
    #[serde(default)]
    pub tree: Option<String>,
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
