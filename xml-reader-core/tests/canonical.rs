//! Canonical tests loaded from YAML fixtures
//!
//! Runs each fixture test case:
//! 1. Canonical (whole input in one chunk → exact events and tree)
//! 2. One character per chunk
//! 3. With variations (random chunking, inert markup around the document)

mod common;

use common::{load_fixtures_by_name, read_chunks, run_test, run_with_variations, Gen};

/// Run canonical tests for a fixture file
fn run_fixture(name: &str) {
    let cases = load_fixtures_by_name(name);
    assert!(!cases.is_empty(), "fixture {name} has no cases");

    let mut gen = Gen::from_env_or_random();
    let mut failures = Vec::new();

    let variation_count = std::env::var("XML_READER_TEST_COUNT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);

    for case in &cases {
        // Canonical test (exact match)
        let result = run_test(case);
        if !result.passed {
            result.print_failure(&format!("{}::{} (canonical)", name, case.id));
            failures.push(format!("{}::{}", name, case.id));
        }

        // Single characters must read exactly like the whole input
        let chars: Vec<String> = case.xml.chars().map(String::from).collect();
        let chunks: Vec<&str> = chars.iter().map(String::as_str).collect();
        let whole = read_chunks(&case.config, &[case.xml.as_str()]);
        if read_chunks(&case.config, &chunks) != whole {
            eprintln!("\n=== FAILED: {}::{} (per character) ===", name, case.id);
            failures.push(format!("{}::{} (chars)", name, case.id));
        }

        for i in 0..variation_count {
            let result = run_with_variations(case, &mut gen);
            if !result.passed {
                result.print_failure(&format!("{}::{} (variation {})", name, case.id, i));
                failures.push(format!("{}::{} (var {})", name, case.id, i));
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} tests failed:\n  {}\n\nSeed: {} (set XML_READER_TEST_SEED={} to reproduce)",
            failures.len(),
            failures.join("\n  "),
            gen.seed,
            gen.seed
        );
    }
}

#[test]
fn test_documents() {
    run_fixture("documents");
}
