//! Test harness for running fixtures with chunking variations

use std::fmt::Write;

use crate::common::{Gen, TestCase};
use xml_reader_core::{Document, Notification, NodeRef, Reader, ReaderConfig};

/// Everything observable from one read of an input
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub events: Vec<String>,
    pub tree: Option<String>,
}

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub chunks: Vec<String>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Render a subtree as indented lines: `<name k="v">` for elements, the
/// quoted value for text.
pub fn dump(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    dump_into(node, 0, &mut out);
    out
}

fn dump_into(node: NodeRef<'_>, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    if node.is_text() {
        let _ = writeln!(out, "{:?}", node.value());
        return;
    }
    out.push('<');
    out.push_str(node.name());
    for (key, value) in node.attributes().iter() {
        let _ = write!(out, " {}={:?}", key, value);
    }
    out.push_str(">\n");
    for child in node.children() {
        dump_into(child, depth + 1, out);
    }
}

/// Read `chunks` with a fresh reader, collecting event names and the final tree
pub fn read_chunks(config: &ReaderConfig, chunks: &[&str]) -> Run {
    let prefix = config.tag_prefix.clone();
    let done = config.done_event.clone();
    let mut events = Vec::new();
    let document: Option<Document>;
    {
        let mut reader = Reader::new(config.clone());
        reader.on_notification(|n| {
            events.push(match n {
                Notification::Element(node) => format!("{}{}", prefix, node.name()),
                Notification::Document(_) => done.clone(),
            })
        });
        for chunk in chunks {
            reader.parse(chunk);
        }
        document = reader.take_document();
    }
    Run {
        events,
        tree: document.map(|doc| dump(doc.root())),
    }
}

fn check(case: &TestCase, run: &Run, chunks: &[&str], seed: u64) -> TestResult {
    let mut errors = Vec::new();

    if run.events != case.events {
        errors.push(format!(
            "Events mismatch: expected {:?}, got {:?}",
            case.events, run.events
        ));
    }

    if let Some(expected_tree) = &case.tree {
        match &run.tree {
            Some(actual) if actual == expected_tree => {}
            Some(actual) => errors.push(format!(
                "Tree mismatch:\n--- expected\n{}--- actual\n{}",
                expected_tree, actual
            )),
            None => errors.push("Document never completed".to_string()),
        }
    }

    TestResult {
        passed: errors.is_empty(),
        chunks: chunks.iter().map(|c| c.to_string()).collect(),
        expected: case.events.clone(),
        actual: run.events.clone(),
        seed,
        errors,
    }
}

/// Run a single test case (whole input, one chunk)
pub fn run_test(case: &TestCase) -> TestResult {
    let chunks = [case.xml.as_str()];
    let run = read_chunks(&case.config, &chunks);
    check(case, &run, &chunks, 0)
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of inert markup (prolog, doctype, comments) above
/// - random chunking, from single characters up to 16 at a time
/// - 40% chance of inert markup below
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = String::new();
    if gen.chance(0.4) {
        input.push_str(&gen.inert_markup());
    }
    input.push_str(&case.xml);
    if gen.chance(0.4) {
        input.push_str(&gen.inert_markup());
    }

    let max_len = if gen.chance(0.3) { 1 } else { 16 };
    let chunks = gen.split(&input, max_len);
    let run = read_chunks(&case.config, &chunks);
    check(case, &run, &chunks, gen.seed)
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!(
            "Seed: {} (set XML_READER_TEST_SEED={} to reproduce)",
            self.seed, self.seed
        );
        eprintln!("\nChunks: {:?}", self.chunks);
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
