//! Stochastic generators for chunking and wrapping variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("XML_READER_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Split input into random chunks on char boundaries.
    ///
    /// Chunk lengths are drawn from 1..=max_len characters.
    pub fn split<'a>(&mut self, input: &'a str, max_len: usize) -> Vec<&'a str> {
        let boundaries: Vec<usize> = input
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(input.len()))
            .collect();
        let mut chunks = Vec::new();
        let mut at = 0;
        while at + 1 < boundaries.len() {
            let step = self.rng.gen_range(1..=max_len.max(1));
            let next = (at + step).min(boundaries.len() - 1);
            chunks.push(&input[boundaries[at]..boundaries[next]]);
            at = next;
        }
        chunks
    }

    /// Markup that produces no tokens: prolog, doctype, comments, blank runs
    pub fn inert_markup(&mut self) -> String {
        let mut out = String::new();
        if self.chance(0.5) {
            out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        }
        if self.chance(0.3) {
            out.push_str("<!DOCTYPE doc [ <!ELEMENT doc ANY> ]>\n");
        }
        if self.chance(0.5) {
            out.push_str("<!-- generated <not a tag> -->");
        }
        let blanks = self.rng.gen_range(0..3);
        for _ in 0..blanks {
            out.push_str(if self.chance(0.5) { "\n" } else { "  \t" });
        }
        out
    }
}
