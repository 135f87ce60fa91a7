//! Batch id generation.
//!
//! Ids follow the `{PREFIX}-{HERB3}{SEQ}` display convention (e.g.
//! `HB-TUR001` for the first turmeric batch). Uniqueness is the only hard
//! invariant; the generator collision-checks every candidate against the
//! caller's store before handing it out.

use std::sync::atomic::{AtomicU64, Ordering};

/// Collision-checked sequential batch id generator.
pub struct BatchIdGenerator {
    prefix: String,
    next_seq: AtomicU64,
}

impl BatchIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Generate the next free id for `herb_name`.
    ///
    /// `exists` is queried for every candidate; taken ids are skipped, so a
    /// caller seeding the store with externally created ids never collides.
    pub fn next_id(&self, herb_name: &str, exists: impl Fn(&str) -> bool) -> String {
        loop {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{}-{}{:03}", self.prefix, herb_code(herb_name), seq);
            if !exists(&candidate) {
                return candidate;
            }
        }
    }
}

/// Three-letter uppercase herb code, padded with `X` for short names.
fn herb_code(herb_name: &str) -> String {
    let mut code: String = herb_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();
    while code.len() < 3 {
        code.push('X');
    }
    code
}
