//! The result ledger: the ordered, in-memory collection of kept generations.
//!
//! The ledger is the only stateful structure with real invariants in this
//! crate: insertion order is significant (oldest first), ids are unique
//! within the sequence, and it grows only via [`Ledger::append`] and shrinks
//! only via [`Ledger::remove_by_id`]. It lives for one session and is never
//! persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One kept generation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Unique identifier (UUID v4), used only for removal; never displayed.
    pub id: Uuid,
    /// The question the user submitted.
    pub prompt: String,
    /// Sampling temperature used for this generation.
    pub temperature: f64,
    /// The generated response text.
    pub text: String,
    /// Reserved annotation field; always empty at creation.
    pub meta: String,
}

impl ResultEntry {
    /// Build a fresh entry with a new id and an empty `meta` field.
    pub fn new(prompt: impl Into<String>, temperature: f64, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            temperature,
            text: text.into(),
            meta: String::new(),
        }
    }
}

/// Ordered sequence of kept results for the current session.
///
/// Id uniqueness is an operating invariant, not an enforced one: entries are
/// only ever created through [`ResultEntry::new`], which generates a fresh
/// UUID per entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<ResultEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the sequence. Always succeeds; there is
    /// no capacity bound.
    pub fn append(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry with the given id, preserving the relative order of
    /// the rest. Removing an absent id is a no-op, which also makes the
    /// operation idempotent.
    pub fn remove_by_id(&mut self, id: Uuid) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, oldest first.
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prompt: &str) -> ResultEntry {
        ResultEntry::new(prompt, 0.5, "answer")
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.append(entry("first"));
        ledger.append(entry("second"));
        ledger.append(entry("third"));

        let prompts: Vec<_> = ledger.entries().iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, ["first", "second", "third"]);
    }

    #[test]
    fn fresh_entries_get_distinct_ids_and_empty_meta() {
        let a = entry("a");
        let b = entry("b");
        assert_ne!(a.id, b.id);
        assert!(a.meta.is_empty());
    }

    #[test]
    fn remove_by_id_keeps_remaining_order() {
        let mut ledger = Ledger::new();
        let a = entry("a");
        let b = entry("b");
        let c = entry("c");
        let b_id = b.id;
        ledger.append(a.clone());
        ledger.append(b);
        ledger.append(c.clone());

        ledger.remove_by_id(b_id);

        assert_eq!(ledger.entries(), [a, c]);
    }

    #[test]
    fn remove_by_id_is_idempotent() {
        let mut ledger = Ledger::new();
        let kept = entry("kept");
        let gone = entry("gone");
        let gone_id = gone.id;
        ledger.append(kept);
        ledger.append(gone);

        ledger.remove_by_id(gone_id);
        let after_once = ledger.clone();
        ledger.remove_by_id(gone_id);

        assert_eq!(ledger.entries(), after_once.entries());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn remove_of_absent_id_is_a_no_op() {
        let mut ledger = Ledger::new();
        ledger.append(entry("only"));

        ledger.remove_by_id(Uuid::new_v4());

        assert_eq!(ledger.len(), 1);
    }
}
