//! Domain editors over the save document: funds, research, soldiers,
//! facilities, production and inventory.
//!
//! Read paths hand out lightweight views borrowed from the document; each
//! view carries its own coordinates so callers can feed it back into a
//! mutation. Mutations take `&mut ChangeTracker` plus coordinates — never a
//! view — so a stale handle cannot outlive the document it was read from.

use crate::statics;
use crate::value::{Mapping, Value};
use thiserror::Error;

pub mod facilities;
pub mod funds;
pub mod inventory;
pub mod production;
pub mod research;
pub mod soldiers;

/// Position of one entity inside the document: which base, and which slot in
/// that base's collection. Two enumerations of the same document yield views
/// that compare equal exactly when their coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coords {
    pub base: usize,
    pub entry: usize,
}

impl Coords {
    pub fn new(base: usize, entry: usize) -> Self {
        Self { base, entry }
    }
}

/// A mutation argument violated a documented constraint. Raised before any
/// write; the document is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{what} cannot be negative (got {value})")]
    NegativeAmount { what: &'static str, value: i64 },

    #[error("{what} must be positive (got {value})")]
    AmountNotPositive { what: &'static str, value: i64 },

    #[error("`{name}` is not a recognized soldier stat")]
    UnknownStat { name: String },

    #[error("stat `{name}` must be between {min} and {max} (got {value})")]
    StatOutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("production amount must be at least 1 (got {value})")]
    AmountTooSmall { value: i64 },

    #[error("unknown inventory copy mode `{mode}`")]
    UnknownCopyMode { mode: String },
}

/// Errors a domain mutation can surface: bad input, or a document whose shape
/// no longer matches the coordinates being addressed.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Path(#[from] crate::path::PathError),
}

/// The `bases` sequence, or an empty slice when absent or malformed.
/// A partially nonconforming save must still be browsable.
pub(crate) fn bases(doc: &Value) -> &[Value] {
    doc.get(statics::OX_BASES)
        .and_then(Value::as_sequence)
        .unwrap_or(&[])
}

/// Display name for a base, falling back to its 1-based position.
pub fn base_name(doc: &Value, base: usize) -> String {
    bases(doc)
        .get(base)
        .and_then(|b| b.get(statics::OX_NAME))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Base {}", base + 1))
}

/// Names of every base, in document order.
pub fn base_names(doc: &Value) -> Vec<String> {
    (0..bases(doc).len()).map(|i| base_name(doc, i)).collect()
}

/// Walk `bases[*].<collection>[*]`, yielding each well-formed entry with its
/// coordinates. Entries that are not mappings, and collections that are not
/// sequences, are skipped rather than reported.
pub(crate) fn collection_entries<'a>(
    doc: &'a Value,
    collection: &str,
) -> Vec<(Coords, &'a Mapping)> {
    let mut entries = Vec::new();
    for (base_index, base) in bases(doc).iter().enumerate() {
        let Some(list) = base.get(collection).and_then(Value::as_sequence) else {
            continue;
        };
        for (entry_index, entry) in list.iter().enumerate() {
            if let Some(map) = entry.as_mapping() {
                entries.push((Coords::new(base_index, entry_index), map));
            }
        }
    }
    entries
}

/// Format an OpenXcom string id for display: `STR_LASER_RIFLE` becomes
/// `Laser Rifle`.
pub fn display_label(raw: &str) -> String {
    let stripped = raw.strip_prefix(statics::STR_PREFIX).unwrap_or(raw);
    let mut out = String::with_capacity(stripped.len());
    for (i, word) in stripped.split('_').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}
