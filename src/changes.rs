//! On-demand change summaries.
//!
//! Nothing here accumulates state during writes: a summary is a pure diff of
//! the tracker's two snapshots at the moment it is requested, so edits that
//! are overwritten or reverted cost nothing and reports cannot drift out of
//! sync with the document.

use crate::domains::{facilities, funds, inventory, production, research, soldiers};
use crate::value::Value;
use serde::Serialize;

/// One human-readable change: which field, and before/after text produced by
/// the owning domain. Coarse by design — not a value-level diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub field: String,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeReport {
    pub entries: Vec<ChangeEntry>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("No changes.");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {} -> {}", entry.field, entry.before, entry.after)?;
        }
        Ok(())
    }
}

/// Diff two document snapshots across every domain.
pub fn summarize(original: &Value, current: &Value) -> ChangeReport {
    let mut entries = Vec::new();
    entries.extend(funds::changes(original, current));
    entries.extend(research::changes(original, current));
    entries.extend(soldiers::changes(original, current));
    entries.extend(facilities::changes(original, current));
    entries.extend(production::changes(original, current));
    entries.extend(inventory::changes(original, current));
    ChangeReport { entries }
}

/// Thousands-grouped rendering for funds amounts: 2696270 -> "2,696,270".
pub(crate) fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i % 3 == lead % 3 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
