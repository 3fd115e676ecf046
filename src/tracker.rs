//! Snapshot-based change tracking for one save document.
//!
//! A tracker owns the working document plus an immutable baseline taken at
//! load (and re-taken at each successful commit). The dirty flag is coarse:
//! any successful write sets it, and only `reset`, `rebase` or `replace`
//! clear it. Writing a field back to its original value does not clear it —
//! "what changed" questions are answered by diffing the two snapshots on
//! demand, not by bookkeeping per write.

use crate::path::{self, PathError};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct ChangeTracker {
    original: Value,
    current: Value,
    dirty: bool,
}

impl ChangeTracker {
    pub fn new(document: Value) -> Self {
        Self {
            original: document.clone(),
            current: document,
            dirty: false,
        }
    }

    /// The live working document.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// The baseline snapshot. Never mutated in place; only whole-snapshot
    /// replacement (`rebase`, `replace`) updates it.
    pub fn original(&self) -> &Value {
        &self.original
    }

    /// Read from the working document. Side-effect free.
    pub fn read(&self, path: &str) -> Result<Option<&Value>, PathError> {
        path::get_path(&self.current, path)
    }

    /// Read from the baseline snapshot. Side-effect free.
    pub fn read_original(&self, path: &str) -> Result<Option<&Value>, PathError> {
        path::get_path(&self.original, path)
    }

    /// Write into the working document and mark it dirty. A failed write
    /// (structural mismatch) leaves the dirty flag untouched.
    pub fn write(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        path::set_path(&mut self.current, path, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Discard all edits: the working document becomes a fresh copy of the
    /// baseline. Any outstanding views into the old document are gone —
    /// enumerations must be redone.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.dirty = false;
    }

    /// Adopt the working document as the new baseline. Called after the
    /// document has been successfully persisted.
    pub fn rebase(&mut self) {
        self.original = self.current.clone();
        self.dirty = false;
    }

    /// Swap in a different document wholesale (restore, reload). Both
    /// snapshots are rebuilt from it and the dirty flag clears.
    pub fn replace(&mut self, document: Value) {
        self.original = document.clone();
        self.current = document;
        self.dirty = false;
    }
}
