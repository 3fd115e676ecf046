//! The editing session: one save file, one change tracker, and the
//! commit/reset/restore state machine gluing them together.

use crate::changes::{self, ChangeReport};
use crate::domains::{self, EditError, facilities, funds, production, research, soldiers};
use crate::save::{BackupEntry, FileInfo, SaveFile};
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::validate::{StructuralValidationError, ValidationReport, validate_document};
use crate::value::Value;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Header/file metadata shown before editing starts.
#[derive(Debug, Clone, Serialize)]
pub struct SaveInfo {
    pub save_name: String,
    pub game_version: String,
    pub game_engine: String,
    pub difficulty: i64,
    pub months_passed: i64,
    pub days_passed: i64,
    pub base_names: Vec<String>,
    #[serde(skip)]
    pub file: FileInfo,
}

/// One-screen overview of the save's editable state.
#[derive(Debug, Clone, Serialize)]
pub struct QuickStatus {
    pub funds_current: i64,
    pub funds_previous: i64,
    pub research_active: usize,
    pub research_completed: usize,
    pub facilities_building: usize,
    pub facilities_completed: usize,
    pub production_active: usize,
    pub production_total: usize,
    pub soldier_count: usize,
    pub base_names: Vec<String>,
}

/// An open editing session over one save file.
///
/// The session owns the document exclusively; domain modules operate on it
/// through [`SaveEditor::tracker_mut`] or the quick-action wrappers below.
pub struct SaveEditor {
    file: SaveFile,
    tracker: ChangeTracker,
    session_backup: Option<PathBuf>,
}

impl SaveEditor {
    /// Load a save file and start a session against it.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let mut file = SaveFile::new(path);
        let document = file.load()?;
        Ok(Self {
            file,
            tracker: ChangeTracker::new(document),
            session_backup: None,
        })
    }

    /// The live working document.
    pub fn document(&self) -> &Value {
        self.tracker.current()
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn has_changes(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Metadata about the save, preferring the header document and falling
    /// back to the game document for saves without one.
    pub fn save_info(&self) -> SaveInfo {
        let doc = self.tracker.current();
        let meta = |key: &str| {
            self.file
                .header()
                .and_then(|h| h.get(key))
                .or_else(|| doc.get(key))
                .map(render_scalar)
                .unwrap_or_else(|| "Unknown".to_owned())
        };
        let int = |key: &str| doc.get(key).and_then(Value::as_i64).unwrap_or(0);

        SaveInfo {
            save_name: meta(statics::OX_HDR_NAME),
            game_version: meta(statics::OX_HDR_VERSION),
            game_engine: meta(statics::OX_HDR_ENGINE),
            difficulty: int(statics::OX_DIFFICULTY),
            months_passed: int(statics::OX_MONTHS_PASSED),
            days_passed: int(statics::OX_DAYS_PASSED),
            base_names: domains::base_names(doc),
            file: self.file.info(),
        }
    }

    pub fn quick_status(&self) -> QuickStatus {
        let doc = self.tracker.current();
        let (current, previous) = funds::display(doc);
        let (_, research_active, research_completed) = research::summary_counts(doc);
        let (_, building, facilities_completed) = facilities::summary_counts(doc);
        let (production_total, production_active) = production::summary_counts(doc);

        QuickStatus {
            funds_current: current,
            funds_previous: previous,
            research_active,
            research_completed,
            facilities_building: building,
            facilities_completed,
            production_active,
            production_total,
            soldier_count: soldiers::all(doc).len(),
            base_names: domains::base_names(doc),
        }
    }

    /// Structural validation of the working document.
    pub fn validate(&self) -> ValidationReport {
        validate_document(self.tracker.current())
    }

    /// Diff the working document against the last committed baseline.
    pub fn summarize_changes(&self) -> ChangeReport {
        changes::summarize(self.tracker.original(), self.tracker.current())
    }

    /// Back up the on-disk file, once per session. Later calls return the
    /// same backup: the session's starting point is the rollback target.
    pub fn create_backup(&mut self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.session_backup {
            return Ok(path.clone());
        }
        let path = self.file.create_backup()?;
        self.session_backup = Some(path.clone());
        Ok(path)
    }

    /// Persist the working document: backup (optional) → validate → write →
    /// rebase. A failure at any step leaves the file and tracker exactly as
    /// they were; in particular a validation failure keeps the dirty flag so
    /// the user can fix the data and retry.
    pub fn commit(&mut self, create_backup: bool) -> anyhow::Result<()> {
        if create_backup {
            self.create_backup().context("creating pre-commit backup")?;
        }

        let report = self.validate();
        for warning in &report.warnings {
            log::warn!("save validation: {warning}");
        }
        if !report.is_valid() {
            return Err(StructuralValidationError { report }.into());
        }

        self.file.save(self.tracker.current())?;
        self.tracker.rebase();
        Ok(())
    }

    /// Throw away every uncommitted edit. Views obtained before the reset
    /// addressed the old document and must be re-enumerated.
    pub fn reset_all(&mut self) {
        self.tracker.reset();
    }

    pub fn list_backups(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.file.list_backups()
    }

    /// Backups with the size/mtime details a restore picker shows.
    pub fn backup_entries(&self) -> anyhow::Result<Vec<BackupEntry>> {
        self.file.backup_entries()
    }

    /// Restore from `backup`, or from the most recent one when `None`.
    /// The session continues against the reloaded document; all previous
    /// views and coordinates are void.
    pub fn restore_backup(&mut self, backup: Option<&Path>) -> anyhow::Result<()> {
        let backup = match backup {
            Some(path) => path.to_path_buf(),
            None => self
                .file
                .list_backups()?
                .into_iter()
                .next()
                .context("no backups available")?,
        };

        self.file.restore_backup(&backup)?;
        let document = self.file.load()?;
        self.tracker.replace(document);
        Ok(())
    }

    // Quick actions, mirroring the most common editing flows.

    pub fn quick_set_funds(&mut self, amount: i64) -> Result<(), EditError> {
        funds::set_current(&mut self.tracker, amount)
    }

    pub fn quick_complete_all_research(&mut self) -> Result<usize, EditError> {
        research::complete_all(&mut self.tracker)
    }

    pub fn quick_complete_all_construction(&mut self) -> Result<usize, EditError> {
        facilities::complete_all(&mut self.tracker)
    }

    pub fn quick_complete_all_production(&mut self) -> Result<usize, EditError> {
        production::complete_all(&mut self.tracker)
    }

    pub fn quick_max_soldiers(&mut self, ceiling: i64) -> Result<usize, EditError> {
        soldiers::max_all(&mut self.tracker, ceiling)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_i64()
            .map(|v| v.to_string())
            .unwrap_or_else(|| n.as_f64().to_string()),
        Value::Bool(b) => b.to_string(),
        other => other.type_name().to_owned(),
    }
}
