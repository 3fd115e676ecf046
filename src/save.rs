//! Save file I/O: the dual-document YAML format, timestamped backups and
//! restore.
//!
//! An OpenXcom save is one text file holding either a single YAML document
//! (the game state) or two — a small metadata header (engine, version,
//! display name, enabled mods) followed by `---` and the game state. The
//! header is opaque here: it is kept aside at load and re-emitted ahead of
//! the game document on every save, or not at all if the file never had one.

use crate::statics;
use crate::value::Value;
use anyhow::{Context, bail};
use chrono::{DateTime, Local};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub exists: bool,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub backups_available: usize,
}

/// One backup file with the details a restore picker shows.
#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Handle to one save file on disk plus its backup directory.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
    backup_dir: PathBuf,
    header: Option<Value>,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_dir = path
            .parent()
            .map(|p| p.join(statics::BACKUP_DIR))
            .unwrap_or_else(|| PathBuf::from(statics::BACKUP_DIR));
        Self {
            path,
            backup_dir,
            header: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The metadata document from the last load, if the file had one.
    pub fn header(&self) -> Option<&Value> {
        self.header.as_ref()
    }

    /// Load the save, returning the game document. A leading metadata
    /// document is stored on `self` for the next [`SaveFile::save`].
    pub fn load(&mut self) -> anyhow::Result<Value> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading save file {:?}", self.path))?;
        let mut documents = Value::parse_documents(&text)
            .with_context(|| format!("parsing YAML in {:?}", self.path))?;

        let game = match documents.len() {
            0 => bail!("no YAML documents found in {:?}", self.path),
            1 => {
                self.header = None;
                documents.remove(0)
            }
            _ => {
                self.header = Some(documents.remove(0));
                documents.remove(0)
            }
        };

        log::info!("loaded save {:?} (header: {})", self.path, self.header.is_some());
        Ok(game)
    }

    /// Serialize and overwrite the save file, re-emitting the metadata
    /// header first when one was present at load.
    pub fn save(&self, document: &Value) -> anyhow::Result<()> {
        let mut text = String::new();
        if let Some(header) = &self.header {
            text.push_str(&header.to_yaml().context("serializing save header")?);
            text.push_str(statics::DOC_SEPARATOR);
        }
        text.push_str(&document.to_yaml().context("serializing save document")?);

        fs::write(&self.path, text).with_context(|| format!("writing {:?}", self.path))?;
        log::info!("wrote save {:?}", self.path);
        Ok(())
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "save".to_owned())
    }

    fn backup_path(&self, tag: Option<&str>) -> PathBuf {
        let stamp = Local::now().format(statics::BACKUP_STAMP_FORMAT);
        let name = match tag {
            Some(tag) => format!("{}_{tag}_{stamp}.{}", self.stem(), statics::BACKUP_EXT),
            None => format!("{}_{stamp}.{}", self.stem(), statics::BACKUP_EXT),
        };
        self.backup_dir.join(name)
    }

    /// Copy the current on-disk file into `backups/` with a timestamp.
    /// The directory is created on first use.
    pub fn create_backup(&self) -> anyhow::Result<PathBuf> {
        if !self.path.exists() {
            bail!("cannot back up non-existent file {:?}", self.path);
        }
        fs::create_dir_all(&self.backup_dir)
            .with_context(|| format!("creating backup directory {:?}", self.backup_dir))?;

        let backup = self.backup_path(None);
        fs::copy(&self.path, &backup)
            .with_context(|| format!("copying {:?} to {:?}", self.path, backup))?;
        log::info!("created backup {backup:?}");
        Ok(backup)
    }

    /// Backups for this save, newest first.
    pub fn list_backups(&self) -> anyhow::Result<Vec<PathBuf>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.stem());

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)
            .with_context(|| format!("listing {:?}", self.backup_dir))?
        {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix)
                && path.extension().and_then(|e| e.to_str()) == Some(statics::BACKUP_EXT)
            {
                let modified = entry.metadata().and_then(|m| m.modified()).ok();
                backups.push((modified, path));
            }
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Backups with size and modification time, newest first.
    pub fn backup_entries(&self) -> anyhow::Result<Vec<BackupEntry>> {
        self.list_backups()?
            .into_iter()
            .map(|path| {
                let meta =
                    fs::metadata(&path).with_context(|| format!("reading metadata of {path:?}"))?;
                Ok(BackupEntry {
                    size: meta.len(),
                    modified: meta.modified().ok().map(DateTime::from),
                    path,
                })
            })
            .collect()
    }

    /// Overwrite the live save with `backup`'s bytes. The pre-restore state
    /// is first copied aside as its own `_before_restore_` backup.
    pub fn restore_backup(&self, backup: &Path) -> anyhow::Result<()> {
        if !backup.exists() {
            bail!("backup file not found: {backup:?}");
        }

        if self.path.exists() {
            fs::create_dir_all(&self.backup_dir)
                .with_context(|| format!("creating backup directory {:?}", self.backup_dir))?;
            let safety = self.backup_path(Some(statics::BACKUP_RESTORE_TAG));
            fs::copy(&self.path, &safety)
                .with_context(|| format!("snapshotting current save to {safety:?}"))?;
        }

        fs::copy(backup, &self.path)
            .with_context(|| format!("restoring {backup:?} over {:?}", self.path))?;
        log::info!("restored {:?} from {backup:?}", self.path);
        Ok(())
    }

    /// Size/mtime/backup-count summary for display.
    pub fn info(&self) -> FileInfo {
        let Ok(meta) = fs::metadata(&self.path) else {
            return FileInfo {
                exists: false,
                size: 0,
                modified: None,
                backups_available: 0,
            };
        };
        FileInfo {
            exists: true,
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::from),
            backups_available: self.list_backups().map(|b| b.len()).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SaveFile;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    const DUAL_DOC: &str = concat!(
        "name: Skirmish\n",
        "version: 7.1.4\n",
        "engine: OpenXcom\n",
        "---\n",
        "funds:\n- 100\n- 200\n",
        "bases: []\n",
    );

    #[test]
    fn load_keeps_header_aside_and_save_reemits_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skirmish.sav");
        std::fs::write(&path, DUAL_DOC).unwrap();

        let mut file = SaveFile::new(&path);
        let doc = file.load().unwrap();
        assert!(file.header().is_some());
        assert!(doc.get("funds").is_some());
        assert!(doc.get("name").is_none(), "header keys stay out of the game doc");

        file.save(&doc).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let docs = Value::parse_documents(&written).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get("engine").and_then(Value::as_str), Some("OpenXcom"));
    }

    #[test]
    fn single_document_saves_without_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.sav");
        std::fs::write(&path, "funds:\n- 1\n- 2\nbases: []\n").unwrap();

        let mut file = SaveFile::new(&path);
        let doc = file.load().unwrap();
        assert!(file.header().is_none());

        file.save(&doc).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("---"));
    }

    #[test]
    fn backups_are_listed_newest_first_and_filtered_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.sav");
        std::fs::write(&path, "funds: []\n").unwrap();

        let file = SaveFile::new(&path);
        assert_eq!(file.list_backups().unwrap().len(), 0);

        let first = file.create_backup().unwrap();
        // An unrelated file in backups/ must not show up.
        std::fs::write(dir.path().join("backups").join("other_x.bak"), "x").unwrap();
        let second = file.create_backup().unwrap();

        let listed = file.list_backups().unwrap();
        assert!(listed.contains(&first));
        assert!(listed.contains(&second));
        assert_eq!(listed.len(), if first == second { 1 } else { 2 });

        let entries = file.backup_entries().unwrap();
        assert_eq!(entries.len(), listed.len());
        assert!(entries.iter().all(|e| e.size > 0));
    }

    #[test]
    fn restore_snapshots_current_file_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.sav");
        std::fs::write(&path, "funds:\n- 1\n- 2\nbases: []\n").unwrap();

        let file = SaveFile::new(&path);
        let backup = file.create_backup().unwrap();

        std::fs::write(&path, "funds:\n- 9\n- 9\nbases: []\n").unwrap();
        file.restore_backup(&backup).unwrap();

        let restored = std::fs::read_to_string(&path).unwrap();
        assert!(restored.contains("- 1"));

        let safety: Vec<_> = file
            .list_backups()
            .unwrap()
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .contains("before_restore")
            })
            .collect();
        assert_eq!(safety.len(), 1);
        let snap = std::fs::read_to_string(&safety[0]).unwrap();
        assert!(snap.contains("- 9"));
    }
}
