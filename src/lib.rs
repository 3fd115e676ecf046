//! Core library for OXSE, an OpenXcom save game editor.
//! Models the dual-document YAML save format, provides path-addressed
//! mutation with snapshot/rollback change tracking, and layers the domain
//! editors (funds, research, soldiers, facilities, production, inventory)
//! plus backup/commit/restore on top. Front-ends supply the presentation.

mod changes;
pub mod domains;
mod editor;
pub mod path;
mod save;
pub mod statics;
mod tracker;
mod validate;
mod value;

pub use changes::{ChangeEntry, ChangeReport};
pub use domains::{Coords, EditError, ValidationError};
pub use editor::{QuickStatus, SaveEditor, SaveInfo};
pub use path::PathError;
pub use save::{BackupEntry, FileInfo, SaveFile};
pub use tracker::ChangeTracker;
pub use validate::{StructuralValidationError, ValidationReport, validate_document};
pub use value::{Mapping, Number, Value};
