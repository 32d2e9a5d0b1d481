//! AcroForm filling and verification.
//!
//! The engine runs in four steps over a [`DocumentAccess`](crate::access::DocumentAccess):
//!
//! 1. [`FieldDirectory::build`] resolves widgets to logical field names and
//!    groups checkbox/radio widgets.
//! 2. [`FieldKind`] classifies each field from `/FT` and `/Ff`.
//! 3. [`resolve_selection`] decides which widget of a button group is on.
//! 4. [`fill_document`] writes values; [`verify_document`] reads them back.

pub mod binder;
pub mod directory;
pub mod inventory;
pub mod kind;
pub mod report;
pub mod resolver;
pub mod verify;

pub use binder::{bind_directory, fill_document};
pub use directory::{logical_name, ButtonGroup, FieldDirectory, FieldEntry};
pub use inventory::{answer_template, qualified_names, summarize, FieldSummary};
pub use kind::{FieldFlags, FieldKind};
pub use report::{BindReport, FieldReport, Outcome};
pub use resolver::{apply_selection, on_state, resolve_selection, GroupShape};
pub use verify::{verify_document, Expectation, MatchResult, VerifyReport};
