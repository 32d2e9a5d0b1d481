// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF AcroFill
//!
//! Fill PDF AcroForms from a flat answer set and verify the result.
//!
//! ## Core Features
//!
//! - **Field Directory**: resolves widgets to logical field names (own `/T` or the
//!   parent's) and groups checkbox/radio widgets in document order
//! - **Classification**: text, list, combo, checkbox, radio from `/FT` and `/Ff`
//!   (ISO 32000-1:2008 §12.7.3), with inheritance through `/Parent`
//! - **Button Groups**: yes/no answers, explicit indexes and per-group override
//!   tables resolved by one pure decision function
//! - **Verification**: re-reads a filled document and reports every button group
//!   whose state does not match its answer
//! - **NeedAppearances**: logical values only; viewers regenerate visuals
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_acrofill::config::FillConfig;
//! use pdf_acrofill::filler::FormFiller;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FillConfig::new("form.pdf", "answers.json").with_output("filled.pdf");
//! let filler = FormFiller::new(config);
//!
//! let report = filler.fill()?;
//! println!("{}", report);
//!
//! let check = filler.verify()?;
//! for mismatch in check.mismatches() {
//!     println!("Mismatch: {}", mismatch);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Document access
pub mod access;
pub mod document;

// Inputs
pub mod answers;
pub mod config;
pub mod overrides;

// Form engine
pub mod forms;

// Orchestration
pub mod filler;

// Re-exports
pub use access::{DocumentAccess, NodeId, PdfName, PdfValue};
pub use answers::{AnswerSet, AnswerValue};
pub use config::FillConfig;
pub use document::FormDocument;
pub use error::{Error, Result};
pub use filler::FormFiller;
pub use overrides::{IndexOverride, OverrideTable};
