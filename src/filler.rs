//! End-to-end fill and verify runs.
//!
//! [`FormFiller`] ties the pieces together the way the command line tools use
//! them: inputs are checked before anything is loaded, the output document is
//! rendered in memory and written once.

use crate::answers::AnswerSet;
use crate::config::FillConfig;
use crate::document::FormDocument;
use crate::error::Result;
use crate::forms::{fill_document, verify_document, BindReport, VerifyReport};
use crate::overrides::OverrideTable;

/// Runs fill and verify passes for one configuration.
#[derive(Debug, Clone)]
pub struct FormFiller {
    config: FillConfig,
}

impl FormFiller {
    /// Create a filler.
    pub fn new(config: FillConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Fill the input document and write the output document.
    ///
    /// Missing inputs fail before anything is read. Field-level problems are
    /// reported in the returned [`BindReport`] and never prevent the write.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_acrofill::config::FillConfig;
    /// use pdf_acrofill::filler::FormFiller;
    ///
    /// let config = FillConfig::new("dbq_files/form.pdf", "json_data/answers.json")
    ///     .with_output("dbq_files_generated/filled_form.pdf");
    /// let report = FormFiller::new(config).fill()?;
    /// println!("{}", report);
    /// # Ok::<(), pdf_acrofill::error::Error>(())
    /// ```
    pub fn fill(&self) -> Result<BindReport> {
        self.config.validate_inputs(&self.config.input_path)?;
        let answers = AnswerSet::from_file(&self.config.answers_path)?;
        let overrides = self.load_overrides();

        let mut doc = FormDocument::open(&self.config.input_path)?;
        let report = fill_document(&mut doc, &answers, &overrides)?;

        if let Some(dir) = self.config.output_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        doc.save(&self.config.output_path)?;
        Ok(report)
    }

    /// Verify the output document against the answers.
    pub fn verify(&self) -> Result<VerifyReport> {
        self.config.validate_inputs(&self.config.output_path)?;
        let answers = AnswerSet::from_file(&self.config.answers_path)?;
        let overrides = self.load_overrides();

        let doc = FormDocument::open(&self.config.output_path)?;
        Ok(verify_document(&doc, &answers, &overrides))
    }

    /// The override table is optional: an unreadable one is logged and ignored.
    fn load_overrides(&self) -> OverrideTable {
        let path = self.config.resolved_overrides_path();
        match OverrideTable::from_file(&path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Ignoring override table {}: {}", path.display(), e);
                OverrideTable::new()
            },
        }
    }
}
