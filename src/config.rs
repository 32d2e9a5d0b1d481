//! Configuration for a fill/verify run.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File name looked up beside the answers file when no override table is given.
pub const DEFAULT_OVERRIDES_FILE: &str = "button_overrides.json";

/// Prefix of the default output file name.
pub const DEFAULT_OUTPUT_PREFIX: &str = "filled_";

/// Paths used by one run.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Document to fill
    pub input_path: PathBuf,

    /// JSON answers
    pub answers_path: PathBuf,

    /// Where the filled document is written (and read back for verification)
    pub output_path: PathBuf,

    /// Optional override table; defaults to `button_overrides.json` beside the answers
    pub overrides_path: Option<PathBuf>,
}

impl FillConfig {
    /// Create a configuration with the default output and override locations.
    ///
    /// The output defaults to `filled_<input file name>` in the input's directory.
    pub fn new(input_path: impl Into<PathBuf>, answers_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_path = default_output_path(&input_path);
        Self {
            input_path,
            answers_path: answers_path.into(),
            output_path,
            overrides_path: None,
        }
    }

    /// Set the output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the override table path.
    pub fn with_overrides(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides_path = Some(path.into());
        self
    }

    /// Override table location, explicit or derived from the answers path.
    pub fn resolved_overrides_path(&self) -> PathBuf {
        match &self.overrides_path {
            Some(path) => path.clone(),
            None => self
                .answers_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_OVERRIDES_FILE),
        }
    }

    /// Check that the answers file and `document` exist.
    ///
    /// Runs before anything is loaded so missing inputs are reported
    /// before any processing begins.
    pub fn validate_inputs(&self, document: &Path) -> Result<()> {
        if !self.answers_path.exists() {
            return Err(Error::AnswersNotFound(self.answers_path.clone()));
        }
        if !document.exists() {
            return Err(Error::DocumentNotFound(document.to_path_buf()));
        }
        Ok(())
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "form.pdf".to_string());
    input.with_file_name(format!("{}{}", DEFAULT_OUTPUT_PREFIX, file_name))
}
