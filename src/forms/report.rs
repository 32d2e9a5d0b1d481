//! Per-field and per-widget results of a fill run.

use super::kind::FieldKind;
use crate::error::Result;
use std::fmt;

/// What happened to one widget or one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value was written
    Applied,
    /// Nothing was written, on purpose
    Skipped(String),
    /// Writing failed; the node was left as it was
    Failed(String),
}

impl Outcome {
    /// Map a mutation result to an outcome.
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Applied,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    /// Fold widget outcomes into one field outcome.
    pub fn combine(widgets: &[Outcome]) -> Self {
        let failed = widgets.iter().filter(|o| o.is_failed()).count();
        if failed == 0 {
            Outcome::Applied
        } else {
            Outcome::Failed(format!("{} of {} widgets failed", failed, widgets.len()))
        }
    }

    /// Whether the value was written.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Whether the field was deliberately skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    /// Whether writing failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => f.write_str("applied"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Result of binding one answered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// Logical field name
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Overall outcome
    pub outcome: Outcome,
    /// Outcome per widget, in field order
    pub widgets: Vec<Outcome>,
}

impl FieldReport {
    /// Report for a field that was not touched at all.
    pub fn skipped(name: &str, kind: FieldKind, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            outcome: Outcome::Skipped(reason.into()),
            widgets: Vec::new(),
        }
    }

    /// Report built from widget outcomes.
    pub fn from_widgets(name: &str, kind: FieldKind, widgets: Vec<Outcome>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            outcome: Outcome::combine(&widgets),
            widgets,
        }
    }
}

/// Everything a fill run did.
#[derive(Debug, Clone, Default)]
pub struct BindReport {
    /// Answered fields, single-valued fields first, then button groups
    pub fields: Vec<FieldReport>,
    /// Logical fields without an answer (left untouched)
    pub unanswered: Vec<String>,
    /// Answer keys that match no field
    pub unmatched_answers: Vec<String>,
}

impl BindReport {
    /// Fields written successfully.
    pub fn applied(&self) -> usize {
        self.fields.iter().filter(|f| f.outcome.is_applied()).count()
    }

    /// Fields skipped on purpose.
    pub fn skipped(&self) -> usize {
        self.fields.iter().filter(|f| f.outcome.is_skipped()).count()
    }

    /// Fields with at least one failed widget.
    pub fn failed(&self) -> usize {
        self.fields.iter().filter(|f| f.outcome.is_failed()).count()
    }

    /// Report for a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for BindReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} skipped, {} failed, {} unanswered, {} unmatched answers",
            self.applied(),
            self.skipped(),
            self.failed(),
            self.unanswered.len(),
            self.unmatched_answers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_combine_outcomes() {
        assert_eq!(Outcome::combine(&[Outcome::Applied, Outcome::Applied]), Outcome::Applied);
        assert_eq!(Outcome::combine(&[]), Outcome::Applied);

        let combined = Outcome::combine(&[Outcome::Applied, Outcome::Failed("bad /AP".into())]);
        assert_eq!(combined, Outcome::Failed("1 of 2 widgets failed".into()));
    }

    #[test]
    fn test_from_result() {
        assert!(Outcome::from_result(Ok(())).is_applied());
        let failed = Outcome::from_result(Err(Error::InvalidPdf("gone".into())));
        assert!(failed.is_failed());
        assert!(failed.to_string().contains("gone"));
    }

    #[test]
    fn test_report_counts() {
        let report = BindReport {
            fields: vec![
                FieldReport::from_widgets("name", FieldKind::Text, vec![Outcome::Applied]),
                FieldReport::skipped("sig", FieldKind::Unknown, "unknown field type"),
                FieldReport::from_widgets(
                    "q1",
                    FieldKind::Radio,
                    vec![Outcome::Applied, Outcome::Failed("x".into())],
                ),
            ],
            unanswered: vec!["q2".into()],
            unmatched_answers: Vec::new(),
        };
        assert_eq!(report.applied(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.field("sig").map(|f| f.kind), Some(FieldKind::Unknown));
        assert_eq!(
            report.to_string(),
            "1 applied, 1 skipped, 1 failed, 1 unanswered, 0 unmatched answers"
        );
    }
}
