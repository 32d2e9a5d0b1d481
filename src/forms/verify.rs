//! Verification of a filled document.
//!
//! Re-reads button groups and checks that the widgets that are "on" are the
//! ones [`resolve_selection`] picks for the same answers. A widget counts as
//! on when its `/AS` names one of its own non-`Off` appearance states. Only
//! appearance data is read; nothing is written.

use super::directory::{ButtonGroup, FieldDirectory};
use super::resolver::{resolve_selection, GroupShape};
use crate::access::{DocumentAccess, NodeId, PdfName};
use crate::answers::{AnswerSet, AnswerValue};
use crate::overrides::OverrideTable;
use std::fmt;

/// What a group should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Single widget: on or off
    Checked(bool),
    /// Several widgets: exactly this one on
    Selected(usize),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Checked(true) => f.write_str("checked"),
            Expectation::Checked(false) => f.write_str("unchecked"),
            Expectation::Selected(index) => write!(f, "index {}", index),
        }
    }
}

/// Comparison of one button group against its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Logical field name
    pub name: String,
    /// Answer the document was filled with
    pub expected: AnswerValue,
    /// Selection that answer resolves to
    pub expectation: Expectation,
    /// Indexes of widgets whose appearance state is not `Off`
    pub observed: Vec<usize>,
    /// Raw `/AS` of every widget
    pub states: Vec<Option<PdfName>>,
    /// Whether observed matches expectation
    pub passed: bool,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<String> = self
            .states
            .iter()
            .map(|s| s.as_ref().map_or_else(|| "-".to_string(), PdfName::to_string))
            .collect();
        write!(
            f,
            "{}: expected {} ({}), observed {:?}, states {:?}",
            self.name, self.expected, self.expectation, self.observed, states
        )
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// One result per answered button group, in document order
    pub results: Vec<MatchResult>,
}

impl VerifyReport {
    /// Number of groups checked.
    pub fn checked(&self) -> usize {
        self.results.len()
    }

    /// Groups that did not match.
    pub fn mismatches(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Number of groups that did not match.
    pub fn mismatch_count(&self) -> usize {
        self.mismatches().count()
    }

    /// True when every checked group matched.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Result for a group by name.
    pub fn result(&self, name: &str) -> Option<&MatchResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Check every answered button group of `doc`.
pub fn verify_document<D: DocumentAccess + ?Sized>(
    doc: &D,
    answers: &AnswerSet,
    overrides: &OverrideTable,
) -> VerifyReport {
    let directory = FieldDirectory::build(doc);
    let mut report = VerifyReport::default();

    for group in directory.groups() {
        let Some(expected) = answers.get(&group.name) else {
            continue;
        };
        if let Some(result) = check_group(doc, group, expected, overrides) {
            if !result.passed {
                log::warn!("Mismatch: {}", result);
            }
            report.results.push(result);
        }
    }

    log::info!(
        "Verified {} groups, {} mismatches",
        report.checked(),
        report.mismatch_count()
    );
    report
}

fn check_group<D: DocumentAccess + ?Sized>(
    doc: &D,
    group: &ButtonGroup,
    expected: &AnswerValue,
    overrides: &OverrideTable,
) -> Option<MatchResult> {
    let answer = expected.normalize();
    let selection = resolve_selection(GroupShape::of(group), &answer, overrides.get(&group.name));
    let expectation = match (group.is_single(), selection) {
        (true, selection) => Expectation::Checked(selection.is_some()),
        (false, Some(index)) => Expectation::Selected(index),
        (false, None) => return None,
    };

    let states: Vec<Option<PdfName>> = group
        .widgets
        .iter()
        .map(|&widget| doc.appearance_state(widget))
        .collect();
    let observed: Vec<usize> = group
        .widgets
        .iter()
        .zip(&states)
        .enumerate()
        .filter_map(|(index, (&widget, state))| is_on(doc, widget, state.as_ref()).then_some(index))
        .collect();

    let passed = match expectation {
        Expectation::Checked(checked) => !observed.is_empty() == checked,
        Expectation::Selected(index) => observed == [index],
    };

    Some(MatchResult {
        name: group.name.clone(),
        expected: expected.clone(),
        expectation,
        observed,
        states,
        passed,
    })
}

fn is_on<D: DocumentAccess + ?Sized>(doc: &D, widget: NodeId, state: Option<&PdfName>) -> bool {
    let Some(state) = state.filter(|state| names_a_state(state)) else {
        return false;
    };
    match doc.appearance_states(widget) {
        Ok(Some(names)) => {
            let known = names.contains(state);
            if !known {
                log::debug!("Widget {} has /AS {} outside its appearance map", widget, state);
            }
            known
        },
        // No state map to check against
        Ok(None) | Err(_) => true,
    }
}

fn names_a_state(state: &PdfName) -> bool {
    !state.is_empty() && !state.is_off()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_a_state() {
        assert!(names_a_state(&PdfName::from("Yes")));
        assert!(names_a_state(&PdfName::from("Choice2")));
        assert!(names_a_state(&PdfName::new(vec![0xC9])));
        assert!(!names_a_state(&PdfName::off()));
        assert!(!names_a_state(&PdfName::new(Vec::new())));
    }

    #[test]
    fn test_expectation_display() {
        assert_eq!(Expectation::Checked(true).to_string(), "checked");
        assert_eq!(Expectation::Checked(false).to_string(), "unchecked");
        assert_eq!(Expectation::Selected(2).to_string(), "index 2");
    }

    #[test]
    fn test_mismatch_line() {
        let result = MatchResult {
            name: "Q3".to_string(),
            expected: AnswerValue::Text("yes".to_string()),
            expectation: Expectation::Selected(1),
            observed: vec![0],
            states: vec![Some(PdfName::from("No")), Some(PdfName::off())],
            passed: false,
        };
        assert_eq!(
            result.to_string(),
            r#"Q3: expected "yes" (index 1), observed [0], states ["No", "Off"]"#
        );
    }

    #[test]
    fn test_empty_report_succeeds() {
        let report = VerifyReport::default();
        assert!(report.is_success());
        assert_eq!(report.checked(), 0);
        assert_eq!(report.mismatch_count(), 0);
    }
}
