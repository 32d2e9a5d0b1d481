//! Value binding.
//!
//! Applies an [`AnswerSet`] to a document's fields according to each field's
//! kind, then asks viewers to regenerate appearances. Fields without an
//! answer are never touched.

use super::directory::{ButtonGroup, FieldDirectory, FieldEntry};
use super::kind::FieldKind;
use super::report::{BindReport, FieldReport, Outcome};
use super::resolver::{apply_selection, resolve_selection, value_holder, GroupShape};
use crate::access::{DocumentAccess, NodeId, PdfName, PdfValue};
use crate::answers::{AnswerSet, AnswerValue};
use crate::error::Result;
use crate::overrides::OverrideTable;

/// Fill every answered field of `doc`.
///
/// Field-level problems end up in the returned report; only a failure to set
/// the form-level `NeedAppearances` hint is returned as an error.
///
/// # Example
///
/// ```no_run
/// use pdf_acrofill::answers::AnswerSet;
/// use pdf_acrofill::document::FormDocument;
/// use pdf_acrofill::forms::fill_document;
/// use pdf_acrofill::overrides::OverrideTable;
///
/// let mut doc = FormDocument::open("form.pdf")?;
/// let answers = AnswerSet::from_file("answers.json")?;
/// let report = fill_document(&mut doc, &answers, &OverrideTable::new())?;
/// println!("{}", report);
/// doc.save("filled.pdf")?;
/// # Ok::<(), pdf_acrofill::error::Error>(())
/// ```
pub fn fill_document<D: DocumentAccess + ?Sized>(
    doc: &mut D,
    answers: &AnswerSet,
    overrides: &OverrideTable,
) -> Result<BindReport> {
    let directory = FieldDirectory::build(&*doc);
    let report = bind_directory(doc, &directory, answers, overrides);
    doc.set_need_appearances()?;
    log::info!("Fill finished: {}", report);
    Ok(report)
}

/// Bind answers to the fields of an already built directory.
pub fn bind_directory<D: DocumentAccess + ?Sized>(
    doc: &mut D,
    directory: &FieldDirectory,
    answers: &AnswerSet,
    overrides: &OverrideTable,
) -> BindReport {
    let mut report = BindReport::default();

    for entry in directory.fields() {
        match answers.get(&entry.name) {
            Some(value) => report.fields.push(bind_field(doc, entry, value)),
            None => {
                log::debug!("No answer for field '{}'", entry.name);
                report.unanswered.push(entry.name.clone());
            },
        }
    }

    for group in directory.groups() {
        match answers.get(&group.name) {
            Some(value) => report.fields.push(bind_group(doc, group, value, overrides)),
            None => {
                log::debug!("No answer for button group '{}'", group.name);
                report.unanswered.push(group.name.clone());
            },
        }
    }

    report.unmatched_answers = answers
        .names()
        .filter(|name| !directory.contains(name))
        .map(str::to_string)
        .collect();
    for name in &report.unmatched_answers {
        log::debug!("Answer '{}' matches no field", name);
    }

    report
}

fn bind_field<D: DocumentAccess + ?Sized>(
    doc: &mut D,
    entry: &FieldEntry,
    value: &AnswerValue,
) -> FieldReport {
    let text = value.as_text();
    let outcomes: Vec<Outcome> = match entry.kind {
        FieldKind::Text => entry
            .widgets
            .iter()
            .map(|&widget| Outcome::from_result(write_text(doc, widget, &text)))
            .collect(),
        FieldKind::List | FieldKind::Combo => entry
            .widgets
            .iter()
            .map(|&widget| Outcome::from_result(write_choice(doc, widget, &text)))
            .collect(),
        FieldKind::Unknown => {
            log::warn!("Field '{}' has an unknown type; skipping", entry.name);
            return FieldReport::skipped(&entry.name, entry.kind, "unknown field type");
        },
        FieldKind::Checkbox | FieldKind::Radio => {
            return FieldReport::skipped(&entry.name, entry.kind, "button widget outside a group");
        },
    };

    let report = FieldReport::from_widgets(&entry.name, entry.kind, outcomes);
    match &report.outcome {
        Outcome::Failed(reason) => log::warn!("Field '{}': {}", entry.name, reason),
        _ => log::debug!("{} field '{}' = {:?}", entry.kind, entry.name, text),
    }
    report
}

/// Text: value on the field, cached appearance dropped.
fn write_text<D: DocumentAccess + ?Sized>(doc: &mut D, widget: NodeId, text: &str) -> Result<()> {
    let holder = value_holder(&*doc, widget);
    doc.set_value(holder, PdfValue::Text(text.to_string()))?;
    doc.clear_appearance(widget)
}

/// List/combo: value and appearance state both carry the answer.
fn write_choice<D: DocumentAccess + ?Sized>(doc: &mut D, widget: NodeId, text: &str) -> Result<()> {
    let holder = value_holder(&*doc, widget);
    doc.set_value(holder, PdfValue::Text(text.to_string()))?;
    doc.set_appearance_state(widget, &PdfName::from(text))
}

fn bind_group<D: DocumentAccess + ?Sized>(
    doc: &mut D,
    group: &ButtonGroup,
    value: &AnswerValue,
    overrides: &OverrideTable,
) -> FieldReport {
    let answer = value.normalize();
    let selected = resolve_selection(GroupShape::of(group), &answer, overrides.get(&group.name));
    let outcomes = apply_selection(doc, group, selected);

    match selected {
        Some(index) if !group.is_single() => {
            log::debug!("Group '{}' = {} -> widget {}", group.name, value, index)
        },
        Some(_) => log::debug!("Checkbox '{}' = {} -> checked", group.name, value),
        None => log::debug!("Group '{}' = {} -> all off", group.name, value),
    }
    FieldReport::from_widgets(&group.name, group.kind, outcomes)
}
