//! Button group resolution.
//!
//! Deciding which widget of a group is "on" is kept apart from writing it:
//! [`resolve_selection`] is a pure function shared by the binder and the
//! verifier, so both always agree on what an answer means.
//!
//! Decision rules, for a group of `n` widgets:
//!
//! - `n == 1` (checkbox semantics): on iff the answer is truthy. An explicit
//!   index is ignored.
//! - `n > 1` (radio semantics): an explicit index wins and is clamped into
//!   `0..n`. Otherwise the override table's `truthy_index`/`falsy_index`
//!   applies, falling back to 1 for "yes" and 0 for "no".

use super::directory::ButtonGroup;
use super::report::Outcome;
use crate::access::{DocumentAccess, NodeId, PdfName, PdfValue};
use crate::answers::NormalizedAnswer;
use crate::error::Result;
use crate::overrides::IndexOverride;

/// On-state name used when a widget's appearance map names none.
pub const DEFAULT_ON_STATE: &str = "Yes";

/// Widget picked for a "yes" answer in a multi-widget group.
pub const DEFAULT_TRUTHY_INDEX: usize = 1;

/// Widget picked for a "no" answer in a multi-widget group.
pub const DEFAULT_FALSY_INDEX: usize = 0;

/// The part of a group the decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupShape {
    /// Number of widgets in the group
    pub widget_count: usize,
}

impl GroupShape {
    /// Shape of a group with `widget_count` widgets.
    pub fn new(widget_count: usize) -> Self {
        Self { widget_count }
    }

    /// Shape of an existing group.
    pub fn of(group: &ButtonGroup) -> Self {
        Self::new(group.len())
    }
}

/// Index of the widget to turn on, or `None` when every widget is off.
pub fn resolve_selection(
    shape: GroupShape,
    answer: &NormalizedAnswer,
    rule: Option<&IndexOverride>,
) -> Option<usize> {
    let count = shape.widget_count;
    match count {
        0 => None,
        1 => answer.truthy.then_some(0),
        _ => {
            let index = match answer.explicit_index {
                Some(explicit) => clamp_index(explicit, count),
                None => {
                    let truthy_index = rule
                        .and_then(|r| r.truthy_index)
                        .unwrap_or(DEFAULT_TRUTHY_INDEX);
                    let falsy_index = rule
                        .and_then(|r| r.falsy_index)
                        .unwrap_or(DEFAULT_FALSY_INDEX);
                    let chosen = if answer.truthy {
                        truthy_index
                    } else {
                        falsy_index
                    };
                    chosen.min(count - 1)
                },
            };
            Some(index)
        },
    }
}

fn clamp_index(index: i64, count: usize) -> usize {
    if index <= 0 {
        return 0;
    }
    usize::try_from(index).map_or(count - 1, |index| index.min(count - 1))
}

/// Export ("on") state name of a button widget.
///
/// The first state of the normal appearance map that is not `Off`; `"Yes"`
/// when there is no map or it only knows `Off`. A malformed map is an error.
pub fn on_state<D: DocumentAccess + ?Sized>(doc: &D, widget: NodeId) -> Result<PdfName> {
    let states = doc.appearance_states(widget)?;
    Ok(states
        .into_iter()
        .flatten()
        .find(|state| !state.is_empty() && !state.is_off())
        .unwrap_or_else(|| PdfName::from(DEFAULT_ON_STATE)))
}

/// Node holding a widget's `/V`: the widget when it carries the name, else its parent.
pub fn value_holder<D: DocumentAccess + ?Sized>(doc: &D, widget: NodeId) -> NodeId {
    let named = doc.field_name(widget).is_some_and(|name| !name.is_empty());
    if named {
        widget
    } else {
        doc.parent(widget).unwrap_or(widget)
    }
}

/// Write a resolved selection into a group.
///
/// Returns one outcome per widget. A widget whose on-state cannot be read or
/// written is reported as failed and left unmodified; the remaining widgets
/// are still processed.
pub fn apply_selection<D: DocumentAccess + ?Sized>(
    doc: &mut D,
    group: &ButtonGroup,
    selected: Option<usize>,
) -> Vec<Outcome> {
    if group.is_single() {
        let widget = group.widgets[0];
        return vec![apply_checkbox(doc, widget, selected == Some(0))];
    }

    // Radio groups share one value on the parent field
    let parent = group.widgets.first().and_then(|&w| doc.parent(w));

    let mut outcomes = Vec::with_capacity(group.len());
    for (index, &widget) in group.widgets.iter().enumerate() {
        let outcome = match on_state(&*doc, widget) {
            Err(e) => Outcome::Failed(e.to_string()),
            Ok(on) if selected == Some(index) => {
                let result = match parent {
                    Some(parent) => doc.set_value(parent, PdfValue::Name(on.clone())),
                    None => Ok(()),
                };
                Outcome::from_result(result.and_then(|()| doc.set_appearance_state(widget, &on)))
            },
            Ok(_) => Outcome::from_result(doc.set_appearance_state(widget, &PdfName::off())),
        };
        if let Outcome::Failed(reason) = &outcome {
            log::warn!("Group '{}' widget {} ({}): {}", group.name, index, widget, reason);
        }
        outcomes.push(outcome);
    }
    outcomes
}

fn apply_checkbox<D: DocumentAccess + ?Sized>(doc: &mut D, widget: NodeId, checked: bool) -> Outcome {
    let on = match on_state(&*doc, widget) {
        Ok(on) => on,
        Err(e) => {
            log::warn!("Checkbox {}: {}", widget, e);
            return Outcome::Failed(e.to_string());
        },
    };
    let state = if checked { on } else { PdfName::off() };
    let holder = value_holder(&*doc, widget);
    Outcome::from_result(
        doc.set_value(holder, PdfValue::Name(state.clone()))
            .and_then(|()| doc.set_appearance_state(widget, &state)),
    )
}
