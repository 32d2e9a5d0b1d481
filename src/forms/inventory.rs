//! Field inventory.
//!
//! Listings used to prepare an answer set for an unfamiliar form: the logical
//! fields with their kinds and export states, the fully qualified names of
//! the AcroForm field tree, and a blank answers template.

use super::directory::FieldDirectory;
use super::kind::FieldKind;
use super::resolver::on_state;
use crate::access::{DocumentAccess, NodeId};
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

/// Field trees nested deeper than this are not followed.
const MAX_FIELD_DEPTH: usize = 32;

/// One logical field as an answer set sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Logical field name
    pub name: String,
    /// Field kind
    pub kind: String,
    /// Number of widgets resolving to the name
    pub widget_count: usize,
    /// On-state name per button widget, in group order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub export_states: Vec<String>,
}

/// Summaries of every logical field, single-valued fields first.
pub fn summarize<D: DocumentAccess + ?Sized>(doc: &D, directory: &FieldDirectory) -> Vec<FieldSummary> {
    let fields = directory.fields().map(|entry| FieldSummary {
        name: entry.name.clone(),
        kind: entry.kind.to_string(),
        widget_count: entry.widgets.len(),
        export_states: Vec::new(),
    });

    let groups = directory.groups().map(|group| {
        // A lone button is filled as a checkbox whatever its flags say
        let kind = if group.is_single() {
            FieldKind::Checkbox
        } else {
            group.kind
        };
        FieldSummary {
            name: group.name.clone(),
            kind: kind.to_string(),
            widget_count: group.len(),
            export_states: group
                .widgets
                .iter()
                .map(|&widget| match on_state(doc, widget) {
                    Ok(name) => name.to_string(),
                    Err(_) => "?".to_string(),
                })
                .collect(),
        }
    });

    fields.chain(groups).collect()
}

/// Fully qualified names (`parent.child`) of the AcroForm field tree, plus
/// the logical names of widgets that are not reachable from it.
///
/// Sorted and de-duplicated.
pub fn qualified_names<D: DocumentAccess + ?Sized>(doc: &D) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();
    let mut visited = HashSet::new();
    for root in doc.form_fields()? {
        collect_names(doc, root, "", 0, &mut visited, &mut names);
    }

    names.extend(FieldDirectory::build(doc).names().map(str::to_string));
    Ok(names.into_iter().collect())
}

fn collect_names<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    parent_name: &str,
    depth: usize,
    visited: &mut HashSet<NodeId>,
    names: &mut BTreeSet<String>,
) {
    if depth > MAX_FIELD_DEPTH || !visited.insert(node) {
        return;
    }

    let partial = doc.field_name(node).unwrap_or_default();
    let full_name = match (parent_name.is_empty(), partial.is_empty()) {
        (true, _) => partial,
        (false, true) => parent_name.to_string(),
        (false, false) => format!("{}.{}", parent_name, partial),
    };
    if !full_name.is_empty() {
        names.insert(full_name.clone());
    }

    for kid in doc.kids(node) {
        collect_names(doc, kid, &full_name, depth + 1, visited, names);
    }
}

/// Blank answers object with one `""` entry per logical field, sorted by name.
pub fn answer_template(directory: &FieldDirectory) -> Value {
    let names: BTreeSet<&str> = directory.names().collect();
    let entries: Map<String, Value> = names
        .into_iter()
        .map(|name| (name.to_string(), Value::String(String::new())))
        .collect();
    Value::Object(entries)
}
