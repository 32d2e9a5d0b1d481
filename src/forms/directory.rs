//! Field directory.
//!
//! One pass over every page's annotations resolves each widget to the logical
//! field name an answer set addresses, then files it either under a
//! single-valued field (text, choice) or under a button group. Group order is
//! the order widgets are first met in the document, which is what implicit
//! index selection relies on.

use super::kind::FieldKind;
use crate::access::{DocumentAccess, NodeId};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Annotation subtype of interactive form widgets.
pub const WIDGET_SUBTYPE: &str = "Widget";

/// A text, choice or unclassifiable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Logical field name
    pub name: String,
    /// Kind of the first widget met
    pub kind: FieldKind,
    /// Every widget resolving to this name, in document order
    pub widgets: Vec<NodeId>,
}

/// Checkbox/radio widgets sharing one logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonGroup {
    /// Logical field name
    pub name: String,
    /// Kind of the first widget met
    pub kind: FieldKind,
    /// Widgets in first-encountered order
    pub widgets: Vec<NodeId>,
}

impl ButtonGroup {
    /// Number of widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the group has no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// A lone widget behaves as a checkbox whatever its flags say.
    pub fn is_single(&self) -> bool {
        self.widgets.len() == 1
    }
}

/// Logical fields of a document.
#[derive(Debug, Clone, Default)]
pub struct FieldDirectory {
    fields: IndexMap<String, FieldEntry>,
    groups: IndexMap<String, ButtonGroup>,
    skipped_unnamed: usize,
}

impl FieldDirectory {
    /// Walk all pages and build the directory.
    ///
    /// Non-widget annotations are ignored. Widgets without a resolvable name
    /// are counted and skipped. A page whose annotations cannot be read is
    /// logged and skipped.
    pub fn build<D: DocumentAccess + ?Sized>(doc: &D) -> Self {
        let mut directory = Self::default();
        let mut seen = HashSet::new();

        for page in 0..doc.page_count() {
            let annotations = match doc.page_annotations(page) {
                Ok(annotations) => annotations,
                Err(e) => {
                    log::warn!("Skipping annotations of page {}: {}", page + 1, e);
                    continue;
                },
            };

            for node in annotations {
                if doc.subtype(node).as_deref() != Some(WIDGET_SUBTYPE) || !seen.insert(node) {
                    continue;
                }
                match logical_name(doc, node) {
                    Some(name) => directory.add(name, FieldKind::of_widget(doc, node), node),
                    None => {
                        log::debug!("Widget {} on page {} has no field name", node, page + 1);
                        directory.skipped_unnamed += 1;
                    },
                }
            }
        }

        log::debug!(
            "Field directory: {} single-valued fields, {} button groups, {} unnamed widgets",
            directory.fields.len(),
            directory.groups.len(),
            directory.skipped_unnamed
        );
        directory
    }

    /// Mixed button and non-button widgets under one name are filed on both
    /// sides, with a warning when the second side is first opened.
    fn add(&mut self, name: String, kind: FieldKind, node: NodeId) {
        let mixed = if kind.is_button() {
            !self.groups.contains_key(&name) && self.fields.contains_key(&name)
        } else {
            !self.fields.contains_key(&name) && self.groups.contains_key(&name)
        };
        if mixed {
            log::warn!(
                "Field '{}' mixes button and non-button widgets; both will be filled",
                name
            );
        }

        if kind.is_button() {
            self.groups
                .entry(name)
                .or_insert_with_key(|name| ButtonGroup {
                    name: name.clone(),
                    kind,
                    widgets: Vec::new(),
                })
                .widgets
                .push(node);
        } else {
            self.fields
                .entry(name)
                .or_insert_with_key(|name| FieldEntry {
                    name: name.clone(),
                    kind,
                    widgets: Vec::new(),
                })
                .widgets
                .push(node);
        }
    }

    /// Single-valued fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.values()
    }

    /// Button groups in document order.
    pub fn groups(&self) -> impl Iterator<Item = &ButtonGroup> {
        self.groups.values()
    }

    /// Single-valued field by name.
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }

    /// Button group by name.
    pub fn group(&self, name: &str) -> Option<&ButtonGroup> {
        self.groups.get(name)
    }

    /// Whether any field or group answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.groups.contains_key(name)
    }

    /// Every logical name once, fields first then groups.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .chain(self.groups.keys().filter(|name| !self.fields.contains_key(*name)))
            .map(String::as_str)
    }

    /// Number of widgets dropped for lack of a name.
    pub fn skipped_unnamed(&self) -> usize {
        self.skipped_unnamed
    }
}

/// Logical field name of a widget: its own `/T`, else its parent's.
pub fn logical_name<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<String> {
    non_empty(doc.field_name(node))
        .or_else(|| doc.parent(node).and_then(|parent| non_empty(doc.field_name(parent))))
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.is_empty())
}
