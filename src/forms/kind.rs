//! Field interaction kinds.
//!
//! Classification follows ISO 32000-1:2008 Section 12.7.3 (Field Flags):
//! the `/FT` type tag picks the family and one flag bit picks the variant.
//! `/FT` and `/Ff` are inheritable, so both are looked up through the
//! `/Parent` chain when a widget does not carry them itself.

use crate::access::{DocumentAccess, NodeId};
use bitflags::bitflags;
use std::fmt;

/// Parent chains longer than this are treated as cyclic.
const MAX_INHERITANCE_DEPTH: usize = 32;

bitflags! {
    /// Field flags (`/Ff`) that decide the interaction kind.
    ///
    /// ISO 32000-1:2008 Table 226 (button fields) and Table 230 (choice fields).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u32 {
        /// Bit 15: (checkbox/radio) at least one widget in the group stays on
        const NO_TOGGLE_TO_OFF = 1 << 14;

        /// Bit 16: Button is a radio button
        const RADIO = 1 << 15;

        /// Bit 17: Button is a push button
        const PUSHBUTTON = 1 << 16;

        /// Bit 18: Choice field is a combo box (dropdown); otherwise a list box
        const COMBO = 1 << 17;

        /// Bit 26: Radio buttons with the same export value turn on together
        const RADIOS_IN_UNISON = 1 << 25;
    }
}

/// How a field is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Text field (`/Tx`)
    Text,
    /// Choice field with the combo flag (`/Ch`)
    Combo,
    /// Choice field without the combo flag (`/Ch`)
    List,
    /// Button field without the radio flag (`/Btn`)
    Checkbox,
    /// Button field with the radio flag (`/Btn`)
    Radio,
    /// Missing or unrecognized type tag
    Unknown,
}

impl FieldKind {
    /// Classify a type tag and flag set.
    pub fn classify(field_type: Option<&str>, flags: FieldFlags) -> Self {
        match field_type {
            Some("Tx") => FieldKind::Text,
            Some("Ch") if flags.contains(FieldFlags::COMBO) => FieldKind::Combo,
            Some("Ch") => FieldKind::List,
            Some("Btn") if flags.contains(FieldFlags::RADIO) => FieldKind::Radio,
            Some("Btn") => FieldKind::Checkbox,
            _ => FieldKind::Unknown,
        }
    }

    /// Classify a widget, inheriting `/FT` and `/Ff` from its ancestors.
    pub fn of_widget<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Self {
        let field_type = inherited_field_type(doc, node);
        let flags = FieldFlags::from_bits_truncate(inherited_field_flags(doc, node).unwrap_or(0));
        Self::classify(field_type.as_deref(), flags)
    }

    /// Button fields are resolved as groups.
    pub fn is_button(&self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::Radio)
    }

    /// Lower-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Combo => "combo",
            FieldKind::List => "list",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `/FT` of the node or its nearest ancestor that has one.
pub fn inherited_field_type<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<String> {
    inherit(doc, node, |n| doc.field_type(n))
}

/// `/Ff` of the node or its nearest ancestor that has one.
pub fn inherited_field_flags<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<u32> {
    inherit(doc, node, |n| doc.field_flags(n))
}

fn inherit<D, T, F>(doc: &D, node: NodeId, read: F) -> Option<T>
where
    D: DocumentAccess + ?Sized,
    F: Fn(NodeId) -> Option<T>,
{
    let mut current = node;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Some(value) = read(current) {
            return Some(value);
        }
        current = doc.parent(current)?;
    }
    log::warn!("Parent chain of {} is too deep; assuming a cycle", node);
    None
}
