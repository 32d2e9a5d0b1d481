//! Document access layer.
//!
//! The form engine never touches the PDF object graph directly. It talks to a
//! [`DocumentAccess`] implementation that exposes pages, widget annotation
//! nodes and the handful of keys the engine reads and writes:
//!
//! | Key          | Meaning                                  |
//! |--------------|------------------------------------------|
//! | `/Subtype`   | annotation subtype (`Widget`)            |
//! | `/T`         | partial field name                       |
//! | `/FT`        | field type tag (`Tx`, `Ch`, `Btn`, ...)  |
//! | `/Ff`        | field flags                              |
//! | `/Parent`    | parent field                             |
//! | `/AP /N`     | normal appearance state map              |
//! | `/V`         | field value                              |
//! | `/AS`        | current appearance state                 |
//!
//! [`FormDocument`](crate::document::FormDocument) is the `lopdf`-backed
//! implementation used in production.

use crate::error::Result;
use std::fmt;

/// Name of the appearance state every button widget has besides its "on" state.
pub const OFF_STATE: &str = "Off";

/// Identifier of an indirect object in the document (object number, generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl NodeId {
    /// Create a new node identifier.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl From<lopdf::ObjectId> for NodeId {
    fn from((id, gen): lopdf::ObjectId) -> Self {
        Self { id, gen }
    }
}

impl From<NodeId> for lopdf::ObjectId {
    fn from(node: NodeId) -> Self {
        (node.id, node.gen)
    }
}

/// A PDF name object (`/Yes`, `/Off`, `/#C9lev#E9`).
///
/// Names are byte strings with no declared encoding. Export states are kept
/// as the exact bytes found in the document so that writing one back to
/// `/AS` always matches its appearance map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PdfName(Vec<u8>);

impl PdfName {
    /// Wrap raw name bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The `Off` state.
    pub fn off() -> Self {
        Self::from(OFF_STATE)
    }

    /// Raw name bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the name and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether the name has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this is the `Off` state.
    pub fn is_off(&self) -> bool {
        self.0 == OFF_STATE.as_bytes()
    }
}

impl From<&str> for PdfName {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl From<String> for PdfName {
    fn from(name: String) -> Self {
        Self(name.into_bytes())
    }
}

impl PartialEq<str> for PdfName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for PdfName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// UTF-8 names print as text; anything else uses `#xx` escapes for bytes
/// outside printable ASCII.
impl fmt::Display for PdfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(text) = std::str::from_utf8(&self.0) {
            return f.write_str(text);
        }
        for &byte in &self.0 {
            if byte.is_ascii_graphic() && byte != b'#' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }
}

/// A `/V` value as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfValue {
    /// Name object (button export states, `Off`)
    Name(PdfName),
    /// Text string (text and choice fields)
    Text(String),
}

impl fmt::Display for PdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfValue::Name(name) => write!(f, "/{}", name),
            PdfValue::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// Read/write access to the widget annotations of a document.
///
/// Getters return `None` when a key is absent or does not have the expected
/// object type; they never fail. Setters fail only when the node itself
/// cannot be resolved to a dictionary.
pub trait DocumentAccess {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Annotation nodes of a page, in `/Annots` order.
    fn page_annotations(&self, page: usize) -> Result<Vec<NodeId>>;

    /// `/Subtype` of an annotation.
    fn subtype(&self, node: NodeId) -> Option<String>;

    /// Own `/T` partial field name.
    fn field_name(&self, node: NodeId) -> Option<String>;

    /// Own `/FT` type tag (not inherited).
    fn field_type(&self, node: NodeId) -> Option<String>;

    /// Own `/Ff` flags (not inherited).
    fn field_flags(&self, node: NodeId) -> Option<u32>;

    /// `/Parent` field of a node.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// `/Kids` of a field node.
    fn kids(&self, node: NodeId) -> Vec<NodeId>;

    /// State names of the normal appearance (`/AP /N`) map.
    ///
    /// `Ok(None)` means the widget has no state map at all; an error means
    /// the map exists but is malformed.
    fn appearance_states(&self, node: NodeId) -> Result<Option<Vec<PdfName>>>;

    /// Current `/V` of a node.
    fn value(&self, node: NodeId) -> Option<PdfValue>;

    /// Current `/AS` of a widget.
    fn appearance_state(&self, node: NodeId) -> Option<PdfName>;

    /// Set `/V`.
    fn set_value(&mut self, node: NodeId, value: PdfValue) -> Result<()>;

    /// Set `/AS` to the named state.
    fn set_appearance_state(&mut self, node: NodeId, state: &PdfName) -> Result<()>;

    /// Drop the cached `/AP` so a viewer regenerates it.
    fn clear_appearance(&mut self, node: NodeId) -> Result<()>;

    /// Root fields listed in `/AcroForm /Fields`.
    fn form_fields(&self) -> Result<Vec<NodeId>>;

    /// Set `/AcroForm /NeedAppearances true`, creating `/AcroForm` if needed.
    fn set_need_appearances(&mut self) -> Result<()>;
}
