//! PDF document adapter backed by `lopdf`.
//!
//! [`FormDocument`] loads a PDF into memory, exposes its widget annotations
//! through [`DocumentAccess`] and serializes the mutated object graph back to
//! bytes. All reads tolerate indirect references at any level.

use crate::access::{DocumentAccess, NodeId, PdfName, PdfValue};
use crate::error::{Error, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::Path;

/// A PDF document opened for form filling.
pub struct FormDocument {
    inner: Document,
    /// Page object ids in page order
    pages: Vec<ObjectId>,
}

impl FormDocument {
    /// Open a PDF file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_acrofill::document::FormDocument;
    /// use pdf_acrofill::access::DocumentAccess;
    ///
    /// let doc = FormDocument::open("form.pdf")?;
    /// println!("{} pages", doc.page_count());
    /// # Ok::<(), pdf_acrofill::error::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = Document::load(path)?;
        log::debug!("Loaded {} ({} objects)", path.display(), inner.objects.len());
        Ok(Self::from_document(inner))
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(bytes)?;
        Ok(Self::from_document(inner))
    }

    /// Wrap an already loaded `lopdf` document.
    pub fn from_document(inner: Document) -> Self {
        let pages = inner.get_pages().into_values().collect();
        Self { inner, pages }
    }

    /// Access the underlying `lopdf` document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Consume the adapter and return the underlying document.
    pub fn into_inner(self) -> Document {
        self.inner
    }

    /// Serialize the document to bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.inner.save_to(&mut out)?;
        Ok(out)
    }

    /// Serialize the document and write it to `path` in one call.
    ///
    /// The whole file is rendered in memory first so a serialization failure
    /// never leaves a truncated output behind.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    fn dict(&self, node: NodeId) -> Option<&Dictionary> {
        self.inner.get_dictionary(node.into()).ok()
    }

    fn dict_mut(&mut self, node: NodeId) -> Result<&mut Dictionary> {
        Ok(self.inner.get_dictionary_mut(node.into())?)
    }

    /// Follow one level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.inner.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Resolved value of `key` in the dictionary of `node`.
    fn lookup(&self, node: NodeId, key: &[u8]) -> Option<&Object> {
        let dict = self.dict(node)?;
        self.resolve(dict.get(key).ok()?)
    }

    fn catalog_id(&self) -> Result<ObjectId> {
        match self.inner.trailer.get(b"Root") {
            Ok(Object::Reference(id)) => Ok(*id),
            _ => Err(Error::InvalidPdf("trailer has no /Root reference".to_string())),
        }
    }

    fn acroform(&self) -> Result<Option<&Dictionary>> {
        let catalog = self.inner.get_dictionary(self.catalog_id()?)?;
        let form = match catalog.get(b"AcroForm") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };
        match self.resolve(form) {
            Some(Object::Dictionary(dict)) => Ok(Some(dict)),
            _ => Err(Error::InvalidPdf("/AcroForm is not a dictionary".to_string())),
        }
    }

    fn reference_list(&self, obj: &Object) -> Vec<NodeId> {
        match self.resolve(obj) {
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Object::Reference(id) => Some(NodeId::from(*id)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl DocumentAccess for FormDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_annotations(&self, page: usize) -> Result<Vec<NodeId>> {
        let page_id = *self
            .pages
            .get(page)
            .ok_or_else(|| Error::InvalidPdf(format!("page index {} out of range", page)))?;
        let page_dict = self.inner.get_dictionary(page_id)?;

        let annots = match page_dict.get(b"Annots") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };
        let items = match self.resolve(annots) {
            Some(Object::Array(items)) => items,
            _ => {
                log::warn!("Page {} has a non-array /Annots entry", page + 1);
                return Ok(Vec::new());
            },
        };

        Ok(items
            .iter()
            .filter_map(|item| match item {
                Object::Reference(id) => Some(NodeId::from(*id)),
                _ => {
                    // Inline annotation dictionaries cannot be addressed for mutation
                    log::debug!("Skipping direct annotation object on page {}", page + 1);
                    None
                },
            })
            .collect())
    }

    fn subtype(&self, node: NodeId) -> Option<String> {
        self.lookup(node, b"Subtype").and_then(name_of)
    }

    fn field_name(&self, node: NodeId) -> Option<String> {
        match self.lookup(node, b"T")? {
            Object::String(bytes, _) => decode_text_string(bytes),
            other => name_of(other),
        }
    }

    fn field_type(&self, node: NodeId) -> Option<String> {
        self.lookup(node, b"FT").and_then(name_of)
    }

    fn field_flags(&self, node: NodeId) -> Option<u32> {
        match self.lookup(node, b"Ff")? {
            Object::Integer(i) => match u32::try_from(*i) {
                Ok(flags) => Some(flags),
                Err(_) => {
                    log::warn!("Ignoring out-of-range /Ff {} on {}", i, node);
                    None
                },
            },
            _ => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        match self.dict(node)?.get(b"Parent").ok()? {
            Object::Reference(id) => Some(NodeId::from(*id)),
            _ => None,
        }
    }

    fn kids(&self, node: NodeId) -> Vec<NodeId> {
        self.dict(node)
            .and_then(|dict| dict.get(b"Kids").ok())
            .map(|kids| self.reference_list(kids))
            .unwrap_or_default()
    }

    fn appearance_states(&self, node: NodeId) -> Result<Option<Vec<PdfName>>> {
        let malformed = |reason: &str| Error::MalformedAppearance {
            node,
            reason: reason.to_string(),
        };

        let dict = self.inner.get_dictionary(node.into())?;
        let ap = match dict.get(b"AP") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };
        let ap = match self.resolve(ap) {
            Some(Object::Dictionary(ap)) => ap,
            _ => return Err(malformed("/AP is not a dictionary")),
        };
        let normal = match ap.get(b"N") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };

        match self.resolve(normal) {
            Some(Object::Dictionary(states)) => Ok(Some(
                states
                    .iter()
                    .map(|(key, _)| PdfName::new(key.clone()))
                    .collect(),
            )),
            // A bare stream is a single appearance without named states
            Some(Object::Stream(_)) => Ok(None),
            _ => Err(malformed("/AP /N is neither a state map nor a stream")),
        }
    }

    fn value(&self, node: NodeId) -> Option<PdfValue> {
        match self.lookup(node, b"V")? {
            Object::Name(name) => Some(PdfValue::Name(PdfName::new(name.clone()))),
            Object::String(bytes, _) => decode_text_string(bytes).map(PdfValue::Text),
            _ => None,
        }
    }

    fn appearance_state(&self, node: NodeId) -> Option<PdfName> {
        match self.lookup(node, b"AS")? {
            Object::Name(name) => Some(PdfName::new(name.clone())),
            _ => None,
        }
    }

    fn set_value(&mut self, node: NodeId, value: PdfValue) -> Result<()> {
        let obj = match value {
            PdfValue::Name(name) => Object::Name(name.into_bytes()),
            PdfValue::Text(text) => {
                let (bytes, format) = encode_text_string(&text);
                Object::String(bytes, format)
            },
        };
        self.dict_mut(node)?.set("V", obj);
        Ok(())
    }

    fn set_appearance_state(&mut self, node: NodeId, state: &PdfName) -> Result<()> {
        self.dict_mut(node)?
            .set("AS", Object::Name(state.as_bytes().to_vec()));
        Ok(())
    }

    fn clear_appearance(&mut self, node: NodeId) -> Result<()> {
        self.dict_mut(node)?.remove(b"AP");
        Ok(())
    }

    fn form_fields(&self) -> Result<Vec<NodeId>> {
        let Some(form) = self.acroform()? else {
            return Ok(Vec::new());
        };
        Ok(form
            .get(b"Fields")
            .map(|fields| self.reference_list(fields))
            .unwrap_or_default())
    }

    fn set_need_appearances(&mut self) -> Result<()> {
        let catalog_id = self.catalog_id()?;

        let form_ref = match self.inner.get_dictionary(catalog_id)?.get(b"AcroForm") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
        if let Some(form_id) = form_ref {
            self.inner
                .get_dictionary_mut(form_id)?
                .set("NeedAppearances", Object::Boolean(true));
            return Ok(());
        }

        let catalog = self.inner.get_dictionary_mut(catalog_id)?;
        let has_inline_form = matches!(catalog.get(b"AcroForm"), Ok(Object::Dictionary(_)));
        if has_inline_form {
            if let Ok(Object::Dictionary(form)) = catalog.get_mut(b"AcroForm") {
                form.set("NeedAppearances", Object::Boolean(true));
            }
        } else {
            log::debug!("Document has no /AcroForm; creating one");
            let mut form = Dictionary::new();
            form.set("Fields", Object::Array(Vec::new()));
            form.set("NeedAppearances", Object::Boolean(true));
            catalog.set("AcroForm", Object::Dictionary(form));
        }
        Ok(())
    }
}

fn name_of(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// PDFDocEncoding code points 0x80..=0x9F (ISO 32000-1:2008, Table D.2).
const PDFDOC_HIGH: [Option<char>; 32] = [
    Some('\u{2022}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{2026}'),
    Some('\u{2014}'),
    Some('\u{2013}'),
    Some('\u{0192}'),
    Some('\u{2044}'),
    Some('\u{2039}'),
    Some('\u{203A}'),
    Some('\u{2212}'),
    Some('\u{2030}'),
    Some('\u{201E}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201A}'),
    Some('\u{2122}'),
    Some('\u{FB01}'),
    Some('\u{FB02}'),
    Some('\u{0141}'),
    Some('\u{0152}'),
    Some('\u{0160}'),
    Some('\u{0178}'),
    Some('\u{017D}'),
    Some('\u{0131}'),
    Some('\u{0142}'),
    Some('\u{0153}'),
    Some('\u{0161}'),
    Some('\u{017E}'),
    None,
];

/// Decode a PDF text string that may be UTF-16BE (with BOM) or PDFDocEncoding.
///
/// Per ISO 32000-1:2008, Section 7.9.2.2 - Text String Type.
pub fn decode_text_string(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).ok()
    } else {
        Some(
            bytes
                .iter()
                .filter_map(|&b| match b {
                    0x80..=0x9F => PDFDOC_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect(),
        )
    }
}

/// Encode a text string for writing: literal bytes for ASCII, UTF-16BE with BOM otherwise.
pub fn encode_text_string(text: &str) -> (Vec<u8>, StringFormat) {
    if text.is_ascii() {
        return (text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    (bytes, StringFormat::Hexadecimal)
}
