//! Fixture builder for form integration tests.
//!
//! Builds small in-memory PDFs with `lopdf` so each test can describe exactly
//! the widget layout it needs.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_acrofill::access::NodeId;
use pdf_acrofill::document::FormDocument;

/// Field flag bits used by the fixtures.
pub const FF_RADIO: i64 = 1 << 15;
pub const FF_COMBO: i64 = 1 << 17;

pub struct FormBuilder {
    doc: Document,
    pages_id: ObjectId,
    annots: Vec<Vec<Object>>,
    fields: Vec<Object>,
    acroform: bool,
}

impl FormBuilder {
    pub fn new(page_count: usize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            annots: vec![Vec::new(); page_count.max(1)],
            fields: Vec::new(),
            acroform: true,
        }
    }

    /// Leave the catalog without an `/AcroForm` entry.
    pub fn without_acroform(mut self) -> Self {
        self.acroform = false;
        self
    }

    /// Add an arbitrary annotation dictionary to a page.
    pub fn annotation(&mut self, page: usize, dict: Dictionary) -> NodeId {
        let id = self.doc.add_object(Object::Dictionary(dict));
        self.annots[page].push(Object::Reference(id));
        NodeId::from(id)
    }

    /// Register a node as a root of `/AcroForm /Fields`.
    pub fn register(&mut self, node: NodeId) {
        self.fields.push(Object::Reference(node.into()));
    }

    pub fn text(&mut self, page: usize, name: &str) -> NodeId {
        let mut dict = widget();
        dict.set("FT", Object::Name(b"Tx".to_vec()));
        dict.set("T", Object::string_literal(name));
        dict.set("AP", Object::Dictionary(stream_appearance(&mut self.doc)));
        let node = self.annotation(page, dict);
        self.register(node);
        node
    }

    pub fn choice(&mut self, page: usize, name: &str, combo: bool) -> NodeId {
        let mut dict = widget();
        dict.set("FT", Object::Name(b"Ch".to_vec()));
        dict.set("T", Object::string_literal(name));
        if combo {
            dict.set("Ff", Object::Integer(FF_COMBO));
        }
        let node = self.annotation(page, dict);
        self.register(node);
        node
    }

    /// Named widget without a field type.
    pub fn untyped(&mut self, page: usize, name: &str) -> NodeId {
        let mut dict = widget();
        dict.set("T", Object::string_literal(name));
        let node = self.annotation(page, dict);
        self.register(node);
        node
    }

    /// Standalone checkbox whose `/AP /N` holds `Off` and `on_state`.
    pub fn checkbox(&mut self, page: usize, name: &str, on_state: impl AsRef<[u8]>) -> NodeId {
        let mut dict = widget();
        dict.set("FT", Object::Name(b"Btn".to_vec()));
        dict.set("T", Object::string_literal(name));
        dict.set("AS", Object::Name(b"Off".to_vec()));
        dict.set("AP", Object::Dictionary(state_appearance(&mut self.doc, on_state)));
        let node = self.annotation(page, dict);
        self.register(node);
        node
    }

    /// Radio parent field with one nameless kid per state, all on `page`.
    ///
    /// `/FT` and `/Ff` live on the parent only, so the kids inherit them.
    pub fn radio(&mut self, page: usize, name: &str, states: &[&str]) -> (NodeId, Vec<NodeId>) {
        let parent = self.button_parent(name, FF_RADIO);
        let kids = states
            .iter()
            .map(|state| self.kid(parent, page, state))
            .collect();
        (parent, kids)
    }

    /// Button parent field with no widgets yet.
    pub fn button_parent(&mut self, name: &str, flags: i64) -> NodeId {
        let mut dict = Dictionary::new();
        dict.set("FT", Object::Name(b"Btn".to_vec()));
        dict.set("T", Object::string_literal(name));
        if flags != 0 {
            dict.set("Ff", Object::Integer(flags));
        }
        dict.set("Kids", Object::Array(Vec::new()));
        let id = self.doc.add_object(Object::Dictionary(dict));
        let node = NodeId::from(id);
        self.register(node);
        node
    }

    /// Nameless widget kid of `parent` placed on `page`.
    pub fn kid(&mut self, parent: NodeId, page: usize, on_state: impl AsRef<[u8]>) -> NodeId {
        let mut dict = widget();
        dict.set("Parent", Object::Reference(parent.into()));
        dict.set("AS", Object::Name(b"Off".to_vec()));
        dict.set("AP", Object::Dictionary(state_appearance(&mut self.doc, on_state)));
        let node = self.annotation(page, dict);
        self.push_kid(parent, node);
        node
    }

    /// Nameless kid whose `/AP` is not a dictionary.
    pub fn malformed_kid(&mut self, parent: NodeId, page: usize) -> NodeId {
        let mut dict = widget();
        dict.set("Parent", Object::Reference(parent.into()));
        dict.set("AS", Object::Name(b"Off".to_vec()));
        dict.set("AP", Object::Integer(7));
        let node = self.annotation(page, dict);
        self.push_kid(parent, node);
        node
    }

    /// Non-terminal field node (name and `/Kids` only), registered as a root.
    pub fn field_node(&mut self, name: &str) -> NodeId {
        let mut dict = Dictionary::new();
        dict.set("T", Object::string_literal(name));
        dict.set("Kids", Object::Array(Vec::new()));
        let node = NodeId::from(self.doc.add_object(Object::Dictionary(dict)));
        self.register(node);
        node
    }

    /// Named text widget below a non-terminal field node.
    pub fn text_kid(&mut self, parent: NodeId, page: usize, name: &str) -> NodeId {
        let mut dict = widget();
        dict.set("FT", Object::Name(b"Tx".to_vec()));
        dict.set("T", Object::string_literal(name));
        dict.set("Parent", Object::Reference(parent.into()));
        let node = self.annotation(page, dict);
        self.push_kid(parent, node);
        node
    }

    /// List an existing annotation on `page` again.
    pub fn reference(&mut self, page: usize, node: NodeId) {
        self.annots[page].push(Object::Reference(node.into()));
    }

    /// Put an annotation dictionary directly into `/Annots`.
    pub fn inline(&mut self, page: usize, dict: Dictionary) {
        self.annots[page].push(Object::Dictionary(dict));
    }

    fn push_kid(&mut self, parent: NodeId, kid: NodeId) {
        if let Ok(dict) = self.doc.get_dictionary_mut(parent.into()) {
            if let Ok(Object::Array(kids)) = dict.get_mut(b"Kids") {
                kids.push(Object::Reference(kid.into()));
            }
        }
    }

    pub fn build(mut self) -> FormDocument {
        let mut page_ids = Vec::with_capacity(self.annots.len());
        for annots in std::mem::take(&mut self.annots) {
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(self.pages_id));
            page.set(
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            );
            page.set("Annots", Object::Array(annots));
            page_ids.push(self.doc.add_object(Object::Dictionary(page)));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(page_ids.len() as i64));
        pages.set(
            "Kids",
            Object::Array(page_ids.into_iter().map(Object::Reference).collect()),
        );
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        if self.acroform {
            let mut form = Dictionary::new();
            form.set("Fields", Object::Array(self.fields));
            let form_id = self.doc.add_object(Object::Dictionary(form));
            catalog.set("AcroForm", Object::Reference(form_id));
        }
        let catalog_id = self.doc.add_object(Object::Dictionary(catalog));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        FormDocument::from_document(self.doc)
    }
}

/// Bare widget annotation dictionary.
pub fn widget() -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"Annot".to_vec()));
    dict.set("Subtype", Object::Name(b"Widget".to_vec()));
    dict.set(
        "Rect",
        Object::Array(vec![0.into(), 0.into(), 10.into(), 10.into()]),
    );
    dict
}

fn empty_stream(doc: &mut Document) -> Object {
    let id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
    Object::Reference(id)
}

/// `/AP << /N << /Off … /<on_state> … >> >>`
fn state_appearance(doc: &mut Document, on_state: impl AsRef<[u8]>) -> Dictionary {
    let mut states = Dictionary::new();
    states.set("Off", empty_stream(doc));
    states.set(on_state.as_ref().to_vec(), empty_stream(doc));
    let mut ap = Dictionary::new();
    ap.set("N", Object::Dictionary(states));
    ap
}

/// `/AP << /N stream >>` as text fields carry.
fn stream_appearance(doc: &mut Document) -> Dictionary {
    let mut ap = Dictionary::new();
    ap.set("N", empty_stream(doc));
    ap
}

/// Whether the catalog's `/AcroForm` carries `/NeedAppearances true`.
pub fn need_appearances(doc: &FormDocument) -> bool {
    let inner = doc.inner();
    let Ok(Object::Reference(root)) = inner.trailer.get(b"Root") else {
        return false;
    };
    let Ok(catalog) = inner.get_dictionary(*root) else {
        return false;
    };
    let form = match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => inner.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };
    matches!(
        form.map(|form| form.get(b"NeedAppearances")),
        Some(Ok(Object::Boolean(true)))
    )
}

/// Appearance state of every widget, `"-"` where absent.
pub fn states<D: pdf_acrofill::access::DocumentAccess>(doc: &D, widgets: &[NodeId]) -> Vec<String> {
    widgets
        .iter()
        .map(|&w| {
            doc.appearance_state(w)
                .map_or_else(|| "-".to_string(), |state| state.to_string())
        })
        .collect()
}
