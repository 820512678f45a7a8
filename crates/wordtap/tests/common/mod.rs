//! Shared helpers for building PDFs in memory with lopdf.

#![allow(dead_code)]

use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Incrementally builds a PDF whose pages share one `/Pages` node.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// A font whose glyphs are exactly one em wide and one em tall above the
    /// baseline, so glyph boxes are easy to predict.
    pub fn box_font(&mut self) -> ObjectId {
        self.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "BoxFont",
            "Encoding" => "WinAnsiEncoding",
            "FontDescriptor" => dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => "BoxFont",
                "Descent" => 0,
                "MissingWidth" => 1000,
            },
        })
    }

    pub fn helvetica(&mut self) -> ObjectId {
        self.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        })
    }

    /// Add a page with the given MediaBox, `/Rotate`, content and resources.
    pub fn page(
        &mut self,
        media_box: [i64; 4],
        rotate: i64,
        contents: Object,
        resources: Dictionary,
    ) -> &mut Self {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box.map(Object::Integer).to_vec(),
            "Contents" => contents,
            "Resources" => resources,
        };
        if rotate != 0 {
            page.set("Rotate", rotate);
        }
        let page_id = self.doc.add_object(page);
        self.kids.push(Object::Reference(page_id));
        self
    }

    /// Add a page with a single content stream.
    pub fn text_page(
        &mut self,
        media_box: [i64; 4],
        content: &[u8],
        resources: Dictionary,
    ) -> &mut Self {
        let content_id = self.stream(content);
        self.page(media_box, 0, Object::Reference(content_id), resources)
    }

    pub fn stream(&mut self, content: &[u8]) -> ObjectId {
        self.add_object(Stream::new(dictionary! {}, content.to_vec()))
    }

    pub fn build(mut self) -> Vec<u8> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

/// Resources with a single font named `F1`.
pub fn font_resources(font_id: ObjectId) -> Dictionary {
    dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    }
}

/// One page of the given size showing `content` with the box font as `F1`.
pub fn box_font_pdf(media_box: [i64; 4], content: &[u8]) -> Vec<u8> {
    let mut builder = PdfBuilder::new();
    let font = builder.box_font();
    builder.text_page(media_box, content, font_resources(font));
    builder.build()
}

/// Write `bytes` into `dir` under `name` and return the path.
pub fn write_pdf(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
