//! Shared helpers for integration tests: in-memory .docx packages and PDF inspection.
#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

#[path = "../../src/parser/fixtures.rs"]
mod fixtures;

pub use fixtures::{tiny_png, DocxBuilder};

/// Body blocks of a test document
pub enum Block<'a> {
    Heading(&'a str, u8),
    Paragraph(&'a str),
    Table(&'a [&'a [&'a str]]),
}

/// A minimal .docx package containing the given blocks
pub fn docx(blocks: &[Block]) -> Vec<u8> {
    blocks
        .iter()
        .fold(DocxBuilder::new(), |builder, block| match block {
            Block::Heading(text, level) => builder.heading(text, *level),
            Block::Paragraph(text) => builder.paragraph(text),
            Block::Table(rows) => builder.table(rows),
        })
        .build()
}

/// A one-heading document
pub fn docx_with_heading(text: &str) -> Vec<u8> {
    docx(&[Block::Heading(text, 1)])
}

/// All text of a PDF, pages in order
pub fn pdf_text(pdf: &[u8]) -> String {
    let doc = Document::load_mem(pdf).expect("output should be a readable PDF");
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages).expect("text extraction")
}

/// Image XObjects reachable from each page's resources, pages in order.
/// Inherited resources are looked up through the page tree.
pub fn page_images(pdf: &[u8]) -> Vec<usize> {
    let doc = Document::load_mem(pdf).expect("output should be a readable PDF");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let Some(resources) = inherited(&doc, *page_id, b"Resources") else {
                return 0;
            };
            let Ok(xobjects) = resolve(&doc, resources)
                .as_dict()
                .and_then(|r| r.get(b"XObject"))
            else {
                return 0;
            };
            let Ok(xobjects) = resolve(&doc, xobjects).as_dict() else {
                return 0;
            };
            xobjects
                .iter()
                .filter(|(_, object)| {
                    resolve(&doc, object)
                        .as_stream()
                        .ok()
                        .and_then(|s| s.dict.get(b"Subtype").ok())
                        .and_then(|s| s.as_name().ok())
                        == Some(&b"Image"[..])
                })
                .count()
        })
        .collect()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

fn inherited<'a>(doc: &'a Document, page: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page).ok()?;
    loop {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
}

pub fn page_count(pdf: &[u8]) -> usize {
    Document::load_mem(pdf)
        .expect("output should be a readable PDF")
        .get_pages()
        .len()
}

/// A PDF with `pages` pages of text, written without stream compression
pub fn sample_pdf(pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for page in 1..=pages {
        let mut content = String::new();
        for line in 0..40 {
            content.push_str(&format!(
                "BT /F1 10 Tf 50 {} Td (Page {} line {} lorem ipsum dolor sit amet) Tj ET\n",
                800 - line * 18,
                page,
                line
            ));
        }
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save sample PDF");
    buffer
}
