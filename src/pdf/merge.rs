//! Page concatenation of independently generated PDFs

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};

use crate::error::PdfError;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Concatenate the pages of every document, in order, into one PDF.
///
/// The first document is the base; each following document has its object
/// numbers shifted past the current maximum before its pages are appended to
/// the base page tree.
pub fn merge_pdfs(documents: &[Vec<u8>]) -> Result<Vec<u8>, PdfError> {
    let Some((first, rest)) = documents.split_first() else {
        return Err(PdfError::Structure("no documents to merge".into()));
    };
    if rest.is_empty() {
        return Ok(first.clone());
    }

    let mut dest = load(first, 0)?;
    let pages_id = pages_root(&dest)?;
    let mut page_refs: Vec<ObjectId> = dest.get_pages().values().copied().collect();

    for (index, bytes) in rest.iter().enumerate() {
        let source = load(bytes, index + 1)?;
        let offset = dest.max_id;
        let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();

        // Resolve inherited attributes before the source tree is detached
        let mut inherited: BTreeMap<ObjectId, Vec<(&[u8], Object)>> = BTreeMap::new();
        for page_id in &source_pages {
            let attrs = INHERITABLE
                .iter()
                .filter_map(|key| inherited_attribute(&source, *page_id, key).map(|v| (*key, v)))
                .collect();
            inherited.insert(*page_id, attrs);
        }

        for (id, object) in source.objects {
            dest.objects
                .insert((id.0 + offset, id.1), shift_refs(object, offset));
        }

        for page_id in source_pages {
            let new_id = (page_id.0 + offset, page_id.1);
            let page = dest
                .get_object_mut(new_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| PdfError::Structure(format!("page {:?}: {}", new_id, e)))?;
            for (key, value) in inherited.remove(&page_id).unwrap_or_default() {
                if !page.has(key) {
                    page.set(key, shift_refs(value, offset));
                }
            }
            page.set("Parent", Object::Reference(pages_id));
            page_refs.push(new_id);
        }

        dest.max_id = (source.max_id + offset).max(dest.max_id);
        log::debug!(
            "Appended document {} ({} pages so far)",
            index + 2,
            page_refs.len()
        );
    }

    set_kids(&mut dest, pages_id, &page_refs)?;

    // The appended catalogs and page-tree roots are now unreachable
    dest.prune_objects();
    dest.renumber_objects();
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| PdfError::Save(e.to_string()))?;

    log::info!(
        "Merged {} documents into {} pages ({} bytes)",
        documents.len(),
        page_refs.len(),
        buffer.len()
    );
    Ok(buffer)
}

fn load(bytes: &[u8], index: usize) -> Result<Document, PdfError> {
    Document::load_mem(bytes)
        .map_err(|e| PdfError::Parse(format!("document {}: {}", index + 1, e)))
}

fn pages_root(doc: &Document) -> Result<ObjectId, PdfError> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PdfError::Structure(format!("missing page tree: {}", e)))
}

/// Walk up the Parent chain until the attribute is found
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    // Page trees are shallow; the bound guards against Parent cycles
    for _ in 0..32 {
        let dict = doc.get_object(current).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn set_kids(
    doc: &mut Document,
    pages_id: ObjectId,
    page_refs: &[ObjectId],
) -> Result<(), PdfError> {
    let pages = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::Structure(format!("invalid page tree root: {}", e)))?;
    pages.set(
        "Kids",
        Object::Array(page_refs.iter().map(|id| Object::Reference(*id)).collect()),
    );
    pages.set("Count", Object::Integer(page_refs.len() as i64));
    Ok(())
}

/// Shift every indirect reference inside an object by `offset`
fn shift_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|o| shift_refs(o, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_pdf;

    fn page_texts(pdf: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .keys()
            .map(|n| doc.extract_text(&[*n]).unwrap())
            .collect()
    }

    #[test]
    fn test_merge_empty_fails() {
        assert!(matches!(merge_pdfs(&[]), Err(PdfError::Structure(_))));
    }

    #[test]
    fn test_single_document_is_returned_unchanged() {
        let pdf = test_pdf(2, "Only");
        assert_eq!(merge_pdfs(&[pdf.clone()]).unwrap(), pdf);
    }

    #[test]
    fn test_merge_preserves_page_order() {
        let merged = merge_pdfs(&[
            test_pdf(2, "First"),
            test_pdf(1, "Second"),
            test_pdf(2, "Third"),
        ])
        .unwrap();
        let texts = page_texts(&merged);
        assert_eq!(texts.len(), 5);
        assert!(texts[0].contains("First-Page-1"));
        assert!(texts[1].contains("First-Page-2"));
        assert!(texts[2].contains("Second-Page-1"));
        assert!(texts[3].contains("Third-Page-1"));
        assert!(texts[4].contains("Third-Page-2"));
    }

    #[test]
    fn test_merged_pages_point_at_single_tree() {
        let merged = merge_pdfs(&[test_pdf(1, "A"), test_pdf(1, "B")]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        let root = pages_root(&doc).unwrap();
        for page_id in doc.get_pages().values() {
            let page = doc.get_object(*page_id).unwrap().as_dict().unwrap();
            assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), root);
            assert!(inherited_attribute(&doc, *page_id, b"MediaBox").is_some());
            assert!(inherited_attribute(&doc, *page_id, b"Resources").is_some());
        }
    }

    #[test]
    fn test_merge_rejects_garbage() {
        let result = merge_pdfs(&[test_pdf(1, "A"), b"not a pdf".to_vec()]);
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
