use lopdf::{Dictionary, Document, Object};

use crate::core::FacturError;

/// Extract the Factur-X XML embedded in a PDF.
///
/// A conforming writer registers the attachment in both the
/// `Names → EmbeddedFiles` name tree and the catalog `AF` array, but
/// documents in the wild often fill only one of the two, so both are
/// scanned before giving up.
pub fn extract_xml(pdf_bytes: &[u8]) -> Result<String, FacturError> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| FacturError::Pdf(format!("failed to load PDF: {e}")))?;

    let filespec = find_facturx_filespec(&doc)
        .ok_or_else(|| FacturError::Pdf("no Factur-X attachment in PDF".into()))?;
    read_attachment(&doc, filespec)
}

fn find_facturx_filespec(doc: &Document) -> Option<&Dictionary> {
    let catalog = doc.catalog().ok()?;

    // The name tree leaf is a flat array alternating names and filespec
    // references.
    let tree_pairs = catalog
        .get(b"Names")
        .ok()
        .and_then(|o| deref_dict(doc, o))
        .and_then(|names| names.get(b"EmbeddedFiles").ok())
        .and_then(|o| deref_dict(doc, o))
        .and_then(|tree| tree.get(b"Names").ok())
        .and_then(|o| o.as_array().ok());
    if let Some(pairs) = tree_pairs {
        for pair in pairs.chunks_exact(2) {
            if names_facturx(&pair[0]) {
                if let Some(filespec) = deref_dict(doc, &pair[1]) {
                    return Some(filespec);
                }
            }
        }
    }

    catalog
        .get(b"AF")
        .ok()
        .and_then(|o| o.as_array().ok())?
        .iter()
        .filter_map(|o| deref_dict(doc, o))
        .find(|fs| {
            fs.get(b"UF")
                .or_else(|_| fs.get(b"F"))
                .map(names_facturx)
                .unwrap_or(false)
        })
}

fn read_attachment(doc: &Document, filespec: &Dictionary) -> Result<String, FacturError> {
    let stream = filespec
        .get(b"EF")
        .ok()
        .and_then(|o| deref_dict(doc, o))
        .and_then(|ef| ef.get(b"F").ok())
        .and_then(|o| match o {
            Object::Reference(id) => doc.get_object(*id).ok(),
            direct => Some(direct),
        })
        .and_then(|o| o.as_stream().ok())
        .ok_or_else(|| FacturError::Pdf("attachment carries no embedded file stream".into()))?;

    // A stream without a Filter entry is stored raw and makes
    // decompressed_content() fail; take the bytes as they are then.
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    String::from_utf8(bytes)
        .map_err(|e| FacturError::Pdf(format!("embedded XML is not valid UTF-8: {e}")))
}

fn names_facturx(name: &Object) -> bool {
    match name {
        Object::String(bytes, _) => String::from_utf8_lossy(bytes)
            .to_lowercase()
            .contains("factur-x"),
        _ => false,
    }
}

fn deref_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}
