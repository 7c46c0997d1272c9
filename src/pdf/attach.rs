use chrono::{DateTime, Utc};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use sha2::{Digest, Sha256};

use crate::core::FacturError;

/// Registers an embedded file in a PDF as a PDF/A-3 attachment.
///
/// A single [`attach`](Self::attach) call produces the EmbeddedFile
/// stream, the Filespec, the `Names → EmbeddedFiles` name tree entry and
/// the catalog `AF` array together, so a document can never end up with
/// a filespec reachable from one lookup path but not the other.
pub struct AttachmentBuilder<'a> {
    filename: &'a str,
    description: &'a str,
    af_relationship: &'a str,
    payload: &'a [u8],
}

impl<'a> AttachmentBuilder<'a> {
    pub fn new(filename: &'a str, payload: &'a [u8]) -> Self {
        Self {
            filename,
            description: "Factur-X XML invoice",
            af_relationship: "Alternative",
            payload,
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    pub fn af_relationship(mut self, af_relationship: &'a str) -> Self {
        self.af_relationship = af_relationship;
        self
    }

    /// Attach the payload and register it in the catalog.
    pub fn attach(self, doc: &mut Document, now: DateTime<Utc>) -> Result<(), FacturError> {
        let checksum = hex_digest(self.payload);
        let mod_date = format!("D:{}Z", now.format("%Y%m%d%H%M%S"));

        let ef_stream = Stream::new(
            dictionary! {
                "Type" => "EmbeddedFile",
                "Subtype" => Object::Name(b"text#2Fxml".to_vec()),
                "Params" => dictionary! {
                    "Size" => Object::Integer(self.payload.len() as i64),
                    "CheckSum" => Object::string_literal(checksum),
                    "ModDate" => Object::string_literal(mod_date),
                },
            },
            self.payload.to_vec(),
        );
        let ef_stream_id = doc.add_object(ef_stream);

        let filespec = dictionary! {
            "Type" => "Filespec",
            "F" => Object::string_literal(self.filename),
            "UF" => Object::string_literal(self.filename),
            "Desc" => Object::string_literal(self.description),
            "AFRelationship" => Object::Name(self.af_relationship.as_bytes().to_vec()),
            "EF" => dictionary! {
                "F" => Object::Reference(ef_stream_id),
                "UF" => Object::Reference(ef_stream_id),
            },
        };
        let filespec_id = doc.add_object(filespec);

        let ef_name_tree = dictionary! {
            "Names" => Object::Array(vec![
                Object::string_literal(self.filename),
                Object::Reference(filespec_id),
            ]),
        };
        let ef_name_tree_id = doc.add_object(ef_name_tree);

        register_embedded_files(doc, ef_name_tree_id)?;
        register_associated_file(doc, filespec_id)?;

        Ok(())
    }
}

/// Hang the name tree under the catalog's `Names` dictionary. An original
/// rendition may already carry one (`Dests`, prior attachments); its other
/// entries are kept.
fn register_embedded_files(doc: &mut Document, tree_id: ObjectId) -> Result<(), FacturError> {
    let existing = doc
        .catalog()
        .ok()
        .and_then(|c| c.get(b"Names").ok())
        .cloned();
    match existing {
        Some(Object::Reference(id)) if doc.get_dictionary(id).is_ok() => {
            let names = doc
                .get_dictionary_mut(id)
                .map_err(|e| FacturError::Pdf(format!("catalog Names unreadable: {e}")))?;
            names.set("EmbeddedFiles", Object::Reference(tree_id));
        }
        Some(Object::Dictionary(mut names)) => {
            names.set("EmbeddedFiles", Object::Reference(tree_id));
            catalog_mut(doc)?.set("Names", Object::Dictionary(names));
        }
        _ => {
            let names_id = doc.add_object(dictionary! {
                "EmbeddedFiles" => Object::Reference(tree_id),
            });
            catalog_mut(doc)?.set("Names", Object::Reference(names_id));
        }
    }
    Ok(())
}

/// Append the filespec to the catalog `AF` array, creating it if absent.
fn register_associated_file(doc: &mut Document, filespec_id: ObjectId) -> Result<(), FacturError> {
    let existing = doc.catalog().ok().and_then(|c| c.get(b"AF").ok()).cloned();
    let af = match existing {
        Some(Object::Array(mut entries)) => {
            entries.push(Object::Reference(filespec_id));
            Object::Array(entries)
        }
        _ => Object::Array(vec![Object::Reference(filespec_id)]),
    };
    catalog_mut(doc)?.set("AF", af);
    Ok(())
}

fn catalog_mut(doc: &mut Document) -> Result<&mut lopdf::Dictionary, FacturError> {
    doc.catalog_mut()
        .map_err(|e| FacturError::Pdf(format!("failed to get catalog: {e}")))
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_hex_sha256() {
        let d = hex_digest(b"abc");
        assert_eq!(d.len(), 64);
        assert_eq!(
            d,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
