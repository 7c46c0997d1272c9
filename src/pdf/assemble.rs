use chrono::Utc;
use lopdf::{Document, Object, Stream, dictionary};
use rust_decimal::Decimal;

use super::attach::AttachmentBuilder;
use super::{FACTURX_FILENAME, extract, layout, xmp};
use crate::cii::FacturXProfile;
use crate::core::{FacturError, InvoiceRecord};

/// PDF Info dictionary fields.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub creator: String,
    pub producer: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            subject: None,
            author: None,
            creator: concat!("facturx ", env!("CARGO_PKG_VERSION")).to_string(),
            producer: concat!("facturx ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Assembly options.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub profile: FacturXProfile,
    /// Attach into the supplied original rendition instead of
    /// synthesizing one.
    pub embed_original_pdf: bool,
    pub original_bytes: Option<Vec<u8>>,
    /// Name the attachment `{number}-factur-x.xml` instead of the plain
    /// `factur-x.xml`.
    pub qualify_attachment_name: bool,
    pub info: DocumentInfo,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            profile: FacturXProfile::En16931,
            embed_original_pdf: false,
            original_bytes: None,
            qualify_attachment_name: false,
            info: DocumentInfo::default(),
        }
    }
}

/// Summary data carried alongside the assembled bytes.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub invoice_number: String,
    pub total: Option<Decimal>,
    pub currency: String,
    pub profile: FacturXProfile,
    pub byte_size: usize,
}

/// Result of the post-assembly self-check on the serialized bytes.
#[derive(Debug, Clone)]
pub struct DocumentCompliance {
    pub is_pdfa3: bool,
    pub has_embedded_xml: bool,
    pub is_facturx_compliant: bool,
    pub issues: Vec<String>,
}

/// A fully assembled Factur-X document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub xml: String,
    pub metadata: DocumentMetadata,
    pub compliance: DocumentCompliance,
}

/// Assemble a PDF/A-3 document with the given CII XML embedded.
///
/// Errors only on an unloadable original or an unserializable document;
/// every degradation found by the post-assembly self-check is reported
/// through `compliance.issues` instead.
pub fn assemble(
    record: &InvoiceRecord,
    xml: &str,
    options: &AssembleOptions,
) -> Result<GeneratedDocument, FacturError> {
    let mut doc = if options.embed_original_pdf {
        let bytes = options
            .original_bytes
            .as_deref()
            .ok_or_else(|| FacturError::Pdf("embed_original_pdf set without original bytes".into()))?;
        Document::load_mem(bytes)
            .map_err(|e| FacturError::Pdf(format!("failed to load original PDF: {e}")))?
    } else {
        layout::synthesize(record)
    };

    let filename = if options.qualify_attachment_name {
        format!("{}-{FACTURX_FILENAME}", record.number)
    } else {
        FACTURX_FILENAME.to_string()
    };

    let now = Utc::now();
    AttachmentBuilder::new(&filename, xml.as_bytes())
        .af_relationship(options.profile.af_relationship())
        .attach(&mut doc, now)?;

    // XMP must not be compressed per PDF/A.
    let metadata_stream = Stream::new(
        dictionary! {
            "Type" => "Metadata",
            "Subtype" => "XML",
        },
        xmp::build_xmp(options.profile, &filename).into_bytes(),
    )
    .with_compression(false);
    let metadata_id = doc.add_object(metadata_stream);

    let catalog = doc
        .catalog_mut()
        .map_err(|e| FacturError::Pdf(format!("failed to get catalog: {e}")))?;
    catalog.set("Metadata", Object::Reference(metadata_id));
    catalog.set("MarkInfo", dictionary! { "Marked" => Object::Boolean(true) });

    let timestamp = format!("D:{}Z", now.format("%Y%m%d%H%M%S"));
    let mut info = dictionary! {
        "Creator" => Object::string_literal(options.info.creator.clone()),
        "Producer" => Object::string_literal(options.info.producer.clone()),
        "CreationDate" => Object::string_literal(timestamp.clone()),
        "ModDate" => Object::string_literal(timestamp),
    };
    let title = options
        .info
        .title
        .clone()
        .unwrap_or_else(|| format!("Facture {}", record.number));
    info.set("Title", Object::string_literal(title));
    if let Some(subject) = &options.info.subject {
        info.set("Subject", Object::string_literal(subject.clone()));
    }
    if let Some(author) = &options.info.author {
        info.set("Author", Object::string_literal(author.clone()));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| FacturError::Pdf(format!("failed to save PDF: {e}")))?;

    let compliance = self_check(&bytes);

    Ok(GeneratedDocument {
        metadata: DocumentMetadata {
            invoice_number: record.number.clone(),
            total: record.total_incl_tax,
            currency: record.currency.clone(),
            profile: options.profile,
            byte_size: bytes.len(),
        },
        compliance,
        xml: xml.to_string(),
        bytes,
    })
}

/// Reload the serialized bytes and verify what a consuming platform will
/// look for.
fn self_check(bytes: &[u8]) -> DocumentCompliance {
    let mut issues = Vec::new();

    let doc = match Document::load_mem(bytes) {
        Ok(d) => d,
        Err(e) => {
            return DocumentCompliance {
                is_pdfa3: false,
                has_embedded_xml: false,
                is_facturx_compliant: false,
                issues: vec![format!("serialized document does not reload: {e}")],
            };
        }
    };

    let mut names_ok = false;
    let mut af_ok = false;
    let mut is_pdfa3 = false;
    if let Ok(catalog) = doc.catalog() {
        names_ok = catalog
            .get(b"Names")
            .and_then(|o| o.as_reference())
            .and_then(|id| doc.get_dictionary(id))
            .map(|d| d.has(b"EmbeddedFiles"))
            .unwrap_or(false);
        af_ok = catalog
            .get(b"AF")
            .ok()
            .and_then(|o| o.as_array().ok())
            .is_some_and(|a| !a.is_empty());
        is_pdfa3 = catalog.has(b"Metadata");
    }
    if !names_ok {
        issues.push("EmbeddedFiles name tree missing from catalog".to_string());
    }
    if !af_ok {
        issues.push("catalog AF array missing or empty".to_string());
    }
    if !is_pdfa3 {
        issues.push("XMP metadata stream missing from catalog".to_string());
    }

    let mut markers_ok = false;
    let has_embedded_xml = match extract::extract_xml(bytes) {
        Ok(embedded) => {
            let markers = [
                "CrossIndustryInvoice",
                "SellerTradeParty",
                "GrandTotalAmount",
            ];
            for m in markers {
                if !embedded.contains(m) {
                    issues.push(format!("embedded XML lacks {m}"));
                }
            }
            markers_ok = markers.iter().all(|m| embedded.contains(m));
            true
        }
        Err(e) => {
            issues.push(format!("embedded XML not extractable: {e}"));
            false
        }
    };

    DocumentCompliance {
        is_pdfa3,
        has_embedded_xml,
        is_facturx_compliant: names_ok && af_ok && markers_ok,
        issues,
    }
}
