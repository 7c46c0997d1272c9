use quick_xml::Reader;
use quick_xml::events::Event;

/// Outcome of a structural XML check.
///
/// Errors are structural defects that make the document unusable;
/// warnings flag recommended content that is merely absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Structurally validate a CII document without a schema.
///
/// Checks well-formedness, the `CrossIndustryInvoice` root, the rsm/ram
/// namespace prefixes and the presence of the key business elements.
/// This is not an EN 16931 schematron run.
pub fn validate_xml(xml: &str) -> XmlCheck {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut root: Option<String> = None;
    let mut saw_rsm_prefix = false;
    let mut saw_ram_prefix = false;
    let mut saw_document_id = false;
    let mut saw_type_code = false;
    let mut saw_seller = false;
    let mut saw_buyer = false;
    let mut saw_grand_total = false;
    let mut saw_due_payable = false;
    let mut in_exchanged_document = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if root.is_none() {
                    root = Some(name.clone());
                }
                if name.starts_with("rsm:") {
                    saw_rsm_prefix = true;
                }
                if name.starts_with("ram:") {
                    saw_ram_prefix = true;
                }
                match name.as_str() {
                    "rsm:ExchangedDocument" => in_exchanged_document = true,
                    "ram:ID" if in_exchanged_document => saw_document_id = true,
                    "ram:TypeCode" if in_exchanged_document => saw_type_code = true,
                    "ram:SellerTradeParty" => saw_seller = true,
                    "ram:BuyerTradeParty" => saw_buyer = true,
                    "ram:GrandTotalAmount" => saw_grand_total = true,
                    "ram:DuePayableAmount" => saw_due_payable = true,
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"rsm:ExchangedDocument" {
                    in_exchanged_document = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                errors.push(format!(
                    "not well-formed at byte {}: {e}",
                    reader.buffer_position()
                ));
                break;
            }
            Ok(_) => {}
        }
    }

    match root.as_deref() {
        Some("rsm:CrossIndustryInvoice") => {}
        Some(other) => errors.push(format!(
            "root element is '{other}', expected 'rsm:CrossIndustryInvoice'"
        )),
        None => errors.push("document has no root element".to_string()),
    }
    if root.is_some() {
        if !saw_rsm_prefix {
            errors.push("missing 'rsm:' namespace prefix".to_string());
        }
        if !saw_ram_prefix {
            errors.push("missing 'ram:' namespace prefix".to_string());
        }
        if !saw_document_id {
            errors.push("missing document identifier (ram:ID in rsm:ExchangedDocument)".to_string());
        }
        if !saw_seller {
            errors.push("missing ram:SellerTradeParty".to_string());
        }
        if !saw_grand_total {
            errors.push("missing ram:GrandTotalAmount".to_string());
        }
        if !saw_buyer {
            warnings.push("no ram:BuyerTradeParty (recommended for B2B)".to_string());
        }
        if !saw_due_payable {
            warnings.push("no ram:DuePayableAmount".to_string());
        }
        if !saw_type_code {
            warnings.push("no ram:TypeCode on the document (expected 380)".to_string());
        }
    }

    XmlCheck {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
