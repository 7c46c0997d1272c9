use lopdf::{Document, Object, Stream, dictionary};
use rust_decimal::Decimal;

use crate::cii::LEGAL_PAYMENT_NOTE;
use crate::core::{InvoiceRecord, format_amount};

/// Synthesize a minimal one-page visual rendition of the invoice.
///
/// Used when the caller supplies no original PDF. Not a layout engine:
/// a header, party blocks, the line table and the totals in Helvetica,
/// enough to give the embedded XML a human-readable counterpart.
pub fn synthesize(record: &InvoiceRecord) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id),
            "F2" => Object::Reference(bold_id),
        },
    });

    let content = Stream::new(dictionary! {}, render_content(record).into_bytes());
    let content_id = doc.add_object(content);
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        // A4
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

fn render_content(record: &InvoiceRecord) -> String {
    let mut page = Page::new();

    page.heading(&format!("FACTURE {}", record.number));
    if let Some(date) = record.issue_date {
        page.line(&format!("Date d'émission : {}", date.format("%d/%m/%Y")));
    }
    if let Some(due) = record.due_date {
        page.line(&format!("Date d'échéance : {}", due.format("%d/%m/%Y")));
    }
    page.gap();

    page.bold("Émetteur");
    party_block(&mut page, &record.supplier);
    page.gap();

    if record.buyer.name.is_some() {
        page.bold("Destinataire");
        party_block(&mut page, &record.buyer);
        page.gap();
    }

    if !record.lines.is_empty() {
        page.bold("Désignation / Quantité / PU HT / Total HT");
        for l in &record.lines {
            page.line(&format!(
                "{}  {} x {} = {} {}",
                l.description,
                format_amount(l.quantity),
                format_amount(l.unit_price),
                format_amount(l.line_total()),
                record.currency,
            ));
        }
        page.gap();
    }

    total_line(&mut page, "Total HT", record.total_excl_tax, &record.currency);
    total_line(&mut page, "TVA", record.total_tax, &record.currency);
    total_line(&mut page, "Total TTC", record.total_incl_tax, &record.currency);
    page.gap();

    page.line(LEGAL_PAYMENT_NOTE);

    page.finish()
}

fn party_block(page: &mut Page, party: &crate::core::TradeParty) {
    if let Some(name) = &party.name {
        page.line(name);
    }
    if let Some(address) = &party.address {
        page.line(address);
    }
    match (&party.postal_code, &party.city) {
        (Some(cp), Some(city)) => page.line(&format!("{cp} {city}")),
        (None, Some(city)) => page.line(city),
        (Some(cp), None) => page.line(cp),
        (None, None) => {}
    }
    if let Some(siret) = &party.siret {
        page.line(&format!("SIRET : {siret}"));
    }
    if let Some(vat) = &party.vat_number {
        page.line(&format!("N° TVA : {vat}"));
    }
}

fn total_line(page: &mut Page, label: &str, amount: Option<Decimal>, currency: &str) {
    if let Some(a) = amount {
        page.bold(&format!("{label} : {} {currency}", format_amount(a)));
    }
}

/// Text cursor over a single A4 page.
struct Page {
    ops: String,
    y: i32,
}

impl Page {
    fn new() -> Self {
        Self {
            ops: String::new(),
            y: 800,
        }
    }

    fn heading(&mut self, text: &str) {
        self.write("F2", 16, text);
        self.y -= 10;
    }

    fn bold(&mut self, text: &str) {
        self.write("F2", 10, text);
    }

    fn line(&mut self, text: &str) {
        self.write("F1", 10, text);
    }

    fn gap(&mut self) {
        self.y -= 8;
    }

    fn write(&mut self, font: &str, size: i32, text: &str) {
        self.ops.push_str(&format!(
            "BT /{font} {size} Tf 50 {} Td ({}) Tj ET\n",
            self.y,
            escape_pdf_string(text)
        ));
        self.y -= size + 6;
    }

    fn finish(self) -> String {
        self.ops
    }
}

/// Escape the characters reserved inside a PDF literal string.
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvoiceLine, InvoiceRecordBuilder, TradePartyBuilder};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn synthesized_pdf_serializes() {
        let record = InvoiceRecordBuilder::new("2024-001")
            .issue_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
            .supplier(
                TradePartyBuilder::new()
                    .name("ACME (Paris)")
                    .address("1 rue de Rivoli")
                    .siret("73282932000074")
                    .build(),
            )
            .add_line(InvoiceLine::new("Conseil", dec!(2), dec!(50), Some(dec!(20))))
            .totals(dec!(100), dec!(20), dec!(120))
            .build();
        let mut doc = synthesize(&record);
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF"));
    }

    #[test]
    fn parentheses_are_escaped() {
        assert_eq!(escape_pdf_string("a(b)c\\"), "a\\(b\\)c\\\\");
    }
}
