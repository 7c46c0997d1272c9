#![cfg(feature = "cii")]

use chrono::NaiveDate;
use facturx::cii::{self, FacturXProfile, LEGAL_PAYMENT_NOTE};
use facturx::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn supplier() -> TradeParty {
    TradePartyBuilder::new()
        .name("ACME")
        .address("12 rue de la Paix")
        .postal_code("75002")
        .city("Paris")
        .siret("73282932000074")
        .vat_number("FR32732829320")
        .build()
}

fn minimal_record() -> InvoiceRecord {
    InvoiceRecordBuilder::new("2024-001")
        .issue_date(date(2024, 6, 15))
        .supplier(supplier())
        .total_incl_tax(dec!(120.00))
        .build()
}

fn full_record() -> InvoiceRecord {
    InvoiceRecordBuilder::new("2024-001")
        .issue_date(date(2024, 6, 15))
        .due_date(date(2024, 7, 15))
        .payment_terms_days(30)
        .supplier(supplier())
        .buyer(
            TradePartyBuilder::new()
                .name("Client SAS")
                .siret("55210055400013")
                .build(),
        )
        .add_line(InvoiceLine::new(
            "Prestation de conseil",
            dec!(2),
            dec!(50.00),
            Some(dec!(20)),
        ))
        .totals(dec!(100.00), dec!(20.00), dec!(120.00))
        .build()
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[test]
fn profile_urn_is_declared_in_document_context() {
    for (profile, urn) in [
        (
            FacturXProfile::Basic,
            "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic",
        ),
        (FacturXProfile::En16931, "urn:cen.eu:en16931:2017"),
        (
            FacturXProfile::Extended,
            "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
        ),
    ] {
        let xml = cii::generate_xml(&full_record(), profile).unwrap();
        assert!(xml.contains(&format!("<ram:ID>{urn}</ram:ID>")), "{profile:?}");
    }
}

#[test]
fn profile_selector_literals() {
    assert_eq!("BASIC".parse::<FacturXProfile>().unwrap(), FacturXProfile::Basic);
    assert_eq!("EN16931".parse::<FacturXProfile>().unwrap(), FacturXProfile::En16931);
    assert_eq!("EXTENDED".parse::<FacturXProfile>().unwrap(), FacturXProfile::Extended);
    assert!("BASIC WL".parse::<FacturXProfile>().is_err());
}

// ---------------------------------------------------------------------------
// Document content
// ---------------------------------------------------------------------------

#[test]
fn header_carries_id_type_code_and_date() {
    let xml = cii::generate_xml(&full_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:ID>2024-001</ram:ID>"));
    assert!(xml.contains("<ram:TypeCode>380</ram:TypeCode>"));
    assert!(xml.contains(r#"<udt:DateTimeString format="102">20240615</udt:DateTimeString>"#));
    assert!(xml.contains(LEGAL_PAYMENT_NOTE));
}

#[test]
fn seller_party_with_siret_scheme_and_vat_registration() {
    let xml = cii::generate_xml(&full_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains(r#"<ram:ID schemeID="0009">73282932000074</ram:ID>"#));
    assert!(xml.contains(r#"<ram:ID schemeID="VA">FR32732829320</ram:ID>"#));
    assert!(xml.contains("<ram:CountryID>FR</ram:CountryID>"));
    assert!(xml.contains("<ram:PostcodeCode>75002</ram:PostcodeCode>"));
}

#[test]
fn line_items_and_summation() {
    let xml = cii::generate_xml(&full_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:LineID>1</ram:LineID>"));
    assert!(xml.contains(r#"<ram:BilledQuantity unitCode="C62">2.00</ram:BilledQuantity>"#));
    assert!(xml.contains("<ram:ChargeAmount>50.00</ram:ChargeAmount>"));
    assert!(xml.contains("<ram:LineTotalAmount>100.00</ram:LineTotalAmount>"));
    assert!(xml.contains("<ram:TaxBasisTotalAmount>100.00</ram:TaxBasisTotalAmount>"));
    assert!(xml.contains(r#"<ram:TaxTotalAmount currencyID="EUR">20.00</ram:TaxTotalAmount>"#));
    assert!(xml.contains("<ram:GrandTotalAmount>120.00</ram:GrandTotalAmount>"));
    assert!(xml.contains("<ram:DuePayableAmount>120.00</ram:DuePayableAmount>"));
}

#[test]
fn record_without_lines_gets_a_synthetic_line() {
    let xml = cii::generate_xml(&minimal_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("IncludedSupplyChainTradeLineItem"));
    assert!(xml.contains("Montant total de la facture"));
}

#[test]
fn payment_terms_emitted_when_present() {
    let xml = cii::generate_xml(&full_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("Paiement à 30 jours"));
    assert!(xml.contains("<ram:DueDateDateTime>"));
}

// ---------------------------------------------------------------------------
// VAT derivation
// ---------------------------------------------------------------------------

#[test]
fn explicit_line_rate_wins() {
    let xml = cii::generate_xml(&full_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:RateApplicablePercent>20.00</ram:RateApplicablePercent>"));
    assert!(xml.contains("<ram:CategoryCode>S</ram:CategoryCode>"));
}

#[test]
fn rate_backed_out_of_totals() {
    let mut record = minimal_record();
    record.total_excl_tax = Some(dec!(100));
    record.total_tax = Some(dec!(5.50));
    record.total_incl_tax = Some(dec!(105.50));
    let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:RateApplicablePercent>5.50</ram:RateApplicablePercent>"));
}

#[test]
fn default_rate_is_20() {
    // Only the TTC is known: basis backed out at the standard rate.
    let xml = cii::generate_xml(&minimal_record(), FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:RateApplicablePercent>20.00</ram:RateApplicablePercent>"));
    assert!(xml.contains("<ram:TaxBasisTotalAmount>100.00</ram:TaxBasisTotalAmount>"));
    assert!(xml.contains("<ram:GrandTotalAmount>120.00</ram:GrandTotalAmount>"));
}

#[test]
fn zero_rate_uses_exemption_category() {
    let mut record = minimal_record();
    record.total_excl_tax = Some(dec!(100));
    record.total_tax = Some(dec!(0));
    record.total_incl_tax = Some(dec!(100));
    let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
    assert!(xml.contains("<ram:CategoryCode>E</ram:CategoryCode>"));
    assert!(xml.contains("<ram:ExemptionReasonCode>VATEX-EU-O</ram:ExemptionReasonCode>"));
}

#[test]
fn reduced_rates_keep_the_standard_category_letter() {
    for rate in ["2.1", "5.5", "10"] {
        let mut record = full_record();
        record.lines[0].vat_rate = Some(rate.parse().unwrap());
        let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
        assert!(xml.contains("<ram:CategoryCode>S</ram:CategoryCode>"), "rate {rate}");
    }
}

// ---------------------------------------------------------------------------
// Mandatory-field failures
// ---------------------------------------------------------------------------

#[test]
fn each_missing_prerequisite_is_reported_by_name() {
    let cases: Vec<(InvoiceRecord, &str)> = vec![
        (InvoiceRecordBuilder::new("").issue_date(date(2024, 1, 1)).supplier(supplier()).build(), "number"),
        (InvoiceRecordBuilder::new("X").supplier(supplier()).build(), "issue_date"),
        (
            {
                let mut r = minimal_record();
                r.supplier.name = None;
                r
            },
            "supplier.name",
        ),
        (
            {
                let mut r = minimal_record();
                r.supplier.siret = Some("  ".to_string());
                r
            },
            "supplier.siret",
        ),
        (
            {
                let mut r = minimal_record();
                r.supplier.address = None;
                r
            },
            "supplier.address",
        ),
    ];
    for (record, expected) in cases {
        match cii::generate_xml(&record, FacturXProfile::En16931) {
            Err(FacturError::MissingMandatoryField { field }) => assert_eq!(field, expected),
            other => panic!("expected MissingMandatoryField for {expected}, got {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

#[test]
fn reserved_characters_are_escaped() {
    let mut record = full_record();
    record.lines[0].description = r#"Pieces <10mm> & "joints" d'angle"#.to_string();
    let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
    assert!(xml.contains("Pieces &lt;10mm&gt; &amp;"));
    assert!(!xml.contains("<10mm>"));
}

// ---------------------------------------------------------------------------
// validate_xml round-trip
// ---------------------------------------------------------------------------

#[test]
fn minimally_valid_record_round_trips() {
    let record = InvoiceRecordBuilder::new("2024-001")
        .issue_date(date(2024, 6, 15))
        .supplier(
            TradePartyBuilder::new()
                .name("ACME")
                .address("1 rue Unique")
                .siret("73282932000074")
                .build(),
        )
        .total_incl_tax(dec!(120.00))
        .build();
    let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
    let check = cii::validate_xml(&xml);
    assert!(check.is_valid);
    assert!(check.errors.is_empty());
}

#[test]
fn validate_rejects_foreign_document() {
    let check = cii::validate_xml("<foo><bar/></foo>");
    assert!(!check.is_valid);
    assert!(!check.errors.is_empty());
}
