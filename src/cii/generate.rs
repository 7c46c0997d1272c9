use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::profile::FacturXProfile;
use super::xml_utils::XmlWriter;
use super::{LEGAL_PAYMENT_NOTE, cii_ns};
use crate::core::{
    FacturError, InvoiceLine, InvoiceRecord, TradeParty, format_amount, format_cii_date,
    round_half_up,
};

/// UNTDID 1001 — commercial invoice.
const TYPE_CODE_INVOICE: &str = "380";
/// ICD 0009 — SIRET scheme identifier for `SpecifiedLegalOrganization`.
const SIRET_SCHEME_ID: &str = "0009";
/// UN/CEFACT Rec 20 "unit" — extracted records carry no unit of measure.
const DEFAULT_UNIT: &str = "C62";
/// VATEX code declared for zero-rated documents.
const EXEMPTION_REASON_CODE: &str = "VATEX-EU-O";

/// Generate Factur-X CII XML for the record under the given profile.
///
/// Unconditional legal prerequisites — invoice number, issue date,
/// supplier name, supplier SIRET, supplier address — abort with
/// [`FacturError::MissingMandatoryField`]; nothing is ever substituted
/// with a placeholder.
pub fn generate_xml(
    record: &InvoiceRecord,
    profile: FacturXProfile,
) -> Result<String, FacturError> {
    if record.number.trim().is_empty() {
        return Err(FacturError::missing("number"));
    }
    let issue_date = record.issue_date.ok_or(FacturError::missing("issue_date"))?;
    nonempty(&record.supplier.name).ok_or(FacturError::missing("supplier.name"))?;
    nonempty(&record.supplier.siret).ok_or(FacturError::missing("supplier.siret"))?;
    nonempty(&record.supplier.address).ok_or(FacturError::missing("supplier.address"))?;

    let vat_rate = derive_vat_rate(record);
    let amounts = Amounts::derive(record, vat_rate);

    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element("rsm:ExchangedDocumentContext")?;
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", profile.urn())?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // --- ExchangedDocument ---
    w.start_element("rsm:ExchangedDocument")?;
    w.text_element("ram:ID", &record.number)?;
    w.text_element("ram:TypeCode", TYPE_CODE_INVOICE)?;
    write_cii_date(&mut w, "ram:IssueDateTime", &issue_date)?;
    w.start_element("ram:IncludedNote")?;
    w.text_element("ram:Content", LEGAL_PAYMENT_NOTE)?;
    w.end_element("ram:IncludedNote")?;
    w.end_element("rsm:ExchangedDocument")?;

    // --- SupplyChainTradeTransaction ---
    w.start_element("rsm:SupplyChainTradeTransaction")?;

    // Line items; a single synthetic line is derived from the totals
    // when the record carries none.
    if record.lines.is_empty() {
        let synthetic = InvoiceLine::new(
            "Montant total de la facture",
            dec!(1),
            amounts.line_total,
            Some(vat_rate),
        );
        write_cii_line(&mut w, 1, &synthetic, vat_rate)?;
    } else {
        for (i, line) in record.lines.iter().enumerate() {
            write_cii_line(&mut w, i + 1, line, vat_rate)?;
        }
    }

    // --- ApplicableHeaderTradeAgreement ---
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    write_cii_party(&mut w, &record.supplier, "ram:SellerTradeParty")?;
    if nonempty(&record.buyer.name).is_some() {
        write_cii_party(&mut w, &record.buyer, "ram:BuyerTradeParty")?;
    }
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    // --- ApplicableHeaderTradeDelivery ---
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    w.start_element("ram:ActualDeliverySupplyChainEvent")?;
    write_cii_date(&mut w, "ram:OccurrenceDateTime", &issue_date)?;
    w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    // --- ApplicableHeaderTradeSettlement ---
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    w.text_element("ram:InvoiceCurrencyCode", &record.currency)?;

    w.start_element("ram:ApplicableTradeTax")?;
    w.amount_element("ram:CalculatedAmount", amounts.tax_total)?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.amount_element("ram:BasisAmount", amounts.tax_basis)?;
    w.text_element("ram:CategoryCode", vat_category_code(vat_rate))?;
    if vat_rate.is_zero() {
        w.text_element("ram:ExemptionReasonCode", EXEMPTION_REASON_CODE)?;
    }
    w.text_element("ram:RateApplicablePercent", &format_amount(vat_rate))?;
    w.end_element("ram:ApplicableTradeTax")?;

    if record.payment_terms_days.is_some() || record.due_date.is_some() {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        if let Some(days) = record.payment_terms_days {
            w.text_element("ram:Description", &format!("Paiement à {days} jours"))?;
        }
        if let Some(due) = &record.due_date {
            write_cii_date(&mut w, "ram:DueDateDateTime", due)?;
        }
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }

    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", amounts.line_total)?;
    w.amount_element("ram:TaxBasisTotalAmount", amounts.tax_basis)?;
    w.text_element_with_attrs(
        "ram:TaxTotalAmount",
        &format_amount(amounts.tax_total),
        &[("currencyID", record.currency.as_str())],
    )?;
    w.amount_element("ram:GrandTotalAmount", amounts.grand_total)?;
    w.amount_element("ram:DuePayableAmount", amounts.grand_total)?;
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryInvoice")?;

    w.into_string()
}

/// Document-level amounts, reconciled from whichever of the totals and
/// lines the record actually carries.
struct Amounts {
    line_total: Decimal,
    tax_basis: Decimal,
    tax_total: Decimal,
    grand_total: Decimal,
}

impl Amounts {
    fn derive(record: &InvoiceRecord, vat_rate: Decimal) -> Self {
        let lines_sum = record.lines_net_total();
        let tax_basis = record
            .total_excl_tax
            .or(lines_sum)
            .unwrap_or_else(|| match record.total_incl_tax {
                // Back out the basis from the gross when only TTC is known.
                Some(incl) => round_half_up(incl / (Decimal::ONE + vat_rate / dec!(100)), 2),
                None => Decimal::ZERO,
            });
        let line_total = lines_sum.unwrap_or(tax_basis);
        let tax_total = record
            .total_tax
            .unwrap_or_else(|| round_half_up(tax_basis * vat_rate / dec!(100), 2));
        let grand_total = record.total_incl_tax.unwrap_or(tax_basis + tax_total);
        Self {
            line_total,
            tax_basis,
            tax_total,
            grand_total,
        }
    }
}

/// Effective document VAT rate: first explicit line rate, else
/// VAT ÷ net rounded to two decimals, else the standard 20.00.
fn derive_vat_rate(record: &InvoiceRecord) -> Decimal {
    if let Some(rate) = record.lines.iter().find_map(|l| l.vat_rate) {
        return rate;
    }
    if let (Some(tax), Some(excl)) = (record.total_tax, record.total_excl_tax) {
        if !excl.is_zero() {
            return round_half_up(tax / excl * dec!(100), 2);
        }
    }
    dec!(20.00)
}

/// UNTDID 5305 category letter. Zero-rated documents declare the
/// exemption category; every nonzero French rate maps to standard —
/// reduced rates deliberately keep the `S` letter (observed platform
/// behavior).
fn vat_category_code(rate: Decimal) -> &'static str {
    if rate.is_zero() { "E" } else { "S" }
}

fn nonempty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn write_cii_date(w: &mut XmlWriter, element: &str, date: &NaiveDate) -> Result<(), FacturError> {
    w.start_element(element)?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &format_cii_date(date),
        &[("format", "102")],
    )?;
    w.end_element(element)?;
    Ok(())
}

fn write_cii_party(
    w: &mut XmlWriter,
    party: &TradeParty,
    element: &str,
) -> Result<(), FacturError> {
    // CII schema requires strict element order within TradeParty:
    // Name → SpecifiedLegalOrganization → PostalTradeAddress →
    // SpecifiedTaxRegistration
    w.start_element(element)?;
    if let Some(name) = nonempty(&party.name) {
        w.text_element("ram:Name", name)?;
    }

    if let Some(siret) = nonempty(&party.siret) {
        w.start_element("ram:SpecifiedLegalOrganization")?;
        w.text_element_with_attrs("ram:ID", siret, &[("schemeID", SIRET_SCHEME_ID)])?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }

    w.start_element("ram:PostalTradeAddress")?;
    if let Some(postal) = nonempty(&party.postal_code) {
        w.text_element("ram:PostcodeCode", postal)?;
    }
    if let Some(street) = nonempty(&party.address) {
        w.text_element("ram:LineOne", street)?;
    }
    if let Some(city) = nonempty(&party.city) {
        w.text_element("ram:CityName", city)?;
    }
    w.text_element("ram:CountryID", &party.country)?;
    w.end_element("ram:PostalTradeAddress")?;

    if let Some(vat) = nonempty(&party.vat_number) {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs("ram:ID", vat, &[("schemeID", "VA")])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(element)?;
    Ok(())
}

fn write_cii_line(
    w: &mut XmlWriter,
    index: usize,
    line: &InvoiceLine,
    document_rate: Decimal,
) -> Result<(), FacturError> {
    let rate = line.vat_rate.unwrap_or(document_rate);

    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &index.to_string())?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    w.text_element("ram:Name", &line.description)?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.amount_element("ram:ChargeAmount", line.unit_price)?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element("ram:BilledQuantity", line.quantity, DEFAULT_UNIT)?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    w.start_element("ram:ApplicableTradeTax")?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.text_element("ram:CategoryCode", vat_category_code(rate))?;
    w.text_element("ram:RateApplicablePercent", &format_amount(rate))?;
    w.end_element("ram:ApplicableTradeTax")?;
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", line.line_total())?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
