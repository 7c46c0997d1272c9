use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The canonical invoice record processed by the pipeline.
///
/// Fields that upstream extraction may fail to find are `Option` — the
/// compliance engine scores their absence instead of rejecting the record.
/// Invariant (checked by the amount-coherence rule, not by construction):
/// when all three totals are present, excl + vat must equal incl within
/// one hundredth of the currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number (unique within the supplier's sequence).
    pub number: String,
    /// Issue date.
    pub issue_date: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Payment terms in days (French LME cap: 60 days).
    pub payment_terms_days: Option<u32>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Invoice currency code (ISO 4217, default "EUR").
    pub currency: String,
    /// Supplier (seller) identity.
    pub supplier: TradeParty,
    /// Buyer identity (mostly optional).
    pub buyer: TradeParty,
    /// Ordered line items.
    pub lines: Vec<InvoiceLine>,
    /// Total excluding VAT.
    pub total_excl_tax: Option<Decimal>,
    /// Total VAT amount.
    pub total_tax: Option<Decimal>,
    /// Total including VAT.
    pub total_incl_tax: Option<Decimal>,
}

/// Supplier or buyer identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeParty {
    /// Legal name.
    pub name: Option<String>,
    /// Street address line.
    pub address: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country code (ISO 3166-1 alpha-2, default "FR").
    pub country: String,
    /// SIRET — French 14-digit establishment identifier.
    pub siret: Option<String>,
    /// VAT identifier (e.g. "FR32123456789").
    pub vat_number: Option<String>,
}

/// One invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Free-text description of the supplied good or service.
    pub description: String,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// Net unit price.
    pub unit_price: Decimal,
    /// VAT rate percentage; derived from the totals when absent.
    pub vat_rate: Option<Decimal>,
}

impl InvoiceLine {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        vat_rate: Option<Decimal>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            vat_rate,
        }
    }

    /// Net line total = quantity × unit price.
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Payment method (UNTDID 4461 subset relevant to French invoicing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// 30 — Credit transfer (virement).
    Transfer,
    /// 20 — Cheque.
    Cheque,
    /// 48 — Bank card.
    Card,
    /// 49 — Direct debit (prélèvement).
    DirectDebit,
    /// 10 — Cash.
    Cash,
    /// Other code value.
    Other(u16),
}

impl PaymentMethod {
    /// UNTDID 4461 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Transfer => 30,
            Self::Cheque => 20,
            Self::Card => 48,
            Self::DirectDebit => 49,
            Self::Cash => 10,
            Self::Other(c) => *c,
        }
    }

    /// Parse from UNTDID 4461 numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            30 => Self::Transfer,
            20 => Self::Cheque,
            48 => Self::Card,
            49 => Self::DirectDebit,
            10 => Self::Cash,
            c => Self::Other(c),
        }
    }
}

/// French VAT rates accepted by the pipeline.
pub const FRENCH_VAT_RATES: &[&str] = &["0", "2.1", "5.5", "10", "20"];

impl InvoiceRecord {
    /// True when all three monetary totals are present.
    pub fn has_all_totals(&self) -> bool {
        self.total_excl_tax.is_some() && self.total_tax.is_some() && self.total_incl_tax.is_some()
    }

    /// Sum of net line totals, `None` when the record carries no lines.
    pub fn lines_net_total(&self) -> Option<Decimal> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.iter().map(InvoiceLine::line_total).sum())
        }
    }
}
