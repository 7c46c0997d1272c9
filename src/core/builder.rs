use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::*;

/// Builder for assembling an [`InvoiceRecord`] from extracted or
/// manually entered data.
///
/// No validation happens here — the record is advisory input and the
/// compliance engine scores whatever was captured.
///
/// ```
/// use facturx::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let record = InvoiceRecordBuilder::new("2024-001")
///     .issue_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .supplier(TradePartyBuilder::new().name("ACME SARL").build())
///     .totals(dec!(100), dec!(20), dec!(120))
///     .build();
/// assert_eq!(record.currency, "EUR");
/// ```
pub struct InvoiceRecordBuilder {
    number: String,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    payment_terms_days: Option<u32>,
    payment_method: Option<PaymentMethod>,
    currency: String,
    supplier: TradeParty,
    buyer: TradeParty,
    lines: Vec<InvoiceLine>,
    total_excl_tax: Option<Decimal>,
    total_tax: Option<Decimal>,
    total_incl_tax: Option<Decimal>,
}

impl InvoiceRecordBuilder {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            issue_date: None,
            due_date: None,
            payment_terms_days: None,
            payment_method: None,
            currency: "EUR".to_string(),
            supplier: TradeParty::fr(),
            buyer: TradeParty::fr(),
            lines: Vec::new(),
            total_excl_tax: None,
            total_tax: None,
            total_incl_tax: None,
        }
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn payment_terms_days(mut self, days: u32) -> Self {
        self.payment_terms_days = Some(days);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn supplier(mut self, party: TradeParty) -> Self {
        self.supplier = party;
        self
    }

    pub fn buyer(mut self, party: TradeParty) -> Self {
        self.buyer = party;
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Set all three monetary totals at once.
    pub fn totals(mut self, excl: Decimal, tax: Decimal, incl: Decimal) -> Self {
        self.total_excl_tax = Some(excl);
        self.total_tax = Some(tax);
        self.total_incl_tax = Some(incl);
        self
    }

    pub fn total_excl_tax(mut self, amount: Decimal) -> Self {
        self.total_excl_tax = Some(amount);
        self
    }

    pub fn total_tax(mut self, amount: Decimal) -> Self {
        self.total_tax = Some(amount);
        self
    }

    pub fn total_incl_tax(mut self, amount: Decimal) -> Self {
        self.total_incl_tax = Some(amount);
        self
    }

    pub fn build(self) -> InvoiceRecord {
        InvoiceRecord {
            number: self.number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            payment_terms_days: self.payment_terms_days,
            payment_method: self.payment_method,
            currency: self.currency,
            supplier: self.supplier,
            buyer: self.buyer,
            lines: self.lines,
            total_excl_tax: self.total_excl_tax,
            total_tax: self.total_tax,
            total_incl_tax: self.total_incl_tax,
        }
    }
}

impl TradeParty {
    /// Empty party with the French default country.
    pub fn fr() -> Self {
        Self {
            country: "FR".to_string(),
            ..Default::default()
        }
    }
}

/// Builder for [`TradeParty`].
#[derive(Default)]
pub struct TradePartyBuilder {
    name: Option<String>,
    address: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    country: Option<String>,
    siret: Option<String>,
    vat_number: Option<String>,
}

impl TradePartyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn postal_code(mut self, code: impl Into<String>) -> Self {
        self.postal_code = Some(code.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country = Some(code.into());
        self
    }

    pub fn siret(mut self, siret: impl Into<String>) -> Self {
        self.siret = Some(siret.into());
        self
    }

    pub fn vat_number(mut self, vat: impl Into<String>) -> Self {
        self.vat_number = Some(vat.into());
        self
    }

    pub fn build(self) -> TradeParty {
        TradeParty {
            name: self.name,
            address: self.address,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country.unwrap_or_else(|| "FR".to_string()),
            siret: self.siret,
            vat_number: self.vat_number,
        }
    }
}
