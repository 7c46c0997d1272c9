use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{
    InvoiceRecord, is_known_currency_code, is_valid_siret, is_valid_vat_number,
};

/// Identifier of one registered compliance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    InvoiceNumberPresent,
    IssueDatePresent,
    SupplierNamePresent,
    SupplierSiretPresent,
    SupplierSiretShape,
    SupplierAddressPresent,
    SupplierVatNumberPresent,
    SupplierVatNumberShape,
    BuyerNamePresent,
    BuyerSiretPresent,
    TotalInclTaxPresent,
    AmountCoherence,
    LineSumMatchesTotal,
    DueDateAfterIssue,
    PaymentTermsWithinLme,
    CurrencyKnown,
    VatRatesFrench,
    HasLineItems,
}

/// Rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    Legal,
    Format,
    Business,
    Technical,
}

/// How binding the rule is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleLevel {
    Mandatory,
    Recommended,
    Optional,
}

/// Severity of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

/// One registry entry: identity and classification. Evaluation lives in
/// [`check`]; rules are data, never per-invocation state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub id: RuleId,
    pub name: &'static str,
    pub category: RuleCategory,
    pub level: RuleLevel,
    pub impact: Impact,
}

const REGISTRY: &[ComplianceRule] = &[
    ComplianceRule {
        id: RuleId::InvoiceNumberPresent,
        name: "Numéro de facture",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::Critical,
    },
    ComplianceRule {
        id: RuleId::IssueDatePresent,
        name: "Date d'émission",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::Critical,
    },
    ComplianceRule {
        id: RuleId::SupplierNamePresent,
        name: "Dénomination du fournisseur",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::Critical,
    },
    ComplianceRule {
        id: RuleId::SupplierSiretPresent,
        name: "SIRET du fournisseur",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::Critical,
    },
    ComplianceRule {
        id: RuleId::SupplierSiretShape,
        name: "Format SIRET (14 chiffres)",
        category: RuleCategory::Format,
        level: RuleLevel::Mandatory,
        impact: Impact::High,
    },
    ComplianceRule {
        id: RuleId::SupplierAddressPresent,
        name: "Adresse du fournisseur",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::High,
    },
    ComplianceRule {
        id: RuleId::SupplierVatNumberPresent,
        name: "Numéro de TVA intracommunautaire",
        category: RuleCategory::Legal,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::SupplierVatNumberShape,
        name: "Format du numéro de TVA",
        category: RuleCategory::Format,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::BuyerNamePresent,
        name: "Dénomination du client",
        category: RuleCategory::Legal,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::BuyerSiretPresent,
        name: "SIRET du client",
        category: RuleCategory::Business,
        level: RuleLevel::Optional,
        impact: Impact::Low,
    },
    ComplianceRule {
        id: RuleId::TotalInclTaxPresent,
        name: "Montant TTC",
        category: RuleCategory::Legal,
        level: RuleLevel::Mandatory,
        impact: Impact::Critical,
    },
    ComplianceRule {
        id: RuleId::AmountCoherence,
        name: "Cohérence HT + TVA = TTC",
        category: RuleCategory::Business,
        level: RuleLevel::Mandatory,
        impact: Impact::High,
    },
    ComplianceRule {
        id: RuleId::LineSumMatchesTotal,
        name: "Somme des lignes = total HT",
        category: RuleCategory::Business,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::DueDateAfterIssue,
        name: "Échéance postérieure à l'émission",
        category: RuleCategory::Business,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::PaymentTermsWithinLme,
        name: "Délai de paiement ≤ 60 jours (LME)",
        category: RuleCategory::Legal,
        level: RuleLevel::Recommended,
        impact: Impact::High,
    },
    ComplianceRule {
        id: RuleId::CurrencyKnown,
        name: "Devise ISO 4217",
        category: RuleCategory::Format,
        level: RuleLevel::Mandatory,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::VatRatesFrench,
        name: "Taux de TVA français",
        category: RuleCategory::Business,
        level: RuleLevel::Recommended,
        impact: Impact::Medium,
    },
    ComplianceRule {
        id: RuleId::HasLineItems,
        name: "Lignes de facturation",
        category: RuleCategory::Technical,
        level: RuleLevel::Recommended,
        impact: Impact::Low,
    },
];

/// The static rule registry.
pub fn registry() -> &'static [ComplianceRule] {
    REGISTRY
}

/// Raw outcome of one rule check.
pub(crate) struct Outcome {
    pub passed: bool,
    pub message: String,
    pub suggested_fix: Option<String>,
}

impl Outcome {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            suggested_fix: None,
        }
    }

    fn fail(message: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            suggested_fix: Some(fix.into()),
        }
    }
}

const AMOUNT_TOLERANCE: Decimal = dec!(0.01);
const FR_RATES: [Decimal; 5] = [dec!(0), dec!(2.1), dec!(5.5), dec!(10), dec!(20)];

fn present(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Pure evaluation dispatch: one record in, one outcome out. No I/O,
/// no panics; failures are data.
pub(crate) fn check(id: RuleId, record: &InvoiceRecord) -> Outcome {
    match id {
        RuleId::InvoiceNumberPresent => {
            if record.number.trim().is_empty() {
                Outcome::fail(
                    "invoice number is missing",
                    "assign a sequential invoice number",
                )
            } else {
                Outcome::pass("invoice number present")
            }
        }
        RuleId::IssueDatePresent => {
            if record.issue_date.is_some() {
                Outcome::pass("issue date present")
            } else {
                Outcome::fail("issue date is missing", "set the invoice issue date")
            }
        }
        RuleId::SupplierNamePresent => {
            if present(&record.supplier.name) {
                Outcome::pass("supplier name present")
            } else {
                Outcome::fail(
                    "supplier name is missing",
                    "add the supplier legal name (dénomination sociale)",
                )
            }
        }
        RuleId::SupplierSiretPresent => {
            if present(&record.supplier.siret) {
                Outcome::pass("supplier SIRET present")
            } else {
                Outcome::fail(
                    "supplier SIRET is missing",
                    "add the 14-digit SIRET of the issuing establishment",
                )
            }
        }
        RuleId::SupplierSiretShape => match record.supplier.siret.as_deref() {
            Some(s) if !is_valid_siret(s) => Outcome::fail(
                format!("supplier SIRET '{s}' is not 14 digits"),
                "correct the SIRET to exactly 14 digits",
            ),
            _ => Outcome::pass("supplier SIRET well-formed"),
        },
        RuleId::SupplierAddressPresent => {
            if present(&record.supplier.address) {
                Outcome::pass("supplier address present")
            } else {
                Outcome::fail(
                    "supplier address is missing",
                    "add the supplier postal address",
                )
            }
        }
        RuleId::SupplierVatNumberPresent => {
            if present(&record.supplier.vat_number) {
                Outcome::pass("supplier VAT number present")
            } else {
                Outcome::fail(
                    "supplier VAT number is missing",
                    "add the intra-community VAT number (FR + 11 characters)",
                )
            }
        }
        RuleId::SupplierVatNumberShape => match record.supplier.vat_number.as_deref() {
            Some(v) if !is_valid_vat_number(v) => Outcome::fail(
                format!("supplier VAT number '{v}' is malformed"),
                "use the form FR + 2-character key + 9-digit SIREN",
            ),
            _ => Outcome::pass("supplier VAT number well-formed"),
        },
        RuleId::BuyerNamePresent => {
            if present(&record.buyer.name) {
                Outcome::pass("buyer name present")
            } else {
                Outcome::fail("buyer name is missing", "add the buyer name")
            }
        }
        RuleId::BuyerSiretPresent => {
            if present(&record.buyer.siret) {
                Outcome::pass("buyer SIRET present")
            } else {
                Outcome::fail(
                    "buyer SIRET is missing",
                    "add the buyer SIRET for B2B routing",
                )
            }
        }
        RuleId::TotalInclTaxPresent => match record.total_incl_tax {
            Some(t) if t > Decimal::ZERO => Outcome::pass("total including VAT present"),
            Some(_) => Outcome::fail(
                "total including VAT is not positive",
                "check the extracted TTC amount",
            ),
            None => Outcome::fail(
                "total including VAT is missing",
                "add the TTC amount",
            ),
        },
        RuleId::AmountCoherence => {
            let (Some(excl), Some(tax), Some(incl)) = (
                record.total_excl_tax,
                record.total_tax,
                record.total_incl_tax,
            ) else {
                // Coherence is only checkable with all three totals.
                return Outcome::pass("amount coherence not applicable");
            };
            let diff = (excl + tax - incl).abs();
            if diff < AMOUNT_TOLERANCE {
                Outcome::pass("HT + TVA equals TTC")
            } else {
                Outcome::fail(
                    format!("HT {excl} + TVA {tax} differs from TTC {incl} by {diff}"),
                    "re-extract or correct the three totals",
                )
            }
        }
        RuleId::LineSumMatchesTotal => {
            let (Some(lines_total), Some(excl)) =
                (record.lines_net_total(), record.total_excl_tax)
            else {
                return Outcome::pass("line sum check not applicable");
            };
            let diff = (lines_total - excl).abs();
            if diff < AMOUNT_TOLERANCE {
                Outcome::pass("line totals match the net total")
            } else {
                Outcome::fail(
                    format!("line sum {lines_total} differs from net total {excl}"),
                    "reconcile line amounts with the net total",
                )
            }
        }
        RuleId::DueDateAfterIssue => {
            let (Some(due), Some(issue)) = (record.due_date, record.issue_date) else {
                return Outcome::pass("due date check not applicable");
            };
            if due >= issue {
                Outcome::pass("due date follows issue date")
            } else {
                Outcome::fail(
                    "due date precedes the issue date",
                    "set a due date on or after the issue date",
                )
            }
        }
        RuleId::PaymentTermsWithinLme => match record.payment_terms_days {
            Some(days) if days > 60 => Outcome::fail(
                format!("payment terms of {days} days exceed the 60-day LME cap"),
                "reduce payment terms to at most 60 days",
            ),
            _ => Outcome::pass("payment terms within the legal cap"),
        },
        RuleId::CurrencyKnown => {
            if is_known_currency_code(&record.currency) {
                Outcome::pass("currency code recognized")
            } else {
                Outcome::fail(
                    format!("currency '{}' is not a known ISO 4217 code", record.currency),
                    "use a 3-letter ISO 4217 code such as EUR",
                )
            }
        }
        RuleId::VatRatesFrench => {
            let bad: Vec<String> = record
                .lines
                .iter()
                .filter_map(|l| l.vat_rate)
                .filter(|r| !FR_RATES.contains(r))
                .map(|r| r.to_string())
                .collect();
            if bad.is_empty() {
                Outcome::pass("all VAT rates are French rates")
            } else {
                Outcome::fail(
                    format!("unexpected VAT rate(s): {}", bad.join(", ")),
                    "use a French rate (0, 2.1, 5.5, 10 or 20)",
                )
            }
        }
        RuleId::HasLineItems => {
            if record.lines.is_empty() {
                Outcome::fail(
                    "invoice has no line items",
                    "add at least one line item; a synthetic line will otherwise be derived from the totals",
                )
            } else {
                Outcome::pass("line items present")
            }
        }
    }
}
