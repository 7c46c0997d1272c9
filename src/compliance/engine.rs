use rust_decimal::Decimal;

use super::report::*;
use super::rules::{self, Impact, RuleCategory, RuleLevel};
use crate::core::InvoiceRecord;

/// Evaluate every registered rule against the record.
///
/// Never short-circuits — all rules always run so the report is complete.
/// Pure function of its input; failures are represented in the report,
/// never returned as errors.
pub fn evaluate(record: &InvoiceRecord) -> ComplianceReport {
    let results: Vec<RuleResult> = rules::registry()
        .iter()
        .map(|rule| {
            let outcome = rules::check(rule.id, record);
            RuleResult {
                rule: rule.id,
                category: rule.category,
                level: rule.level,
                impact: rule.impact,
                passed: outcome.passed,
                message: outcome.message,
                suggested_fix: outcome.suggested_fix,
            }
        })
        .collect();

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    let mandatory: Vec<&RuleResult> = results
        .iter()
        .filter(|r| r.level == RuleLevel::Mandatory)
        .collect();
    let mandatory_passed = mandatory.iter().filter(|r| r.passed).count();

    // Defaults to 1.0 with zero mandatory rules (no division by zero).
    let mandatory_ratio = if mandatory.is_empty() {
        1.0
    } else {
        mandatory_passed as f64 / mandatory.len() as f64
    };
    let all_ratio = if total == 0 {
        1.0
    } else {
        passed as f64 / total as f64
    };
    let score = ((0.7 * mandatory_ratio + 0.3 * all_ratio) * 100.0).round() as u8;

    let any_critical_failed = results
        .iter()
        .any(|r| !r.passed && r.impact == Impact::Critical);
    let any_mandatory_failed = mandatory_passed < mandatory.len();

    let level = if any_critical_failed || any_mandatory_failed {
        ComplianceLevel::NonCompliant
    } else if score < 80 {
        ComplianceLevel::Warnings
    } else {
        ComplianceLevel::Compliant
    };

    let blockers: Vec<String> = results
        .iter()
        .filter(|r| !r.passed && r.impact == Impact::Critical)
        .map(|r| r.message.clone())
        .collect();

    // Critical fixes surface as blockers, not recommendations.
    let recommendations: Vec<String> = results
        .iter()
        .filter(|r| !r.passed && r.impact != Impact::Critical)
        .filter_map(|r| r.suggested_fix.clone())
        .collect();

    let category_scores = [
        RuleCategory::Legal,
        RuleCategory::Format,
        RuleCategory::Business,
        RuleCategory::Technical,
    ]
    .iter()
    .map(|&category| {
        let in_cat: Vec<&RuleResult> =
            results.iter().filter(|r| r.category == category).collect();
        let cat_passed = in_cat.iter().filter(|r| r.passed).count();
        let cat_score = if in_cat.is_empty() {
            100
        } else {
            ((cat_passed as f64 / in_cat.len() as f64) * 100.0).round() as u8
        };
        CategoryScore {
            category,
            passed: cat_passed,
            total: in_cat.len(),
            score: cat_score,
        }
    })
    .collect();

    ComplianceReport {
        score,
        level,
        results,
        category_scores,
        blockers,
        recommendations,
    }
}

/// Fast check over the four unconditionally mandatory legal fields:
/// invoice number, issue date, supplier name, positive total-including-VAT.
///
/// Interactive feedback only — never a substitute for [`evaluate`] before
/// final generation.
pub fn quick_check(record: &InvoiceRecord) -> QuickCheck {
    let mut critical_issues = Vec::new();

    if record.number.trim().is_empty() {
        critical_issues.push("invoice number is missing".to_string());
    }
    if record.issue_date.is_none() {
        critical_issues.push("issue date is missing".to_string());
    }
    if record
        .supplier
        .name
        .as_deref()
        .is_none_or(|n| n.trim().is_empty())
    {
        critical_issues.push("supplier name is missing".to_string());
    }
    match record.total_incl_tax {
        Some(t) if t > Decimal::ZERO => {}
        _ => critical_issues.push("total including VAT is missing or not positive".to_string()),
    }

    let passed = 4 - critical_issues.len();
    QuickCheck {
        is_compliant: critical_issues.is_empty(),
        score: ((passed as f64 / 4.0) * 100.0).round() as u8,
        critical_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::RuleId;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn supplier() -> TradeParty {
        TradePartyBuilder::new()
            .name("ACME SARL")
            .address("12 rue de la Paix")
            .postal_code("75002")
            .city("Paris")
            .siret("73282932000074")
            .vat_number("FR32732829320")
            .build()
    }

    fn valid_record() -> InvoiceRecord {
        InvoiceRecordBuilder::new("2024-001")
            .issue_date(date())
            .due_date(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap())
            .payment_terms_days(30)
            .supplier(supplier())
            .buyer(
                TradePartyBuilder::new()
                    .name("Client SAS")
                    .siret("55210055400013")
                    .build(),
            )
            .add_line(InvoiceLine::new("Conseil", dec!(2), dec!(50), Some(dec!(20))))
            .totals(dec!(100), dec!(20), dec!(120))
            .build()
    }

    #[test]
    fn fully_valid_record_is_compliant_at_100() {
        let report = evaluate(&valid_record());
        assert_eq!(report.score, 100);
        assert_eq!(report.level, ComplianceLevel::Compliant);
        assert!(report.blockers.is_empty());
        assert!(report.recommendations.is_empty());
        for cs in &report.category_scores {
            assert_eq!(cs.score, 100, "category {:?}", cs.category);
        }
    }

    #[test]
    fn all_rules_always_run() {
        let empty = InvoiceRecordBuilder::new("").build();
        let report = evaluate(&empty);
        assert_eq!(report.results.len(), rules::registry().len());
    }

    #[test]
    fn missing_siret_is_non_compliant() {
        let mut record = valid_record();
        record.supplier.siret = None;
        let report = evaluate(&record);
        assert_eq!(report.level, ComplianceLevel::NonCompliant);
        assert!(
            report.blockers.iter().any(|b| b.contains("SIRET")),
            "blockers: {:?}",
            report.blockers
        );
    }

    #[test]
    fn amount_coherence_tolerance() {
        let mut record = valid_record();
        record.total_incl_tax = Some(dec!(120.005));
        let report = evaluate(&record);
        let coherence = report
            .results
            .iter()
            .find(|r| r.rule == RuleId::AmountCoherence)
            .unwrap();
        assert!(coherence.passed);

        record.total_incl_tax = Some(dec!(120.02));
        let report = evaluate(&record);
        let coherence = report
            .results
            .iter()
            .find(|r| r.rule == RuleId::AmountCoherence)
            .unwrap();
        assert!(!coherence.passed);
    }

    #[test]
    fn non_critical_failures_become_recommendations() {
        let mut record = valid_record();
        record.payment_terms_days = Some(90);
        let report = evaluate(&record);
        assert!(report.blockers.is_empty());
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r.contains("60 days")),
            "recommendations: {:?}",
            report.recommendations
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let record = valid_record();
        let a = evaluate(&record);
        let b = evaluate(&record);
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.blockers, b.blockers);
        assert_eq!(a.recommendations, b.recommendations);
        let msgs_a: Vec<&str> = a.results.iter().map(|r| r.message.as_str()).collect();
        let msgs_b: Vec<&str> = b.results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(msgs_a, msgs_b);
    }

    #[test]
    fn quick_check_lists_exactly_the_missing_fields() {
        let record = InvoiceRecordBuilder::new("")
            .supplier(TradePartyBuilder::new().name("ACME").build())
            .totals(dec!(100), dec!(20), dec!(120))
            .build();
        let qc = quick_check(&record);
        assert!(!qc.is_compliant);
        assert_eq!(qc.critical_issues.len(), 2);
        assert!(qc.critical_issues[0].contains("invoice number"));
        assert!(qc.critical_issues[1].contains("issue date"));
        assert_eq!(qc.score, 50);
    }

    #[test]
    fn quick_check_passes_on_core_fields() {
        let qc = quick_check(&valid_record());
        assert!(qc.is_compliant);
        assert_eq!(qc.score, 100);
        assert!(qc.critical_issues.is_empty());
    }

    #[test]
    fn negative_total_fails_quick_check() {
        let mut record = valid_record();
        record.total_incl_tax = Some(dec!(-5));
        let qc = quick_check(&record);
        assert!(!qc.is_compliant);
        assert_eq!(qc.critical_issues.len(), 1);
    }
}
