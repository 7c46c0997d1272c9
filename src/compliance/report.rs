use serde::{Deserialize, Serialize};

use super::rules::{Impact, RuleCategory, RuleId, RuleLevel};

/// Outcome of one rule evaluation. Produced fresh on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: RuleId,
    pub category: RuleCategory,
    pub level: RuleLevel,
    pub impact: Impact,
    pub passed: bool,
    /// Human-readable, field-attributable finding.
    pub message: String,
    /// Suggested fix, present on failures that have one.
    pub suggested_fix: Option<String>,
}

/// Overall compliance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLevel {
    Compliant,
    Warnings,
    NonCompliant,
}

/// Per-category pass ratio expressed 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: RuleCategory,
    pub passed: usize,
    pub total: usize,
    pub score: u8,
}

/// Aggregate of all rule results for one record.
///
/// Never mutated — a changed record gets a fresh report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Overall score 0–100.
    pub score: u8,
    pub level: ComplianceLevel,
    pub results: Vec<RuleResult>,
    pub category_scores: Vec<CategoryScore>,
    /// Messages of all failed critical rules.
    pub blockers: Vec<String>,
    /// Suggested fixes of the other failed rules.
    pub recommendations: Vec<String>,
}

impl ComplianceReport {
    /// Convenience: true when nothing blocks generation.
    pub fn is_acceptable(&self) -> bool {
        self.level != ComplianceLevel::NonCompliant
    }
}

/// Lightweight verdict for fast interactive feedback.
///
/// Covers only the four unconditionally mandatory legal fields; never a
/// substitute for the full report before final generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickCheck {
    pub is_compliant: bool,
    /// Passed/4 expressed 0–100.
    pub score: u8,
    pub critical_issues: Vec<String>,
}
