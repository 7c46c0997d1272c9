//! Rule-based compliance scoring engine.
//!
//! Evaluates a fixed registry of French legal / EU interoperability rules
//! against one [`InvoiceRecord`](crate::core::InvoiceRecord) and produces a
//! [`ComplianceReport`]. Findings are always data — a non-compliant report
//! is a successful call, never an error.
//!
//! The registry is a static slice of [`ComplianceRule`] descriptors over a
//! [`RuleId`] sum type; adding a rule is a data addition plus one dispatch
//! arm, with no change to the scoring path.

mod engine;
mod report;
mod rules;

pub use engine::{evaluate, quick_check};
pub use report::*;
pub use rules::{ComplianceRule, Impact, RuleCategory, RuleId, RuleLevel, registry};
