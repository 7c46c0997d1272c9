//! CSV export of the transmission store.
//!
//! Headerless, semicolon-separated, CRLF line endings, quoted text
//! fields. Column order is fixed:
//! id;invoice number;channel;sender id;recipient id;status;
//! submitted at;delivered at;amount;currency;retry count;errors

use chrono::{DateTime, Utc};

use super::record::TransmissionRecord;
use crate::core::format_amount;

pub(super) fn export(records: &[&TransmissionRecord]) -> String {
    let mut out = String::new();
    for r in records {
        csv_field_str(&mut out, &r.id);
        out.push(';');
        csv_field_str(&mut out, &r.invoice_number);
        out.push(';');
        csv_field_str(&mut out, &r.channel);
        out.push(';');
        csv_field_str(&mut out, &r.sender_id);
        out.push(';');
        csv_field_str(&mut out, &r.recipient_id);
        out.push(';');
        csv_field_str(&mut out, r.status.as_str());
        out.push(';');
        csv_field_timestamp(&mut out, r.submitted_at);
        out.push(';');
        csv_field_timestamp(&mut out, r.delivered_at);
        out.push(';');
        if let Some(amount) = r.amount {
            out.push_str(&format_amount(amount));
        }
        out.push(';');
        csv_field_str(&mut out, &r.currency);
        out.push(';');
        out.push_str(&r.retry_count.to_string());
        out.push(';');
        let errors = r
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join(" | ");
        csv_field_str(&mut out, &errors);
        out.push_str("\r\n");
    }
    out
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_timestamp(out: &mut String, value: Option<DateTime<Utc>>) {
    if let Some(ts) = value {
        out.push_str(&ts.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    }
}
