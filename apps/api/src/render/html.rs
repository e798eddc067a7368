//! HTML serialization of the invoice document.
#![allow(dead_code)]
//!
//! String-builder rendering, no template engine. Two surfaces: the preview
//! fragment embedded in the export dialog, and a standalone print page
//! whose stylesheet hides `.no-print` content.

use crate::render::document::{PartyBlock, RenderOutcome};
use crate::render::money;

/// Shown in place of the document when the payload is incomplete.
pub const EMPTY_STATE_TEXT: &str = "Invoice data not available";

/// Stylesheet inlined into the print page. The rate panel carries
/// `no-print` so it never reaches paper.
pub const PRINT_STYLESHEET: &str = "\
body { font-family: Helvetica, Arial, sans-serif; color: #1a1a1a; margin: 0; }
.invoice-sheet { width: 210mm; padding: 12mm; box-sizing: border-box; }
.parties { display: flex; justify-content: space-between; margin-top: 8mm; }
table.line-items { width: 100%; border-collapse: collapse; margin-top: 8mm; }
table.line-items th, table.line-items td { border: 1px solid #444; padding: 6px 8px; font-size: 12px; }
table.line-items th { background: #f0f0f0; text-align: left; }
.totals { margin-top: 6mm; text-align: right; }
.converted-banner { margin-top: 4mm; padding: 8px; background: #fff7e0; font-weight: bold; }
.rates-panel { margin-top: 6mm; font-size: 11px; color: #555; }
.footer-note { margin-top: 10mm; font-size: 11px; }
@media print { .no-print { display: none; } }
";

/// Renders the document fragment shown inside the export dialog.
pub fn document_html(outcome: &RenderOutcome) -> String {
    let doc = match outcome.document() {
        Some(doc) => doc,
        None => return format!("<div class=\"invoice-empty\">{EMPTY_STATE_TEXT}</div>\n"),
    };

    let mut html = String::with_capacity(4096);
    html.push_str("<div class=\"invoice-sheet\">\n");

    // Header
    html.push_str("<div class=\"invoice-header\">\n");
    html.push_str(&format!(
        "<h1>Invoice #{}</h1>\n",
        doc.header.invoice_number
    ));
    html.push_str(&format!(
        "<p>Issued: {} &middot; Due: {}</p>\n",
        doc.header.issue_date, doc.header.due_date
    ));
    html.push_str(&format!(
        "<p>Period: {} to {}</p>\n",
        doc.header.period_start, doc.header.period_end
    ));
    html.push_str("</div>\n");

    // Parties
    html.push_str("<div class=\"parties\">\n");
    push_party(&mut html, "From", &doc.company);
    push_party(&mut html, "Bill To", &doc.bill_to);
    html.push_str("</div>\n");

    // Line items
    html.push_str("<table class=\"line-items\">\n<thead>\n<tr>");
    for column in &doc.line_table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &doc.line_table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    // Totals
    html.push_str("<div class=\"totals\">\n");
    html.push_str(&format!("<p>Subtotal: {}</p>\n", doc.totals.subtotal));
    html.push_str(&format!(
        "<p>{}: {}</p>\n",
        escape(&doc.totals.gst_label),
        doc.totals.gst_amount
    ));
    html.push_str(&format!(
        "<p><strong>Total: {}</strong></p>\n",
        doc.totals.total
    ));
    html.push_str("</div>\n");

    // INR banner
    html.push_str(&format!(
        "<div class=\"converted-banner\">Total due: {} <span class=\"rate-note\">({})</span></div>\n",
        escape(&doc.converted_total.display),
        escape(&doc.converted_total.rate_note)
    ));

    // Rate history, screen only
    html.push_str("<div class=\"rates-panel no-print\">\n<h3>USD/INR reference rates</h3>\n<ul>\n");
    for row in &doc.rates_panel.rows {
        html.push_str(&format!(
            "<li>{}: {}</li>\n",
            escape(&row.label),
            money::rate(row.rate)
        ));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str(&format!(
        "<p class=\"footer-note\">{}</p>\n",
        escape(&doc.footer_note)
    ));
    html.push_str("</div>\n");
    html
}

/// Renders the standalone page handed to the print target.
pub fn print_page(outcome: &RenderOutcome) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Invoice</title>\n<style>\n{PRINT_STYLESHEET}</style>\n</head>\n<body>\n{}\
         </body>\n</html>\n",
        document_html(outcome)
    )
}

fn push_party(html: &mut String, heading: &str, party: &PartyBlock) {
    html.push_str(&format!(
        "<div class=\"party\">\n<h2>{heading}</h2>\n<p><strong>{}</strong></p>\n",
        escape(&party.name)
    ));
    for line in &party.lines {
        html.push_str(&format!("<p>{}</p>\n", escape(line)));
    }
    html.push_str("</div>\n");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
