//! Invoice document model — pure assembly from the aggregated payload.
#![allow(dead_code)]
//!
//! The renderer is deliberately dumb: amounts arrive pre-computed on the
//! invoice row and are formatted here, never recomputed. The one
//! calculation performed at render time is the INR banner figure,
//! `total_with_gst` times the captured conversion rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::invoices::aggregator::{MonthlyRate, TemplateData};
use crate::models::party::{ClientRow, CompanyRow};
use crate::render::money;
use crate::render::rates_panel::{build_rates_panel, RatesPanel};

const STANDARD_COLUMNS: [&str; 4] = ["Description", "Hours", "Rate", "Amount"];
const OVERTIME_COLUMNS: [&str; 6] = [
    "Description",
    "Regular Hours",
    "Overtime Hours",
    "Total Hours",
    "Rate",
    "Amount",
];

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DocumentHeader {
    pub invoice_number: i64,
    pub candidate_name: String,
    pub issue_date: String,
    pub due_date: String,
    pub period_start: String,
    pub period_end: String,
}

/// A name-and-address block (the agency letterhead or the billed client).
#[derive(Debug, Clone, Serialize)]
pub struct PartyBlock {
    pub name: String,
    pub lines: Vec<String>,
}

/// The line-item table. Standard periods use 4 columns; when the period
/// carries overtime the hours are broken out into 6.
#[derive(Debug, Clone, Serialize)]
pub struct LineTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsBlock {
    pub subtotal: String,
    pub gst_label: String,
    pub gst_amount: String,
    pub total: String,
}

/// The INR banner under the totals. `amount` is computed at render time
/// from the captured conversion rate.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedTotal {
    pub amount: Decimal,
    pub display: String,
    pub rate_note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    pub header: DocumentHeader,
    pub company: PartyBlock,
    pub bill_to: PartyBlock,
    pub line_table: LineTable,
    pub totals: TotalsBlock,
    pub converted_total: ConvertedTotal,
    pub rates_panel: RatesPanel,
    pub footer_note: String,
}

/// Outcome of document assembly.
#[derive(Debug, Clone, Serialize)]
pub enum RenderOutcome {
    /// Every required relation was present; the document is printable.
    Document(InvoiceDocument),
    /// Some relation was missing; the UI shows the empty state instead.
    Unavailable,
}

impl RenderOutcome {
    pub fn document(&self) -> Option<&InvoiceDocument> {
        match self {
            RenderOutcome::Document(doc) => Some(doc),
            RenderOutcome::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, RenderOutcome::Unavailable)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

/// Assembles the printable document, or the empty state when any relation
/// is missing from the payload.
pub fn build_document(data: &TemplateData, monthly: &[MonthlyRate]) -> RenderOutcome {
    let (company, client, ts, _billing) = match (
        &data.company_data,
        &data.client_data,
        &data.timesheet_details,
        &data.billing_data,
    ) {
        (Some(company), Some(client), Some(ts), Some(billing)) => (company, client, ts, billing),
        _ => return RenderOutcome::Unavailable,
    };

    let invoice = &data.invoice;

    let description = format!(
        "Contract staffing: {} ({} to {})",
        invoice.candidate_name,
        format_date(invoice.period_start),
        format_date(invoice.period_end)
    );

    let line_table = if ts.overtime_hours > Decimal::ZERO {
        LineTable {
            columns: OVERTIME_COLUMNS.to_vec(),
            rows: vec![vec![
                description,
                money::hours(ts.regular_hours),
                money::hours(ts.overtime_hours),
                // The supplied total, never re-derived from the breakdown.
                money::hours(invoice.total_hours),
                money::usd(invoice.hourly_rate),
                money::usd(invoice.total_amount),
            ]],
        }
    } else {
        LineTable {
            columns: STANDARD_COLUMNS.to_vec(),
            rows: vec![vec![
                description,
                money::hours(invoice.total_hours),
                money::usd(invoice.hourly_rate),
                money::usd(invoice.total_amount),
            ]],
        }
    };

    let totals = TotalsBlock {
        subtotal: money::usd(invoice.total_amount),
        gst_label: format!("GST ({}%)", invoice.gst_rate.normalize()),
        gst_amount: money::usd(invoice.gst_amount),
        total: money::usd(invoice.total_with_gst),
    };

    // The only calculation done at render time.
    let inr_amount = invoice.total_with_gst * invoice.conversion_rate;
    let converted_total = ConvertedTotal {
        amount: inr_amount,
        display: money::inr(inr_amount),
        rate_note: format!(
            "1 USD = {} INR (6-month avg {})",
            money::rate(invoice.conversion_rate),
            money::rate(invoice.six_month_avg_rate)
        ),
    };

    let rates_panel =
        build_rates_panel(monthly, invoice.six_month_avg_rate, invoice.conversion_rate);

    RenderOutcome::Document(InvoiceDocument {
        header: DocumentHeader {
            invoice_number: invoice.invoice_number,
            candidate_name: invoice.candidate_name.clone(),
            issue_date: format_date(invoice.issue_date),
            due_date: format_date(invoice.due_date),
            period_start: format_date(invoice.period_start),
            period_end: format_date(invoice.period_end),
        },
        company: company_block(company),
        bill_to: client_block(client),
        line_table,
        totals,
        converted_total,
        rates_panel,
        footer_note: format!(
            "Payment due by {}. Please reference invoice {} on remittance.",
            format_date(invoice.due_date),
            invoice.invoice_number
        ),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

fn company_block(company: &CompanyRow) -> PartyBlock {
    let mut lines = vec![company.address_line1.clone()];
    if let Some(line2) = &company.address_line2 {
        lines.push(line2.clone());
    }
    lines.push(format!(
        "{}, {} {}",
        company.city, company.state, company.postal_code
    ));
    lines.push(company.country.clone());
    lines.push(company.email.clone());
    lines.push(company.phone.clone());
    if let Some(tax_id) = &company.tax_id {
        lines.push(format!("Tax ID: {tax_id}"));
    }
    PartyBlock {
        name: company.name.clone(),
        lines,
    }
}

fn client_block(client: &ClientRow) -> PartyBlock {
    let mut lines = vec![client.address_line1.clone()];
    if let Some(line2) = &client.address_line2 {
        lines.push(line2.clone());
    }
    lines.push(format!(
        "{}, {} {}",
        client.city, client.state, client.postal_code
    ));
    lines.push(client.country.clone());
    if let Some(email) = &client.contact_email {
        lines.push(email.clone());
    }
    PartyBlock {
        name: client.name.clone(),
        lines,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::models::invoice::InvoiceRow;
    use crate::models::party::{BillingProfileRow, ClientRow, CompanyRow};
    use crate::models::timesheet::TimesheetDetailRow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_invoice() -> InvoiceRow {
        InvoiceRow {
            id: 1,
            invoice_number: 1024,
            timesheet_id: Some(11),
            bi_weekly_timesheet_id: None,
            candidate_name: "Asha Rao".to_string(),
            period_start: date(2025, 7, 7),
            period_end: date(2025, 7, 18),
            total_hours: dec!(80),
            hourly_rate: dec!(50),
            total_amount: dec!(4000),
            currency: "USD".to_string(),
            gst_rate: dec!(18),
            gst_amount: dec!(720),
            total_with_gst: dec!(4720),
            conversion_rate: dec!(83.12),
            six_month_avg_rate: dec!(82.93),
            issue_date: date(2025, 7, 21),
            due_date: date(2025, 8, 20),
            created_at: Utc::now(),
        }
    }

    fn make_timesheet(regular: Decimal, overtime: Decimal) -> TimesheetDetailRow {
        TimesheetDetailRow {
            id: 11,
            candidate_id: 3,
            period_start: date(2025, 7, 7),
            period_end: date(2025, 7, 18),
            day_hours: serde_json::json!({ "2025-07-07": 8 }),
            regular_hours: regular,
            overtime_hours: overtime,
            total_hours: regular + overtime,
            status: "approved".to_string(),
            invoice_id: Some(1),
            created_at: Utc::now(),
        }
    }

    fn make_company() -> CompanyRow {
        CompanyRow {
            id: 1,
            name: "Staffline Solutions".to_string(),
            address_line1: "200 Park Ave".to_string(),
            address_line2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            postal_code: "10166".to_string(),
            country: "USA".to_string(),
            email: "billing@staffline.example".to_string(),
            phone: "+1 212 555 0142".to_string(),
            tax_id: Some("98-7654321".to_string()),
        }
    }

    fn make_client() -> ClientRow {
        ClientRow {
            id: 2,
            name: "Northwind Labs".to_string(),
            address_line1: "500 Mission St".to_string(),
            address_line2: Some("Suite 900".to_string()),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            postal_code: "94105".to_string(),
            country: "USA".to_string(),
            contact_email: Some("ap@northwind.example".to_string()),
        }
    }

    fn make_billing() -> BillingProfileRow {
        BillingProfileRow {
            id: 5,
            candidate_id: 3,
            hourly_rate: dec!(50),
            currency: "USD".to_string(),
            gst_rate: dec!(18),
            conversion_rate: dec!(83.12),
        }
    }

    fn make_template_data() -> TemplateData {
        TemplateData {
            invoice: make_invoice(),
            company_data: Some(make_company()),
            client_data: Some(make_client()),
            timesheet_details: Some(make_timesheet(dec!(80), dec!(0))),
            billing_data: Some(make_billing()),
        }
    }

    fn unwrap_document(outcome: RenderOutcome) -> InvoiceDocument {
        match outcome {
            RenderOutcome::Document(doc) => doc,
            RenderOutcome::Unavailable => panic!("expected a document"),
        }
    }

    // ── table layout ────────────────────────────────────────────────────────

    #[test]
    fn test_standard_period_uses_four_columns() {
        let doc = unwrap_document(build_document(&make_template_data(), &[]));
        assert_eq!(doc.line_table.columns, STANDARD_COLUMNS.to_vec());
        assert_eq!(doc.line_table.rows[0].len(), 4);
    }

    #[test]
    fn test_overtime_period_uses_six_columns() {
        let mut data = make_template_data();
        data.timesheet_details = Some(make_timesheet(dec!(72), dec!(8)));
        let doc = unwrap_document(build_document(&data, &[]));
        assert_eq!(doc.line_table.columns, OVERTIME_COLUMNS.to_vec());
        let cells = &doc.line_table.rows[0];
        assert_eq!(cells[1], "72");
        assert_eq!(cells[2], "8");
    }

    #[test]
    fn test_total_hours_cell_mirrors_supplied_value() {
        // The timesheet breakdown disagrees with the denormalized total; the
        // cell must show the supplied total untouched.
        let mut data = make_template_data();
        data.timesheet_details = Some(make_timesheet(dec!(70), dec!(8)));
        data.invoice.total_hours = dec!(80);
        let doc = unwrap_document(build_document(&data, &[]));
        assert_eq!(doc.line_table.rows[0][3], "80");
    }

    // ── amounts ─────────────────────────────────────────────────────────────

    #[test]
    fn test_preview_scenario_amounts() {
        // 80 hours at $50/hr, 18% GST.
        let doc = unwrap_document(build_document(&make_template_data(), &[]));
        assert_eq!(doc.totals.subtotal, "$4,000.00");
        assert_eq!(doc.totals.gst_label, "GST (18%)");
        assert_eq!(doc.totals.gst_amount, "$720.00");
        assert_eq!(doc.totals.total, "$4,720.00");
        assert_eq!(doc.line_table.columns.len(), 4);
    }

    #[test]
    fn test_banner_is_total_with_gst_times_rate() {
        let doc = unwrap_document(build_document(&make_template_data(), &[]));
        assert_eq!(doc.converted_total.amount, dec!(4720) * dec!(83.12));
        assert_eq!(doc.converted_total.display, "INR 392,326.40");
    }

    // ── empty state and panel ───────────────────────────────────────────────

    #[test]
    fn test_missing_relation_renders_empty_state() {
        let mut data = make_template_data();
        data.billing_data = None;
        assert!(build_document(&data, &[]).is_unavailable());
    }

    #[test]
    fn test_missing_timesheet_renders_empty_state() {
        let mut data = make_template_data();
        data.timesheet_details = None;
        assert!(build_document(&data, &[]).is_unavailable());
    }

    #[test]
    fn test_empty_series_synthesizes_panel_inside_document() {
        let doc = unwrap_document(build_document(&make_template_data(), &[]));
        assert_eq!(doc.rates_panel.rows.len(), 7);
        assert_eq!(doc.rates_panel.rows[6].rate, dec!(83.12));
    }

    #[test]
    fn test_live_series_feeds_panel() {
        let monthly = vec![MonthlyRate {
            month: "Jun".to_string(),
            average: dec!(83.40),
        }];
        let doc = unwrap_document(build_document(&make_template_data(), &monthly));
        assert_eq!(doc.rates_panel.rows.len(), 1);
        assert_eq!(doc.rates_panel.rows[0].label, "Jun");
    }
}
