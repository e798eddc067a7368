//! Invoice aggregation — joins everything the document needs into one
//! payload, and performs the generate mutation.
#![allow(dead_code)]

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::invoices::timesheet::{TimesheetRef, STATUS_APPROVED};
use crate::models::invoice::InvoiceRow;
use crate::models::party::{BillingProfileRow, CandidateRow, ClientRow, CompanyRow};
use crate::models::rates::CurrencyRateRow;
use crate::models::timesheet::TimesheetDetailRow;

/// Invoice numbers start above this floor; the first invoice is 1001.
pub const INVOICE_NUMBER_FLOOR: i64 = 1000;
/// Net-30 payment terms.
const NET_PAYMENT_DAYS: i64 = 30;
/// Months averaged into the reference conversion rate.
const SIX_MONTH_WINDOW: i64 = 6;
/// Months served to the rate-history panel.
const MONTHLY_SERIES_LIMIT: i64 = 12;

// ────────────────────────────────────────────────────────────────────────────
// Payload types
// ────────────────────────────────────────────────────────────────────────────

/// Everything the renderer needs for one invoice, joined in a single
/// payload. Relations the database no longer holds come back as `None`; the
/// renderer decides whether the document can be shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    pub invoice: InvoiceRow,
    pub company_data: Option<CompanyRow>,
    pub client_data: Option<ClientRow>,
    pub timesheet_details: Option<TimesheetDetailRow>,
    pub billing_data: Option<BillingProfileRow>,
}

impl TemplateData {
    /// True when every relation required for rendering is present.
    pub fn is_complete(&self) -> bool {
        self.company_data.is_some()
            && self.client_data.is_some()
            && self.timesheet_details.is_some()
            && self.billing_data.is_some()
    }
}

/// One month of the USD to INR series, label pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRate {
    pub month: String,
    pub average: Decimal,
}

/// Derived financial fields for one invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub total_amount: Decimal,
    pub gst_amount: Decimal,
    pub total_with_gst: Decimal,
}

/// Hours times rate, GST on top. All arithmetic stays in `Decimal`; nothing
/// here rounds. Display rounding happens at render time.
pub fn compute_totals(
    total_hours: Decimal,
    hourly_rate: Decimal,
    gst_rate: Decimal,
) -> InvoiceTotals {
    let total_amount = total_hours * hourly_rate;
    let gst_amount = total_amount * gst_rate / Decimal::ONE_HUNDRED;
    let total_with_gst = total_amount + gst_amount;
    InvoiceTotals {
        total_amount,
        gst_amount,
        total_with_gst,
    }
}

/// Mean of a rate sample window. Empty input yields `None` so callers can
/// fall back to the live rate.
pub fn average(samples: &[Decimal]) -> Option<Decimal> {
    if samples.is_empty() {
        return None;
    }
    let sum: Decimal = samples.iter().copied().sum();
    Some(sum / Decimal::from(samples.len() as u64))
}

// ────────────────────────────────────────────────────────────────────────────
// Reads
// ────────────────────────────────────────────────────────────────────────────

/// Assembles the full template payload for one invoice.
///
/// Missing relations are not an error: a deleted timesheet or billing
/// profile surfaces as `None` and the invoice header still loads.
pub async fn fetch_template_data(
    pool: &PgPool,
    invoice_id: i64,
) -> Result<TemplateData, AppError> {
    let invoice: InvoiceRow = sqlx::query_as("SELECT * FROM invoices WHERE id = $1")
        .bind(invoice_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice {invoice_id} not found")))?;

    // Letterhead details: one row per deployment.
    let company: Option<CompanyRow> =
        sqlx::query_as("SELECT * FROM company_profiles ORDER BY id LIMIT 1")
            .fetch_optional(pool)
            .await?;

    let source = TimesheetRef::from_columns(invoice.timesheet_id, invoice.bi_weekly_timesheet_id);
    let timesheet = match source {
        Some(source) => fetch_timesheet(pool, source).await?,
        None => None,
    };

    let (client, billing) = match &timesheet {
        Some(ts) => {
            let candidate: Option<CandidateRow> =
                sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
                    .bind(ts.candidate_id)
                    .fetch_optional(pool)
                    .await?;
            let client: Option<ClientRow> = match &candidate {
                Some(candidate) => sqlx::query_as("SELECT * FROM clients WHERE id = $1")
                    .bind(candidate.client_id)
                    .fetch_optional(pool)
                    .await?,
                None => None,
            };
            let billing: Option<BillingProfileRow> = match &candidate {
                Some(candidate) => {
                    sqlx::query_as("SELECT * FROM billing_profiles WHERE candidate_id = $1")
                        .bind(candidate.id)
                        .fetch_optional(pool)
                        .await?
                }
                None => None,
            };
            (client, billing)
        }
        None => (None, None),
    };

    Ok(TemplateData {
        invoice,
        company_data: company,
        client_data: client,
        timesheet_details: timesheet,
        billing_data: billing,
    })
}

/// Returns the monthly rate series, oldest first, labels like `Jan`.
pub async fn monthly_rates(pool: &PgPool) -> Result<Vec<MonthlyRate>, AppError> {
    let rows: Vec<CurrencyRateRow> =
        sqlx::query_as("SELECT * FROM currency_rates ORDER BY month DESC LIMIT $1")
            .bind(MONTHLY_SERIES_LIMIT)
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .rev()
        .map(|row| MonthlyRate {
            month: row.month.format("%b").to_string(),
            average: row.average,
        })
        .collect())
}

/// Mean of the six most recent monthly averages, or `None` when the series
/// is empty.
pub async fn six_month_average(pool: &PgPool) -> Result<Option<Decimal>, AppError> {
    let samples: Vec<Decimal> =
        sqlx::query_scalar("SELECT average FROM currency_rates ORDER BY month DESC LIMIT $1")
            .bind(SIX_MONTH_WINDOW)
            .fetch_all(pool)
            .await?;
    Ok(average(&samples))
}

async fn fetch_timesheet(
    pool: &PgPool,
    source: TimesheetRef,
) -> Result<Option<TimesheetDetailRow>, AppError> {
    let sql = match source {
        TimesheetRef::Weekly(_) => "SELECT * FROM timesheets WHERE id = $1",
        TimesheetRef::BiWeekly(_) => "SELECT * FROM biweekly_timesheets WHERE id = $1",
    };
    Ok(sqlx::query_as::<_, TimesheetDetailRow>(sql)
        .bind(source.id())
        .fetch_optional(pool)
        .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Generate mutation
// ────────────────────────────────────────────────────────────────────────────

/// Generates an invoice from an approved, unbilled timesheet.
///
/// Financial fields are computed once here and denormalized onto the row;
/// the source timesheet is stamped with the new invoice id in the same
/// transaction so a timesheet can never be billed twice.
pub async fn generate_invoice(
    pool: &PgPool,
    source: TimesheetRef,
) -> Result<InvoiceRow, AppError> {
    // 1. Load and validate the source timesheet.
    let ts = fetch_timesheet(pool, source).await?.ok_or_else(|| {
        AppError::NotFound(format!("{} timesheet {} not found", source.kind(), source.id()))
    })?;
    validate_source(&ts, source)?;

    // 2. Resolve the candidate and their billing terms.
    let candidate: CandidateRow = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(ts.candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", ts.candidate_id)))?;

    let billing: BillingProfileRow =
        sqlx::query_as("SELECT * FROM billing_profiles WHERE candidate_id = $1")
            .bind(candidate.id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No billing profile for candidate {}", candidate.id))
            })?;

    // 3. Compute financials and capture the conversion snapshot.
    let totals = compute_totals(ts.total_hours, billing.hourly_rate, billing.gst_rate);
    let six_month_avg = six_month_average(pool)
        .await?
        .unwrap_or(billing.conversion_rate);

    let issue_date = Utc::now().date_naive();
    let due_date = issue_date + Duration::days(NET_PAYMENT_DAYS);

    // 4. Insert the invoice and stamp the timesheet atomically.
    let mut tx = pool.begin().await?;

    let next_number: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(invoice_number), $1) + 1 FROM invoices")
            .bind(INVOICE_NUMBER_FLOOR)
            .fetch_one(&mut *tx)
            .await?;

    let (weekly_id, bi_weekly_id) = source.into_columns();

    let invoice: InvoiceRow = sqlx::query_as(
        r#"
        INSERT INTO invoices
            (invoice_number, timesheet_id, bi_weekly_timesheet_id, candidate_name,
             period_start, period_end, total_hours, hourly_rate, total_amount,
             currency, gst_rate, gst_amount, total_with_gst, conversion_rate,
             six_month_avg_rate, issue_date, due_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING *
        "#,
    )
    .bind(next_number)
    .bind(weekly_id)
    .bind(bi_weekly_id)
    .bind(&candidate.name)
    .bind(ts.period_start)
    .bind(ts.period_end)
    .bind(ts.total_hours)
    .bind(billing.hourly_rate)
    .bind(totals.total_amount)
    .bind(&billing.currency)
    .bind(billing.gst_rate)
    .bind(totals.gst_amount)
    .bind(totals.total_with_gst)
    .bind(billing.conversion_rate)
    .bind(six_month_avg)
    .bind(issue_date)
    .bind(due_date)
    .fetch_one(&mut *tx)
    .await?;

    let stamped = sqlx::query(stamp_sql(source))
        .bind(invoice.id)
        .bind(source.id())
        .execute(&mut *tx)
        .await?;
    if stamped.rows_affected() == 0 {
        // A concurrent generation billed the timesheet after the pre-check;
        // discard our insert.
        tx.rollback().await?;
        return Err(AppError::InvalidState(format!(
            "{} timesheet {} is already billed",
            source.kind(),
            source.id()
        )));
    }

    tx.commit().await?;

    info!(
        "Generated invoice {} (number {}) from {} timesheet {}",
        invoice.id,
        invoice.invoice_number,
        source.kind(),
        source.id()
    );

    Ok(invoice)
}

/// Preconditions on the source timesheet: it must be approved and not yet
/// billed. The conditional stamp re-checks the billed state inside the
/// transaction.
fn validate_source(ts: &TimesheetDetailRow, source: TimesheetRef) -> Result<(), AppError> {
    if ts.status != STATUS_APPROVED {
        return Err(AppError::InvalidState(format!(
            "{} timesheet {} is not approved (status: {})",
            source.kind(),
            source.id(),
            ts.status
        )));
    }
    if let Some(existing) = ts.invoice_id {
        return Err(AppError::InvalidState(format!(
            "{} timesheet {} is already billed by invoice {existing}",
            source.kind(),
            source.id()
        )));
    }
    Ok(())
}

/// Stamp statement for the source table. The `invoice_id IS NULL` predicate
/// makes the stamp match zero rows when another generation has already
/// billed the timesheet.
fn stamp_sql(source: TimesheetRef) -> &'static str {
    match source {
        TimesheetRef::Weekly(_) => {
            "UPDATE timesheets SET invoice_id = $1 WHERE id = $2 AND invoice_id IS NULL"
        }
        TimesheetRef::BiWeekly(_) => {
            "UPDATE biweekly_timesheets SET invoice_id = $1 WHERE id = $2 AND invoice_id IS NULL"
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
