#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `invoices` table. Financial fields are denormalized at
/// generation time so the document renders identically even if the billing
/// profile changes later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRow {
    pub id: i64,
    pub invoice_number: i64,
    /// Weekly source timesheet; mutually exclusive with `bi_weekly_timesheet_id`.
    pub timesheet_id: Option<i64>,
    pub bi_weekly_timesheet_id: Option<i64>,
    pub candidate_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_hours: Decimal,
    pub hourly_rate: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub gst_rate: Decimal,
    pub gst_amount: Decimal,
    pub total_with_gst: Decimal,
    /// USD to INR rate captured at generation time.
    pub conversion_rate: Decimal,
    pub six_month_avg_rate: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
