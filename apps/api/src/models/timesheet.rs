#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Shared row shape of `timesheets` and `biweekly_timesheets`; the two
/// tables carry identical columns and differ only in period length.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetDetailRow {
    pub id: i64,
    pub candidate_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Per-day hour breakdown as submitted, kept as JSON.
    pub day_hours: Value,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub total_hours: Decimal,
    pub status: String,
    /// Set once the timesheet has been billed; blocks re-generation.
    pub invoice_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
