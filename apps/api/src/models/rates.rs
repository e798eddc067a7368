#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One month of the USD to INR reference series. `month` is the first day
/// of the month the average covers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRateRow {
    pub id: i64,
    pub month: NaiveDate,
    pub average: Decimal,
}
