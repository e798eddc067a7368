//! Timesheet references — the tagged link between an invoice and its source.
#![allow(dead_code)]
//!
//! Weekly and bi-weekly timesheets live in separate tables with identical
//! shapes. An invoice is always generated from exactly one of them, so the
//! pair of nullable ids is collapsed into a tagged reference at the API
//! boundary and only expanded back into columns at the SQL layer.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Timesheets must reach this status before they can be billed.
pub const STATUS_APPROVED: &str = "approved";

/// Reference to the timesheet an invoice is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimesheetRef {
    Weekly(i64),
    BiWeekly(i64),
}

impl TimesheetRef {
    pub fn id(&self) -> i64 {
        match self {
            TimesheetRef::Weekly(id) | TimesheetRef::BiWeekly(id) => *id,
        }
    }

    /// Human-readable kind, used in log lines and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            TimesheetRef::Weekly(_) => "weekly",
            TimesheetRef::BiWeekly(_) => "bi-weekly",
        }
    }

    /// Recovers the reference from a stored column pair. Weekly wins if both
    /// columns are somehow populated.
    pub fn from_columns(
        timesheet_id: Option<i64>,
        bi_weekly_timesheet_id: Option<i64>,
    ) -> Option<TimesheetRef> {
        match (timesheet_id, bi_weekly_timesheet_id) {
            (Some(id), _) => Some(TimesheetRef::Weekly(id)),
            (None, Some(id)) => Some(TimesheetRef::BiWeekly(id)),
            (None, None) => None,
        }
    }

    /// Splits the reference back into the column pair stored on `invoices`.
    pub fn into_columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            TimesheetRef::Weekly(id) => (Some(id), None),
            TimesheetRef::BiWeekly(id) => (None, Some(id)),
        }
    }
}

/// Body of the generate endpoint. The admin UI sends exactly one of the two
/// ids; both-set and neither-set payloads are rejected before any query runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timesheet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bi_weekly_timesheet_id: Option<i64>,
}

impl GenerateInvoiceRequest {
    pub fn weekly(id: i64) -> Self {
        GenerateInvoiceRequest {
            timesheet_id: Some(id),
            bi_weekly_timesheet_id: None,
        }
    }

    pub fn bi_weekly(id: i64) -> Self {
        GenerateInvoiceRequest {
            timesheet_id: None,
            bi_weekly_timesheet_id: Some(id),
        }
    }

    /// Collapses the optional pair into a tagged reference.
    pub fn timesheet_ref(&self) -> Result<TimesheetRef, AppError> {
        match (self.timesheet_id, self.bi_weekly_timesheet_id) {
            (Some(id), None) => Ok(TimesheetRef::Weekly(id)),
            (None, Some(id)) => Ok(TimesheetRef::BiWeekly(id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "timesheetId and biWeeklyTimesheetId are mutually exclusive".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "either timesheetId or biWeeklyTimesheetId is required".to_string(),
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
