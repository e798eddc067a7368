//! HTTP handlers for the admin invoice endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::invoices::aggregator::{self, MonthlyRate, TemplateData};
use crate::invoices::timesheet::GenerateInvoiceRequest;
use crate::models::invoice::InvoiceRow;
use crate::state::AppState;

/// Envelope the admin UI expects around read responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRatesPayload {
    pub monthly_rates: Vec<MonthlyRate>,
}

/// GET /api/admin/invoices/:id/template-data
///
/// Full render payload for one invoice. Missing relations come back as
/// nulls rather than failing the request.
pub async fn get_template_data(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<DataEnvelope<TemplateData>>, AppError> {
    let data = aggregator::fetch_template_data(&state.db, invoice_id).await?;
    Ok(Json(DataEnvelope { data }))
}

/// POST /api/admin/generate-invoice
pub async fn generate_invoice(
    State(state): State<AppState>,
    Json(request): Json<GenerateInvoiceRequest>,
) -> Result<Json<InvoiceRow>, AppError> {
    let source = request.timesheet_ref()?;
    let invoice = aggregator::generate_invoice(&state.db, source).await?;
    Ok(Json(invoice))
}

/// GET /api/admin/currency-rates
pub async fn get_currency_rates(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<MonthlyRatesPayload>>, AppError> {
    let monthly_rates = aggregator::monthly_rates(&state.db).await?;
    Ok(Json(DataEnvelope {
        data: MonthlyRatesPayload { monthly_rates },
    }))
}
