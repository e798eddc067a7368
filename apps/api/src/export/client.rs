//! Admin API client — the export pipeline's single gateway to the back
//! office. No other export code issues HTTP requests directly.
#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::invoices::aggregator::{MonthlyRate, TemplateData};
use crate::invoices::handlers::{DataEnvelope, MonthlyRatesPayload};
use crate::invoices::timesheet::GenerateInvoiceRequest;
use crate::models::invoice::InvoiceRow;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// `{ message }` body carried by non-2xx admin responses.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Extracts the display message from a non-2xx body, falling back to the
/// raw body when it is not the expected JSON shape.
fn error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorBody>(&body)
        .map(|parsed| parsed.message)
        .unwrap_or(body)
}

/// The three admin endpoints the export pipeline consumes. `ExportSession`
/// talks to this trait so tests can substitute canned backends.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn template_data(&self, invoice_id: i64) -> Result<TemplateData, ApiError>;
    async fn currency_rates(&self) -> Result<Vec<MonthlyRate>, ApiError>;
    async fn generate_invoice(
        &self,
        request: &GenerateInvoiceRequest,
    ) -> Result<InvoiceRow, ApiError>;
}

/// HTTP implementation of [`AdminApi`].
#[derive(Clone)]
pub struct AdminApiClient {
    client: Client,
    base_url: String,
}

impl AdminApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: error_message(body),
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl AdminApi for AdminApiClient {
    async fn template_data(&self, invoice_id: i64) -> Result<TemplateData, ApiError> {
        let envelope: DataEnvelope<TemplateData> = self
            .get_json(&format!("/api/admin/invoices/{invoice_id}/template-data"))
            .await?;
        Ok(envelope.data)
    }

    async fn currency_rates(&self) -> Result<Vec<MonthlyRate>, ApiError> {
        let envelope: DataEnvelope<MonthlyRatesPayload> =
            self.get_json("/api/admin/currency-rates").await?;
        Ok(envelope.data.monthly_rates)
    }

    async fn generate_invoice(
        &self,
        request: &GenerateInvoiceRequest,
    ) -> Result<InvoiceRow, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/admin/generate-invoice", self.base_url))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
