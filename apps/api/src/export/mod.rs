//! Invoice export pipeline — the client half of invoice generation.
#![allow(dead_code)]
//!
//! One `ExportSession` models one open export dialog. It loads the
//! aggregated payload through a read-through cache, assembles the
//! document, and then either rasterizes + paginates it into a downloadable
//! PDF or hands the print page to a print target. At most one mutating
//! action runs per session at a time, and a running PDF export can be
//! cancelled from the dialog.

pub mod cache;
pub mod client;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::cache::{ApiCache, BIWEEKLY_TIMESHEETS_KEY, INVOICES_KEY, TIMESHEETS_KEY};
use crate::export::client::{AdminApi, ApiError};
use crate::invoices::aggregator::MonthlyRate;
use crate::invoices::timesheet::GenerateInvoiceRequest;
use crate::models::invoice::InvoiceRow;
use crate::pdf::paginator::{paginate, PageGeometry};
use crate::pdf::raster::{RasterError, Rasterizer};
use crate::pdf::writer::{write_pdf, PdfError};
use crate::render::document::{build_document, RenderOutcome};
use crate::render::html;

/// Raster scale used for the PDF path.
pub const EXPORT_SCALE: u32 = 2;

/// Tab the UI switches to after a successful generation.
const INVOICES_TAB: &str = "invoices";

const CURRENCY_RATES_KEY: &str = "currency-rates";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("admin API call failed: {0}")]
    Api(#[from] ApiError),

    #[error("invoice data is incomplete; nothing to export")]
    DataUnavailable,

    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("another request is already running for this dialog")]
    Busy,

    #[error("export was cancelled")]
    Cancelled,

    #[error("export task failed: {0}")]
    Task(String),

    #[error("print target could not be opened: {0}")]
    PrintTargetUnavailable(String),
}

/// The finished download: file name, page count, and the PDF itself.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub page_count: u32,
    pub bytes: Bytes,
}

/// Called after a successful generation with the tab the UI should switch
/// to.
pub type TabSwitchHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Destination for the print path. The shipped UI opens a browser window;
/// tests substitute an in-memory sink.
pub trait PrintTarget: Send + Sync {
    /// Opens the target and hands it the print-ready page. `Err` means the
    /// target could not be opened at all (e.g. the window was blocked).
    fn open(&self, html: &str) -> Result<(), String>;
}

/// Derives the artifact file name, `Invoice-<number>-<candidate>.pdf`.
/// Whitespace runs in the candidate name become hyphens; each absent part
/// falls back to the literal `invoice`.
pub fn artifact_file_name(invoice_number: Option<i64>, candidate_name: Option<&str>) -> String {
    let number = invoice_number
        .map(|number| number.to_string())
        .unwrap_or_else(|| "invoice".to_string());
    let name = candidate_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("-"))
        .unwrap_or_else(|| "invoice".to_string());
    format!("Invoice-{number}-{name}.pdf")
}

/// The loaded preview a session holds between actions.
#[derive(Debug, Clone)]
struct PreparedDocument {
    invoice_number: i64,
    candidate_name: String,
    outcome: RenderOutcome,
    html: String,
}

/// Handle to a running PDF export. Dropping the handle cancels the task,
/// so closing the dialog mid-export frees the pipeline.
pub struct ExportHandle {
    task_id: Uuid,
    cancel: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<Result<ExportArtifact, ExportError>>>,
}

impl ExportHandle {
    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// Requests cancellation. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Waits for the task and returns the artifact or the failure.
    pub async fn finish(mut self) -> Result<ExportArtifact, ExportError> {
        let join = match self.join.take() {
            Some(join) => join,
            None => return Err(ExportError::Task("export already finished".to_string())),
        };
        match join.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ExportError::Cancelled),
            Err(e) => Err(ExportError::Task(e.to_string())),
        }
    }
}

impl Drop for ExportHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Releases the session's busy flag when the owning request settles.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ExportSession {
    api: Arc<dyn AdminApi>,
    cache: Arc<ApiCache>,
    rasterizer: Arc<dyn Rasterizer>,
    geometry: PageGeometry,
    tab_hook: Option<TabSwitchHook>,
    in_flight: Arc<AtomicBool>,
    preview: RwLock<Option<PreparedDocument>>,
}

impl ExportSession {
    pub fn new(
        api: Arc<dyn AdminApi>,
        cache: Arc<ApiCache>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        ExportSession {
            api,
            cache,
            rasterizer,
            geometry: PageGeometry::DEFAULT,
            tab_hook: None,
            in_flight: Arc::new(AtomicBool::new(false)),
            preview: RwLock::new(None),
        }
    }

    pub fn with_tab_hook(mut self, hook: TabSwitchHook) -> Self {
        self.tab_hook = Some(hook);
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Marks the session busy for the lifetime of the returned guard.
    fn begin_request(&self) -> Result<InFlightGuard, ExportError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ExportError::Busy);
        }
        Ok(InFlightGuard(Arc::clone(&self.in_flight)))
    }

    /// Loads the aggregated payload (through the cache), assembles the
    /// document, and stores it as the session's current preview.
    ///
    /// A failing rate series is not fatal: the renderer synthesizes the
    /// panel from the captured averages instead.
    pub async fn load_preview(&self, invoice_id: i64) -> Result<RenderOutcome, ExportError> {
        let data_key = format!("invoices/{invoice_id}/template-data");
        let data = self
            .cache
            .get_or_fetch(&data_key, || self.api.template_data(invoice_id))
            .await?;

        let monthly: Vec<MonthlyRate> = match self
            .cache
            .get_or_fetch(CURRENCY_RATES_KEY, || self.api.currency_rates())
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!("Currency rate series unavailable, synthesizing panel: {e}");
                Vec::new()
            }
        };

        let outcome = build_document(&data, &monthly);
        let prepared = PreparedDocument {
            invoice_number: data.invoice.invoice_number,
            candidate_name: data.invoice.candidate_name.clone(),
            html: html::document_html(&outcome),
            outcome: outcome.clone(),
        };
        *self.preview.write().await = Some(prepared);
        Ok(outcome)
    }

    /// Discards the current preview (dialog closed).
    pub async fn clear_preview(&self) {
        *self.preview.write().await = None;
    }

    /// Starts the rasterize-paginate-write pipeline on the current preview.
    ///
    /// Returns `Ok(None)` when nothing has been rendered yet, keeping the
    /// download button a harmless no-op before the dialog has loaded.
    pub async fn download_pdf(&self) -> Result<Option<ExportHandle>, ExportError> {
        let prepared = match self.preview.read().await.clone() {
            Some(prepared) => prepared,
            None => return Ok(None),
        };
        if prepared.outcome.is_unavailable() {
            return Err(ExportError::DataUnavailable);
        }

        let guard = self.begin_request()?;
        let rasterizer = Arc::clone(&self.rasterizer);
        let geometry = self.geometry;
        let task_id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            // Holds the busy flag until the task settles, cancelled or not.
            let _guard = guard;
            let pipeline = async {
                let image = rasterizer.rasterize(&prepared.html, EXPORT_SCALE).await?;
                let plan = paginate(&image, geometry);
                let file_name = artifact_file_name(
                    Some(prepared.invoice_number),
                    Some(&prepared.candidate_name),
                );
                let title = format!("Invoice {}", prepared.invoice_number);
                let bytes = write_pdf(&image, &plan, &title)?;
                info!(
                    "Export {task_id}: {file_name} ({} pages, {} bytes)",
                    plan.page_count(),
                    bytes.len()
                );
                Ok::<ExportArtifact, ExportError>(ExportArtifact {
                    file_name,
                    page_count: plan.page_count(),
                    bytes: Bytes::from(bytes),
                })
            };
            tokio::select! {
                _ = cancel_rx => {
                    info!("Export {task_id} cancelled");
                    Err(ExportError::Cancelled)
                }
                result = pipeline => result,
            }
        });

        Ok(Some(ExportHandle {
            task_id,
            cancel: Some(cancel_tx),
            join: Some(join),
        }))
    }

    /// Generates an invoice, invalidates the list caches, and fires the
    /// tab-switch hook.
    pub async fn generate(
        &self,
        request: &GenerateInvoiceRequest,
    ) -> Result<InvoiceRow, ExportError> {
        let _guard = self.begin_request()?;
        let invoice = self.api.generate_invoice(request).await?;
        self.cache
            .invalidate_many(&[INVOICES_KEY, TIMESHEETS_KEY, BIWEEKLY_TIMESHEETS_KEY])
            .await;
        if let Some(hook) = &self.tab_hook {
            hook(INVOICES_TAB);
        }
        info!(
            "Generated invoice {} (number {}); list caches invalidated",
            invoice.id, invoice.invoice_number
        );
        Ok(invoice)
    }

    /// Hands the current preview to a print target as a standalone page.
    /// Returns `Ok(false)` when nothing has been rendered yet.
    pub async fn print_document(&self, target: &dyn PrintTarget) -> Result<bool, ExportError> {
        let prepared = match self.preview.read().await.clone() {
            Some(prepared) => prepared,
            None => return Ok(false),
        };
        let page = html::print_page(&prepared.outcome);
        target
            .open(&page)
            .map_err(ExportError::PrintTargetUnavailable)?;
        Ok(true)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
