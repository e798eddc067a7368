//! Currency-rate history panel.
#![allow(dead_code)]
//!
//! The panel never renders empty. When the monthly series is unavailable,
//! six synthetic rows are derived from the six-month average by fixed
//! perturbation factors (labeled Jan through Jun) and the live conversion
//! rate becomes the seventh row (Jul). The labels and factor order are
//! part of the document contract.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::invoices::aggregator::MonthlyRate;

/// Multiplicative perturbations applied to the six-month average, one per
/// synthesized month, January through June.
const FALLBACK_FACTORS: [Decimal; 6] = [
    dec!(0.995),
    dec!(1.002),
    dec!(0.998),
    dec!(1.001),
    dec!(0.994),
    dec!(1.005),
];

const FALLBACK_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const FALLBACK_CURRENT_MONTH: &str = "Jul";

/// One row of the panel: month label and USD to INR rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub label: String,
    pub rate: Decimal,
}

/// Where the panel rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    Live,
    Synthesized,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatesPanel {
    pub rows: Vec<RateRow>,
    pub source: RateSource,
}

/// Builds the panel from the served monthly series, falling back to
/// synthesized rows when the series is empty.
pub fn build_rates_panel(
    monthly: &[MonthlyRate],
    six_month_avg: Decimal,
    live_rate: Decimal,
) -> RatesPanel {
    if monthly.is_empty() {
        let mut rows: Vec<RateRow> = FALLBACK_MONTHS
            .iter()
            .zip(FALLBACK_FACTORS.iter())
            .map(|(label, factor)| RateRow {
                label: (*label).to_string(),
                rate: six_month_avg * *factor,
            })
            .collect();
        rows.push(RateRow {
            label: FALLBACK_CURRENT_MONTH.to_string(),
            rate: live_rate,
        });
        return RatesPanel {
            rows,
            source: RateSource::Synthesized,
        };
    }

    RatesPanel {
        rows: monthly
            .iter()
            .map(|month| RateRow {
                label: month.month.clone(),
                rate: month.average,
            })
            .collect(),
        source: RateSource::Live,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
