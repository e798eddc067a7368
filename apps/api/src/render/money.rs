//! Money and number display helpers for the invoice document.
#![allow(dead_code)]

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a USD amount as `$4,000.00`.
pub fn usd(amount: Decimal) -> String {
    format!("${}", grouped_fixed(amount, 2))
}

/// Formats the converted figure for the total-due banner, e.g. `INR 331,200.00`.
pub fn inr(amount: Decimal) -> String {
    format!("INR {}", grouped_fixed(amount, 2))
}

/// Formats a conversion rate with four decimals, e.g. `83.1200`.
pub fn rate(value: Decimal) -> String {
    fixed(value, 4)
}

/// Formats an hour count without trailing zeros, e.g. `80` or `42.5`.
pub fn hours(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Fixed-point rendering with exactly `decimals` fraction digits.
/// Midpoints round away from zero, matching how amounts appear on the
/// printed document.
fn fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let mut text = rounded.to_string();
    if decimals > 0 {
        let point = match text.find('.') {
            Some(i) => i,
            None => {
                text.push('.');
                text.len() - 1
            }
        };
        let missing = (decimals as usize).saturating_sub(text.len() - point - 1);
        for _ in 0..missing {
            text.push('0');
        }
    }
    text
}

/// `fixed`, with the integer part grouped in thousands.
fn grouped_fixed(value: Decimal, decimals: u32) -> String {
    let text = fixed(value, decimals);
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
