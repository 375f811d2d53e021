//! Monthly average closing-price report.
//!
//! Purely informational: bars from a trailing window are grouped by
//! calendar month and the arithmetic mean of the closes is reported per
//! month. An empty window produces an empty report.

use chrono::{Datelike, Duration, Months, NaiveDate};
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LookupResult;
use crate::provider::{MarketData, PriceBar};
use crate::utils;

/// Default trailing window, in months.
pub const DEFAULT_WINDOW_MONTHS: u32 = 5;

/// Mean closing price for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAverage {
    pub year: i32,
    pub month: u32,
    pub average_close: Decimal,
}

impl MonthlyAverage {
    /// Human-readable month label, e.g. "janeiro/2025".
    pub fn label(&self) -> String {
        utils::month_label(self.year, self.month)
    }
}

/// Group bars by calendar month and average the closes, ascending.
pub fn monthly_averages(bars: &[PriceBar]) -> Vec<MonthlyAverage> {
    let mut sorted: Vec<&PriceBar> = bars.iter().collect();
    sorted.sort_by_key(|bar| bar.date);

    let grouped = sorted
        .into_iter()
        .chunk_by(|bar| (bar.date.year(), bar.date.month()));

    let mut averages = Vec::new();
    for ((year, month), group) in &grouped {
        let closes: Vec<Decimal> = group.map(|bar| bar.close).collect();
        let sum: Decimal = closes.iter().copied().sum();
        averages.push(MonthlyAverage {
            year,
            month,
            average_close: (sum / Decimal::from(closes.len() as u64)).round_dp(2),
        });
    }
    averages
}

/// Fetch the trailing window ending today and average per month.
pub async fn fetch_monthly_averages<P: MarketData + ?Sized>(
    provider: &P,
    symbol: &str,
    months: u32,
    today: NaiveDate,
) -> LookupResult<Vec<MonthlyAverage>> {
    let start = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today);
    let bars = provider
        .historical_bars(symbol, start, today + Duration::days(1))
        .await?;
    Ok(monthly_averages(&bars))
}
