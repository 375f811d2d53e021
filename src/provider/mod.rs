// Market-data provider - Yahoo Finance API client

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LookupResult;

/// Daily closing price bar. Immutable once fetched.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// A cash dividend event; the ex-date is the dividend's effective date.
#[derive(Debug, Clone, Serialize)]
pub struct DividendEvent {
    pub ex_date: NaiveDate,
    pub amount_per_share: Decimal,
}

/// Narrow interface to the external market-data source.
///
/// Implementations must surface failures as `LookupError` kinds; raw
/// transport or parse errors never cross this boundary.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Closing price bars for `[start, end)`, ascending by date.
    async fn historical_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LookupResult<Vec<PriceBar>>;

    /// Full dividend event series for the symbol, ascending by ex-date.
    async fn dividend_series(&self, symbol: &str) -> LookupResult<Vec<DividendEvent>>;
}
