//! The yield-lookup core.
//!
//! One request runs `Validating -> per-asset (dividend -> price -> yield ->
//! accumulate) -> Done`. A failed fetch reports an outcome for that asset and
//! the batch continues; nothing aborts the loop. The session accumulator is an
//! explicit state object owned by the caller, never ambient global state.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{LookupError, LookupResult};
use crate::provider::{DividendEvent, MarketData, PriceBar};
use crate::symbols;

/// One asset to look up within a request.
#[derive(Debug, Clone)]
pub struct AssetQuery {
    pub symbol: String,
    pub quantity: Option<u64>,
}

/// A submitted request, as it arrives from the presentation layer.
#[derive(Debug, Clone)]
pub struct YieldRequest {
    pub raw_symbols: String,
    pub payment_date: NaiveDate,
    pub raw_quantities: Option<String>,
    pub accumulate: bool,
}

/// Computed yield for one asset. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct YieldResult {
    pub symbol: String,
    pub yield_percent: Decimal,
    pub dividend_per_share: Decimal,
    pub price_used: Decimal,
    pub price_date_used: NaiveDate,
}

/// Session-scoped running total of dividends received
/// (dividend per share times held quantity). Resets with the session.
#[derive(Debug, Default)]
pub struct Session {
    pub running_total: Decimal,
}

/// Per-asset outcome; failures never abort the batch.
#[derive(Debug)]
pub enum AssetOutcome {
    Success(YieldResult),
    /// A dividend event was found but pays nothing on the date.
    ZeroDividend { symbol: String, ex_date: NaiveDate },
    Failed { symbol: String, error: LookupError },
}

/// Result of one processed request.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<AssetOutcome>,
    /// Set when a quantity list was supplied but rejected as a whole.
    pub quantities_rejected: bool,
    /// Dividend total this request added to the session.
    pub accumulated: Decimal,
}

/// Closing price for the target date, with a one-day look-back.
///
/// Queries `[date, date+1)` first; an empty answer (weekend, holiday)
/// retries `[date-1, date)`. NotFound only when both days are empty.
pub async fn fetch_price_near<P: MarketData + ?Sized>(
    provider: &P,
    symbol: &str,
    date: NaiveDate,
) -> LookupResult<PriceBar> {
    let bars = provider
        .historical_bars(symbol, date, date + Duration::days(1))
        .await?;
    if let Some(bar) = bars.into_iter().next() {
        return Ok(bar);
    }

    debug!("No bar for {} on {}, trying the previous day", symbol, date);
    let bars = provider
        .historical_bars(symbol, date - Duration::days(1), date)
        .await?;
    bars.into_iter().next().ok_or_else(|| {
        LookupError::NotFound(format!(
            "no closing price for {} on {} or the previous day",
            symbol, date
        ))
    })
}

/// Most recent dividend event with ex-date on or before the target date.
pub async fn latest_dividend_on_or_before<P: MarketData + ?Sized>(
    provider: &P,
    symbol: &str,
    date: NaiveDate,
) -> LookupResult<DividendEvent> {
    let events = provider.dividend_series(symbol).await?;
    events
        .into_iter()
        .filter(|event| event.ex_date <= date)
        .max_by_key(|event| event.ex_date)
        .ok_or_else(|| {
            LookupError::NotFound(format!(
                "no dividend event for {} on or before {}",
                symbol, date
            ))
        })
}

/// Yield percentage per share: dividend times 100 over price, 2 decimal
/// places. The price must be positive; callers skip the call otherwise.
pub fn compute_yield(dividend_per_share: Decimal, price_used: Decimal) -> LookupResult<Decimal> {
    if price_used <= Decimal::ZERO {
        return Err(LookupError::InvalidInput(format!(
            "price must be positive, got {}",
            price_used
        )));
    }
    Ok((dividend_per_share * Decimal::ONE_HUNDRED / price_used).round_dp(2))
}

/// Validate the request and expand it into per-asset queries.
///
/// Runs before any network call: empty ticker lists and future payment
/// dates are rejected here. The boolean is set when a supplied quantity
/// list was rejected whole.
fn build_queries(
    request: &YieldRequest,
    today: NaiveDate,
) -> LookupResult<(Vec<AssetQuery>, bool)> {
    if request.payment_date > today {
        return Err(LookupError::InvalidInput(format!(
            "payment date {} is in the future",
            request.payment_date
        )));
    }

    let resolved = symbols::resolve_symbols(&request.raw_symbols)?;

    let (quantities, quantities_rejected) = match request.raw_quantities.as_deref() {
        Some(raw) => match symbols::parse_quantities(raw, resolved.len()) {
            Some(parsed) => (Some(parsed), false),
            None => (None, true),
        },
        None => (None, false),
    };

    let queries = resolved
        .into_iter()
        .enumerate()
        .map(|(i, symbol)| AssetQuery {
            symbol,
            quantity: quantities.as_ref().map(|list| list[i]),
        })
        .collect();

    Ok((queries, quantities_rejected))
}

async fn lookup_asset<P: MarketData + ?Sized>(
    provider: &P,
    query: &AssetQuery,
    date: NaiveDate,
) -> AssetOutcome {
    let symbol = &query.symbol;
    info!("Looking up {} for {}", symbol, date);

    let dividend = match latest_dividend_on_or_before(provider, symbol, date).await {
        Ok(event) => event,
        Err(error) => {
            return AssetOutcome::Failed {
                symbol: symbol.clone(),
                error,
            }
        }
    };

    if dividend.amount_per_share.is_zero() {
        return AssetOutcome::ZeroDividend {
            symbol: symbol.clone(),
            ex_date: dividend.ex_date,
        };
    }

    let bar = match fetch_price_near(provider, symbol, date).await {
        Ok(bar) => bar,
        Err(error) => {
            return AssetOutcome::Failed {
                symbol: symbol.clone(),
                error,
            }
        }
    };

    match compute_yield(dividend.amount_per_share, bar.close) {
        Ok(yield_percent) => AssetOutcome::Success(YieldResult {
            symbol: symbol.clone(),
            yield_percent,
            dividend_per_share: dividend.amount_per_share,
            price_used: bar.close,
            price_date_used: bar.date,
        }),
        Err(error) => AssetOutcome::Failed {
            symbol: symbol.clone(),
            error,
        },
    }
}

/// Process one submitted request against the provider.
///
/// Assets run sequentially; each failure is recorded and the loop moves
/// on. Accumulation requires the accumulate flag, a validated quantity
/// list, and a non-zero dividend for the asset.
pub async fn process_request<P: MarketData + ?Sized>(
    provider: &P,
    request: &YieldRequest,
    session: &mut Session,
    today: NaiveDate,
) -> LookupResult<BatchReport> {
    let (queries, quantities_rejected) = build_queries(request, today)?;
    if quantities_rejected {
        warn!("Quantity list rejected, accumulation skipped for this request");
    }

    let mut outcomes = Vec::with_capacity(queries.len());
    let mut accumulated = Decimal::ZERO;

    for query in &queries {
        let outcome = lookup_asset(provider, query, request.payment_date).await;

        if request.accumulate {
            if let (AssetOutcome::Success(result), Some(quantity)) = (&outcome, query.quantity) {
                let received = result.dividend_per_share * Decimal::from(quantity);
                session.running_total += received;
                accumulated += received;
            }
        }

        outcomes.push(outcome);
    }

    Ok(BatchReport {
        outcomes,
        quantities_rejected,
        accumulated,
    })
}
