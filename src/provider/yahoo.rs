use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use super::{DividendEvent, MarketData, PriceBar};
use crate::error::{LookupError, LookupResult};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    dividends: Option<HashMap<String, DividendEntry>>,
}

#[derive(Debug, Deserialize)]
struct DividendEntry {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

/// Market-data client backed by the Yahoo Finance v8 chart API.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Build a provider, honoring the `RENDIMENTO_PROVIDER_URL` override.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("RENDIMENTO_PROVIDER_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; RendimentoBot/1.0)")
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
        with_dividends: bool,
    ) -> LookupResult<ChartResult> {
        let mut url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );
        if with_dividends {
            url.push_str("&events=div");
        }

        debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            LookupError::Provider(format!("request to market-data provider failed: {}", e))
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(format!(
                "symbol {} is unknown to the provider",
                symbol
            )));
        }
        if !response.status().is_success() {
            return Err(LookupError::Provider(format!(
                "provider returned status {}",
                response.status()
            )));
        }

        let data: ChartResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Provider(format!("malformed provider response: {}", e)))?;

        if let Some(error) = data.chart.error {
            if error.code.eq_ignore_ascii_case("not found") {
                return Err(LookupError::NotFound(format!(
                    "{}: {}",
                    symbol, error.description
                )));
            }
            return Err(LookupError::Provider(format!(
                "{}: {}",
                error.code, error.description
            )));
        }

        data.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| LookupError::NotFound(format!("no chart data for {}", symbol)))
    }
}

fn start_of_day_timestamp(date: NaiveDate) -> LookupResult<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| LookupError::InvalidInput(format!("invalid date {}", date)))
}

#[async_trait]
impl MarketData for YahooProvider {
    async fn historical_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LookupResult<Vec<PriceBar>> {
        info!("Fetching bars for {} in [{}, {})", symbol, start, end);

        let period1 = start_of_day_timestamp(start)?;
        let period2 = start_of_day_timestamp(end)?;
        let result = self.fetch_chart(symbol, period1, period2, false).await?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .and_then(|indicators| indicators.quote.into_iter().next())
            .and_then(|quote| quote.close)
            .unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let Some(date) = chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
            else {
                continue;
            };
            // The API clamps the requested range; enforce [start, end) ourselves
            if date < start || date >= end {
                continue;
            }
            let Some(close) = closes
                .get(i)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64_retain)
            else {
                continue;
            };
            bars.push(PriceBar { date, close });
        }

        debug!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }

    async fn dividend_series(&self, symbol: &str) -> LookupResult<Vec<DividendEvent>> {
        info!("Fetching dividend series for {}", symbol);

        let period2 = chrono::Utc::now().timestamp();
        let result = self.fetch_chart(symbol, 0, period2, true).await?;

        let mut events: Vec<DividendEvent> = result
            .events
            .and_then(|events| events.dividends)
            .map(|dividends| {
                dividends
                    .into_values()
                    .filter_map(|entry| {
                        let ex_date =
                            chrono::DateTime::from_timestamp(entry.date, 0)?.date_naive();
                        let amount_per_share = Decimal::from_f64_retain(entry.amount)?;
                        Some(DividendEvent {
                            ex_date,
                            amount_per_share,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        events.sort_by_key(|event| event.ex_date);

        debug!("Fetched {} dividend events for {}", events.len(), symbol);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn should_skip_online_tests() -> bool {
        std::env::var("RENDIMENTO_SKIP_ONLINE_TESTS")
            .map(|v| v != "0")
            .unwrap_or(false)
    }

    #[test]
    fn test_parse_chart_response_with_dividends() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1718323200],
                    "indicators": {"quote": [{"close": [10.45]}]},
                    "events": {"dividends": {"1717977600": {"amount": 0.1, "date": 1717977600}}}
                }],
                "error": null
            }
        }"#;

        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let result = parsed.chart.result.unwrap().into_iter().next().unwrap();

        assert_eq!(result.timestamp.unwrap(), vec![1718323200]);
        let dividends = result.events.unwrap().dividends.unwrap();
        assert_eq!(dividends.len(), 1);
        assert!(parsed.chart.error.is_none());
    }

    #[test]
    fn test_parse_chart_error_payload() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let error = parsed.chart.error.unwrap();
        assert_eq!(error.code, "Not Found");
        assert!(error.description.contains("No data found"));
    }

    #[tokio::test]
    async fn test_fetch_historical_bars_online() {
        if should_skip_online_tests() {
            return;
        }

        let provider = YahooProvider::from_env().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let result = provider.historical_bars("MXRF11.SA", start, end).await;
        let bars = match result {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Skipping Yahoo bars test: {}", e);
                return;
            }
        };

        for bar in &bars {
            assert!(bar.date >= start && bar.date < end);
            assert!(bar.close > Decimal::ZERO);
        }
    }

    #[tokio::test]
    async fn test_fetch_dividend_series_online() {
        if should_skip_online_tests() {
            return;
        }

        let provider = YahooProvider::from_env().unwrap();
        let result = provider.dividend_series("MXRF11.SA").await;
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                eprintln!("Skipping Yahoo dividends test: {}", e);
                return;
            }
        };

        // Series must come back ascending by ex-date
        for pair in events.windows(2) {
            assert!(pair[0].ex_date <= pair[1].ex_date);
        }
    }
}
