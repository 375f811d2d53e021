//! Terminal and JSON rendering for lookup results.
//!
//! Keeps presentation out of the lookup core: success lines, warning
//! lines for validation failures, error lines for provider failures,
//! and the monthly-average table all live here.

use colored::Colorize;
use rendimento::error::LookupError;
use rendimento::lookup::{AssetOutcome, BatchReport, Session};
use rendimento::report::MonthlyAverage;
use rendimento::utils::format_currency;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Render one batch as human-readable terminal lines.
pub fn format_batch(report: &BatchReport, accumulate: bool, session: &Session) -> String {
    let mut output = String::new();

    if report.quantities_rejected {
        output.push_str(&format!(
            "{} Quantity list is invalid (positive integers, one per ticker); accumulation skipped\n",
            "⚠".yellow().bold()
        ));
    }

    for outcome in &report.outcomes {
        match outcome {
            AssetOutcome::Success(result) => {
                output.push_str(&format!(
                    "{} {}: yield per share {}% (dividend {} over close {} on {})\n",
                    "✓".green().bold(),
                    result.symbol.bold(),
                    result.yield_percent,
                    format_currency(result.dividend_per_share),
                    format_currency(result.price_used),
                    result.price_date_used.format("%d/%m/%Y"),
                ));
            }
            AssetOutcome::ZeroDividend { symbol, ex_date } => {
                output.push_str(&format!(
                    "{} {}: dividend on {} pays R$ 0,00, nothing to compute\n",
                    "⚠".yellow().bold(),
                    symbol.bold(),
                    ex_date.format("%d/%m/%Y"),
                ));
            }
            AssetOutcome::Failed { symbol, error } => {
                output.push_str(&format!(
                    "{} {}: {}\n",
                    "❌".red(),
                    symbol.bold(),
                    error
                ));
            }
        }
    }

    if accumulate && !report.quantities_rejected {
        output.push_str(&format!(
            "\nAccumulated dividends this session: {}\n",
            format_currency(session.running_total).bold()
        ));
    }

    output
}

/// Render one batch as JSON.
pub fn format_batch_json(report: &BatchReport, session: &Session) -> String {
    #[derive(Serialize)]
    struct JsonAsset {
        symbol: String,
        status: String,
        yield_percent: Option<String>,
        dividend_per_share: Option<String>,
        price_used: Option<String>,
        price_date_used: Option<String>,
        message: Option<String>,
    }

    #[derive(Serialize)]
    struct JsonBatch {
        assets: Vec<JsonAsset>,
        quantities_rejected: bool,
        accumulated: String,
        running_total: String,
    }

    let assets = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            AssetOutcome::Success(result) => JsonAsset {
                symbol: result.symbol.clone(),
                status: "success".to_string(),
                yield_percent: Some(result.yield_percent.to_string()),
                dividend_per_share: Some(result.dividend_per_share.to_string()),
                price_used: Some(result.price_used.to_string()),
                price_date_used: Some(result.price_date_used.to_string()),
                message: None,
            },
            AssetOutcome::ZeroDividend { symbol, ex_date } => JsonAsset {
                symbol: symbol.clone(),
                status: "zero_dividend".to_string(),
                yield_percent: None,
                dividend_per_share: None,
                price_used: None,
                price_date_used: None,
                message: Some(format!("dividend on {} pays nothing", ex_date)),
            },
            AssetOutcome::Failed { symbol, error } => JsonAsset {
                symbol: symbol.clone(),
                status: match error {
                    LookupError::InvalidInput(_) => "invalid_input".to_string(),
                    LookupError::NotFound(_) => "not_found".to_string(),
                    LookupError::Provider(_) => "provider_error".to_string(),
                },
                yield_percent: None,
                dividend_per_share: None,
                price_used: None,
                price_date_used: None,
                message: Some(error.to_string()),
            },
        })
        .collect();

    let batch = JsonBatch {
        assets,
        quantities_rejected: report.quantities_rejected,
        accumulated: report.accumulated.to_string(),
        running_total: session.running_total.to_string(),
    };

    serde_json::to_string_pretty(&batch)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Render the monthly-average report as a table.
pub fn format_monthly_table(symbol: &str, rows: &[MonthlyAverage]) -> String {
    if rows.is_empty() {
        return format!(
            "{} No price data for {} in the requested window\n",
            "⚠".yellow().bold(),
            symbol.bold()
        );
    }

    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Month")]
        month: String,
        #[tabled(rename = "Average Close")]
        average: String,
    }

    let table_rows: Vec<MonthRow> = rows
        .iter()
        .map(|row| MonthRow {
            month: row.label(),
            average: format_currency(row.average_close),
        })
        .collect();

    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    format!(
        "\n{} Monthly average close for {}\n\n{}\n",
        "📊".cyan().bold(),
        symbol.bold(),
        table
    )
}

/// Render the monthly-average report as JSON.
pub fn format_monthly_json(symbol: &str, rows: &[MonthlyAverage]) -> String {
    #[derive(Serialize)]
    struct JsonMonth {
        month: String,
        average_close: String,
    }

    #[derive(Serialize)]
    struct JsonReport {
        symbol: String,
        months: Vec<JsonMonth>,
    }

    let report = JsonReport {
        symbol: symbol.to_string(),
        months: rows
            .iter()
            .map(|row| JsonMonth {
                month: row.label(),
                average_close: row.average_close.to_string(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Print a request-level error (validation or provider) by kind.
pub fn print_request_error(error: &LookupError) {
    match error {
        LookupError::InvalidInput(_) => {
            println!("{} {}", "⚠".yellow().bold(), error);
        }
        LookupError::NotFound(_) | LookupError::Provider(_) => {
            println!("{} {}", "❌".red(), error);
        }
    }
}
