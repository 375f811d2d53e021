mod cli;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use cli::formatters;
use cli::{Cli, Commands};
use rendimento::lookup::{self, Session, YieldRequest};
use rendimento::provider::yahoo::YahooProvider;
use rendimento::provider::MarketData;
use rendimento::report;
use rendimento::symbols;
use rendimento::utils::format_currency;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let provider = YahooProvider::from_env()?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Yield {
            symbols,
            date,
            quantities,
            accumulate,
        } => {
            let payment_date = parse_date(&date)?;
            let request = YieldRequest {
                raw_symbols: symbols,
                payment_date,
                raw_quantities: quantities,
                accumulate,
            };
            let mut session = Session::default();
            handle_yield(&provider, &request, &mut session, today, cli.json).await
        }

        Commands::Monthly { symbol, months } => {
            handle_monthly(&provider, &symbol, months, today, cli.json).await
        }

        Commands::Interactive => run_interactive(&provider, today).await,
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw.trim()))
}

/// Handle the yield command
async fn handle_yield(
    provider: &dyn MarketData,
    request: &YieldRequest,
    session: &mut Session,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    info!(
        "Processing yield request for '{}' on {}",
        request.raw_symbols, request.payment_date
    );

    match lookup::process_request(provider, request, session, today).await {
        Ok(batch) => {
            if json {
                println!("{}", formatters::format_batch_json(&batch, session));
            } else {
                print!(
                    "{}",
                    formatters::format_batch(&batch, request.accumulate, session)
                );
            }
        }
        // Request-level validation failures are user messages, never fatal
        Err(error) => formatters::print_request_error(&error),
    }

    Ok(())
}

/// Handle the monthly report command
async fn handle_monthly(
    provider: &dyn MarketData,
    raw_symbol: &str,
    months: u32,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let symbol = match symbols::resolve_symbol(raw_symbol) {
        Ok(symbol) => symbol,
        Err(error) => {
            formatters::print_request_error(&error);
            return Ok(());
        }
    };

    match report::fetch_monthly_averages(provider, &symbol, months, today).await {
        Ok(rows) => {
            if json {
                println!("{}", formatters::format_monthly_json(&symbol, &rows));
            } else {
                print!("{}", formatters::format_monthly_table(&symbol, &rows));
            }
        }
        Err(error) => formatters::print_request_error(&error),
    }

    Ok(())
}

fn prompt(editor: &mut DefaultEditor, text: &str) -> Result<Option<String>> {
    match editor.readline(text) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Form-style interactive mode. One `Session` lives for the whole loop,
/// so accumulated dividends survive across submissions until exit.
async fn run_interactive(provider: &dyn MarketData, today: NaiveDate) -> Result<()> {
    println!(
        "{}",
        "Dividend yield calculator (empty ticker or Ctrl-D exits)".bold()
    );

    let mut editor = DefaultEditor::new()?;
    let mut session = Session::default();

    loop {
        let Some(raw_symbols) = prompt(&mut editor, "tickers> ")? else {
            break;
        };
        if raw_symbols.trim().is_empty() {
            break;
        }
        editor.add_history_entry(&raw_symbols)?;

        let Some(raw_date) = prompt(&mut editor, "payment date (YYYY-MM-DD)> ")? else {
            break;
        };
        let payment_date = match parse_date(&raw_date) {
            Ok(date) => date,
            Err(error) => {
                println!("{} {}", "⚠".yellow().bold(), error);
                continue;
            }
        };

        let Some(raw_quantities) = prompt(&mut editor, "held quantities (optional)> ")? else {
            break;
        };
        let raw_quantities = {
            let trimmed = raw_quantities.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let request = YieldRequest {
            accumulate: raw_quantities.is_some(),
            raw_symbols,
            payment_date,
            raw_quantities,
        };

        match lookup::process_request(provider, &request, &mut session, today).await {
            Ok(batch) => print!(
                "{}",
                formatters::format_batch(&batch, request.accumulate, &session)
            ),
            Err(error) => formatters::print_request_error(&error),
        }
    }

    if !session.running_total.is_zero() {
        println!(
            "\nSession total: {}",
            format_currency(session.running_total).bold()
        );
    }

    Ok(())
}
