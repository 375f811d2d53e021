use clap::{Parser, Subcommand};

pub mod formatters;

#[derive(Parser)]
#[command(name = "rendimento")]
#[command(version, about = "Dividend yield calculator for B3 funds and stocks")]
#[command(
    long_about = "Look up a fund's closing price and most recent dividend around a payment date and report the yield percentage per share, optionally accumulating dividend totals across several assets."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate dividend yield per share for one or more tickers
    Yield {
        /// Comma-separated tickers (e.g., MXRF11 or MXRF11,HGLG11)
        symbols: String,

        /// Dividend payment date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Comma-separated held quantities, one per ticker (e.g., 10,5)
        #[arg(short, long)]
        quantities: Option<String>,

        /// Add dividend totals (per share x quantity) to the running total
        #[arg(short, long)]
        accumulate: bool,
    },

    /// Show the average closing price per month for a trailing window
    Monthly {
        /// Ticker symbol (e.g., MXRF11)
        symbol: String,

        /// Window size in months
        #[arg(short, long, default_value_t = rendimento::report::DEFAULT_WINDOW_MONTHS)]
        months: u32,
    },

    /// Form-style interactive mode; the running total persists across submissions
    Interactive,
}
