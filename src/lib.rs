//! Rendimento - dividend yield calculator for Brazilian B3 funds
//!
//! This library looks up a fund's closing price and most recent dividend
//! around a payment date and reports the yield percentage per share,
//! optionally accumulating dividend totals across several assets within
//! one session.

pub mod error;
pub mod lookup;
pub mod provider;
pub mod report;
pub mod symbols;
pub mod utils;
