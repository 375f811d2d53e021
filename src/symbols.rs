//! Ticker resolution and quantity-list parsing.
//!
//! User-typed tickers are normalized to the provider's canonical form
//! before any network call: trimmed, uppercased, and suffixed with the
//! B3 market suffix when it is not already present.

use crate::error::{LookupError, LookupResult};

/// Market suffix the provider expects on B3 tickers.
pub const MARKET_SUFFIX: &str = ".SA";

/// Normalize a single ticker entry. Idempotent.
fn normalize(entry: &str) -> String {
    let upper = entry.trim().to_uppercase();
    if upper.ends_with(MARKET_SUFFIX) {
        upper
    } else {
        format!("{}{}", upper, MARKET_SUFFIX)
    }
}

/// Resolve a comma-separated ticker list to canonical symbols.
///
/// Blank entries are dropped; an input with no usable entry at all is
/// an `InvalidInput` error.
pub fn resolve_symbols(raw: &str) -> LookupResult<Vec<String>> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(normalize)
        .collect();

    if symbols.is_empty() {
        return Err(LookupError::InvalidInput(
            "at least one ticker is required".to_string(),
        ));
    }

    Ok(symbols)
}

/// Resolve a single ticker; extra comma-separated entries are ignored.
pub fn resolve_symbol(raw: &str) -> LookupResult<String> {
    let mut symbols = resolve_symbols(raw)?;
    Ok(symbols.swap_remove(0))
}

/// Parse the held-quantity list as positive integers, one per symbol.
///
/// All-or-nothing: if any token fails to parse as a positive integer,
/// or the token count does not match `expected`, the whole list is
/// rejected and accumulation is skipped for the request.
pub fn parse_quantities(raw: &str, expected: usize) -> Option<Vec<u64>> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();

    let parsed: Vec<u64> = tokens
        .iter()
        .filter_map(|token| token.parse::<u64>().ok())
        .filter(|quantity| *quantity > 0)
        .collect();

    if parsed.len() != tokens.len() || parsed.len() != expected {
        return None;
    }

    Some(parsed)
}
