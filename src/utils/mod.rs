//! Formatting helpers for Brazilian-locale display.
//!
//! Currency values use the Brazilian convention: `.` for thousands,
//! `,` for decimals, prefixed with "R$ ".

use rust_decimal::Decimal;

const MONTH_NAMES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format as Brazilian Real: "R$ 1.234,56".
///
/// # Examples
/// ```
/// use rendimento::utils::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2)), "R$ 1.234,56");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let negative = value < Decimal::ZERO;
    let text = format!("{:.2}", value.abs().round_dp(2));
    let (int_part, dec_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {}{},{}", sign, grouped, dec_part)
}

/// Human-readable month label in Portuguese: "janeiro/2025".
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES_PT
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?");
    format!("{}/{}", name, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(dec!(0.99)), "R$ 0,99");
        assert_eq!(format_currency(dec!(1000000)), "R$ 1.000.000,00");
    }

    #[test]
    fn test_format_currency_small_values() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(0.01)), "R$ 0,01");
        assert_eq!(format_currency(dec!(9.70)), "R$ 9,70");
        assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "R$ -1.234,56");
        assert_eq!(format_currency(dec!(-0.01)), "R$ -0,01");
    }

    #[test]
    fn test_format_currency_rounds_to_two_places() {
        assert_eq!(format_currency(dec!(1.006)), "R$ 1,01");
        assert_eq!(format_currency(dec!(1.004)), "R$ 1,00");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2025, 1), "janeiro/2025");
        assert_eq!(month_label(2024, 12), "dezembro/2024");
    }

    #[test]
    fn test_month_label_out_of_range() {
        assert_eq!(month_label(2025, 13), "?/2025");
        assert_eq!(month_label(2025, 0), "?/2025");
    }
}
