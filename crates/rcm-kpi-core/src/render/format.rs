use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Percent};

/// Cell text for a period with no records.
pub const NOT_APPLICABLE: &str = "N/A";

/// `$#,##0.00`. Negative amounts keep the sign after the dollar sign
/// (`$-1,234.50`), as the legacy report printed them.
pub fn format_currency(amount: Money) -> String {
    let rounded = round2(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// `0.00%` on a 0–100 scale.
pub fn format_percent(pct: Percent) -> String {
    let rounded = round2(pct);
    if rounded.is_zero() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", rounded)
}

/// A configured rate such as denial-vs-resolution, printed without padding
/// decimals: `85%`, `72.5%`.
pub fn format_rate(pct: Percent) -> String {
    format!("{}%", pct.normalize())
}

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(5)), "$5.00");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(100000)), "$100,000.00");
        assert_eq!(format_currency(dec!(-1234.5)), "$-1,234.50");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0)), "0.00%");
        assert_eq!(format_percent(dec!(112.5)), "112.50%");
        assert_eq!(format_percent(dec!(33.333333)), "33.33%");
        assert_eq!(format_percent(dec!(100)), "100.00%");
        assert_eq!(format_percent(dec!(-4.2)), "-4.20%");
    }

    #[test]
    fn test_format_rate_drops_trailing_zeros() {
        assert_eq!(format_rate(dec!(85)), "85%");
        assert_eq!(format_rate(dec!(85.00)), "85%");
        assert_eq!(format_rate(dec!(72.5)), "72.5%");
        assert_eq!(format_rate(dec!(0)), "0%");
    }
}
