//! Exact, order-preserving text keys for decimal columns.
//!
//! A key is a sign marker (`n` or `p`), the integer part zero-padded to 29
//! digits, a dot, and the fraction zero-padded to 28 digits. Those widths
//! cover every [`Decimal`]. Negative keys store the nines' complement of their
//! digits, so for any two decimals the byte order of their keys is their
//! numeric order and equal values always share one key.

use std::str::FromStr;

use rust_decimal::Decimal;

const INTEGER_DIGITS: usize = 29;
const FRACTION_DIGITS: usize = 28;

fn complement(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from(b'9' - d as u8),
            None => c,
        })
        .collect()
}

/// Encodes a decimal as its comparison key.
pub fn encode(value: &Decimal) -> String {
    let magnitude = value.abs().normalize().to_string();
    let (integer, fraction) = magnitude.split_once('.').unwrap_or((magnitude.as_str(), ""));
    let digits = format!(
        "{:0>iw$}.{:0<fw$}",
        integer,
        fraction,
        iw = INTEGER_DIGITS,
        fw = FRACTION_DIGITS
    );

    if value.is_sign_negative() && !value.is_zero() {
        format!("n{}", complement(&digits))
    } else {
        format!("p{}", digits)
    }
}

/// Decodes a key written by [`encode`].
pub fn decode(key: &str) -> Result<Decimal, String> {
    let (negative, digits) = match key.split_at_checked(1) {
        Some(("p", rest)) => (false, rest.to_string()),
        Some(("n", rest)) => (true, complement(rest)),
        _ => return Err(format!("'{}' is not a decimal key", key)),
    };

    let (integer, fraction) = digits
        .split_once('.')
        .ok_or_else(|| format!("'{}' is not a decimal key", key))?;
    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let fraction = fraction.trim_end_matches('0');

    let text = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    };
    let magnitude = Decimal::from_str(&text).map_err(|e| format!("'{}': {}", key, e))?;
    Ok(if negative { -magnitude } else { magnitude })
}
