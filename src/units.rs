//! Coin amount formatting

/// Number of fractional digits in one TON
pub const TON_DECIMALS: usize = 9;

/// Render an integer amount with exactly `decimals` fractional digits.
///
/// `from_nanos(5, 9)` is `"0.000000005"`.
pub fn from_nanos(value: u128, decimals: usize) -> String {
    let digits = value.to_string();
    if decimals == 0 {
        return format!("{}.0", digits);
    }
    if digits.len() > decimals {
        let (main, frac) = digits.split_at(digits.len() - decimals);
        format!("{}.{}", main, frac)
    } else {
        format!("0.{:0>width$}", digits, width = decimals)
    }
}

/// [`from_nanos`] with the native coin precision
pub fn format_coins(value: u128) -> String {
    from_nanos(value, TON_DECIMALS)
}
