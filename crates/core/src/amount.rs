use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use thiserror::Error;

/// Largest amount the slip formatter can group correctly, in cents.
/// 格式化器可正確分組的最大金額（以分為單位）。
pub const MAX_FORMATTABLE_CENTS: u64 = 99_999_999;

/// Errors raised while parsing user-entered amounts.
/// 解析使用者輸入金額時可能發生的錯誤。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount '{0}'")]
    Invalid(String),
    #[error("amount must not be negative")]
    Negative,
    #[error("amount exceeds 999,999.99")]
    OutOfRange,
}

/// Raised when a value falls outside the single-grouping range of [`format_amount`].
/// 數值超出 [`format_amount`] 單層分組範圍時回報的錯誤。
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("amount {value} is outside the printable range 0.00..=999,999.99")]
pub struct FormatRangeError {
    pub value: f64,
}

/// Currency amount stored as whole cents.
/// 以「分」為單位儲存的金額。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses text typed into an amount cell.
    /// 解析金額欄位輸入的文字。
    ///
    /// Accepts an optional leading `$`, thousands separators and up to two
    /// fraction digits (`"100"`, `"250.5"`, `"$1,234.56"`).
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let invalid = || AmountError::Invalid(input.trim().to_string());
        let cleaned: String = trimmed.chars().filter(|ch| *ch != ',').collect();
        let (whole, fraction) = match cleaned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (cleaned.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|ch| ch.is_ascii_digit())
            || !fraction.chars().all(|ch| ch.is_ascii_digit())
            || fraction.len() > 2
        {
            return Err(invalid());
        }

        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| AmountError::OutOfRange)?
        };
        let fraction_value: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole_value
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or(AmountError::OutOfRange)?;
        if cents > MAX_FORMATTABLE_CENTS {
            return Err(AmountError::OutOfRange);
        }
        Ok(Self(cents))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents(self.0))
    }
}

/// Formats a currency value with a single thousands group and two decimals.
/// 以單層千分位與兩位小數格式化金額。
///
/// Values outside `0.00..=999,999.99` are clamped into range and logged; the
/// formatter never inserts a second separator (`1,000,000.00` is not produced).
pub fn format_amount(value: f64) -> String {
    match format_amount_checked(value) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "clamping amount for display");
            let clamped = if value.is_nan() || value < 0.0 {
                0
            } else {
                MAX_FORMATTABLE_CENTS
            };
            format_cents(clamped)
        }
    }
}

/// Range-checked variant of [`format_amount`].
/// [`format_amount`] 的範圍檢查版本。
pub fn format_amount_checked(value: f64) -> Result<String, FormatRangeError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FormatRangeError { value });
    }
    let cents = (value * 100.0).round();
    if cents > MAX_FORMATTABLE_CENTS as f64 {
        return Err(FormatRangeError { value });
    }
    Ok(format_cents(cents as u64))
}

// Works on rounded cents so the remainder can never round up to "1000.00".
fn format_cents(cents: u64) -> String {
    let whole_thousands = cents / 100_000;
    let remainder = cents % 100_000;
    if whole_thousands == 0 {
        format!("{}.{:02}", remainder / 100, remainder % 100)
    } else {
        format!(
            "{whole_thousands},{:03}.{:02}",
            remainder / 100,
            remainder % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_below_one_thousand_without_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(999.99), "999.99");
        assert_eq!(format_amount(0.5), "0.50");
    }

    #[test]
    fn formats_thousands_with_zero_padded_remainder() {
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(51003.0), "51,003.00");
        assert_eq!(format_amount(10425.5), "10,425.50");
        assert_eq!(format_amount(999_999.99), "999,999.99");
    }

    #[test]
    fn remainder_rounding_carries_into_thousands() {
        assert_eq!(format_amount(1999.999), "2,000.00");
        assert_eq!(format_amount(999.999), "1,000.00");
    }

    #[test]
    fn out_of_range_values_are_reported_and_clamped() {
        assert!(format_amount_checked(-1.0).is_err());
        assert!(format_amount_checked(f64::NAN).is_err());
        assert!(format_amount_checked(1_000_000.0).is_err());
        assert_eq!(format_amount(-3.0), "0.00");
        assert_eq!(format_amount(f64::INFINITY), "999,999.99");
        assert_eq!(format_amount(2_500_000.0), "999,999.99");
    }

    #[test]
    fn parses_common_inputs() {
        assert_eq!(Amount::parse("100").unwrap().cents(), 10_000);
        assert_eq!(Amount::parse("250.5").unwrap().cents(), 25_050);
        assert_eq!(Amount::parse(" $1,234.56 ").unwrap().cents(), 123_456);
        assert_eq!(Amount::parse(".75").unwrap().cents(), 75);
        assert_eq!(Amount::parse("12.").unwrap().cents(), 1_200);
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert_eq!(Amount::parse(""), Err(AmountError::Empty));
        assert_eq!(Amount::parse("-5"), Err(AmountError::Negative));
        assert_eq!(Amount::parse("1000000"), Err(AmountError::OutOfRange));
        assert!(matches!(Amount::parse("12.345"), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse("."), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn display_and_sum_use_cents() {
        let amounts = [
            Amount::parse("100.00").unwrap(),
            Amount::parse("250.50").unwrap(),
            Amount::parse("75").unwrap(),
            Amount::parse("10000").unwrap(),
        ];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.cents(), 1_042_550);
        assert_eq!(total.to_string(), "10,425.50");
    }
}
