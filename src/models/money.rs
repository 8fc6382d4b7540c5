//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Currency symbols accepted (and stripped) when parsing amounts
const CURRENCY_SYMBOLS: [char; 4] = ['¥', '￥', '$', '€'];

/// Largest magnitude accepted from input, in cents (one trillion units)
///
/// Keeps month and report totals far from `i64` overflow.
pub const MAX_INPUT_CENTS: i64 = 100_000_000_000_000;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use statement_summary::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from a floating point number of units,
    /// rounded half away from zero to the cent. Returns `None` for NaN,
    /// infinite input, or magnitudes above `MAX_INPUT_CENTS`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() > MAX_INPUT_CENTS as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Arithmetic mean of `count` amounts summing to `self`, rounded half
    /// away from zero to the cent. `None` when `count` is zero.
    pub fn mean_of(self, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let sum = self.0 as i128;
        let n = count as i128;
        let half = if sum < 0 { -n } else { n };
        Some(Self(((sum * 2 + half) / (n * 2)) as i64))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "¥10.50", "1,234.5", "+3", "10".
    /// More than two decimals are rounded half away from zero, the same as
    /// `from_f64`. Magnitudes above `MAX_INPUT_CENTS` are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let s = s.trim();

        // Sign may come before or after the currency symbol ("-¥5", "¥-5")
        let (negative, s) = split_sign(s);
        let s = s.trim_start_matches(CURRENCY_SYMBOLS).trim();
        let (negative, s) = if negative {
            (true, s)
        } else {
            split_sign(s)
        };

        let cleaned: String = s.chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let cents = if cleaned.contains('.') {
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(original.to_string()));
            }

            let units = parse_digits(parts[0], original)?;

            // Pad to 2 digits, or round on the third
            let cents_str = parts[1];
            if !cents_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(original.to_string()));
            }
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => parse_digits(cents_str, original)? * 10,
                _ => {
                    let round_up = cents_str.as_bytes().get(2).is_some_and(|d| *d >= b'5');
                    parse_digits(&cents_str[..2], original)? + i64::from(round_up)
                }
            };

            if parts[0].is_empty() && cents_str.is_empty() {
                return Err(MoneyParseError::InvalidFormat(original.to_string()));
            }

            units
                .checked_mul(100)
                .and_then(|u| u.checked_add(cents))
                .ok_or_else(|| MoneyParseError::InvalidFormat(original.to_string()))?
        } else {
            parse_digits(&cleaned, original)?
                .checked_mul(100)
                .ok_or_else(|| MoneyParseError::InvalidFormat(original.to_string()))?
        };

        if cents > MAX_INPUT_CENTS {
            return Err(MoneyParseError::OutOfRange(original.to_string()));
        }

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol and thousands separators, e.g. "¥1,234.50"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.units().unsigned_abs()),
            self.cents_part()
        )
    }

    /// Plain decimal representation with two places, e.g. "-1234.50"
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.units().unsigned_abs(), self.cents_part())
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped.trim_start())
    } else if let Some(stripped) = s.strip_prefix('+') {
        (false, stripped.trim_start())
    } else {
        (false, s)
    }
}

fn parse_digits(s: &str, original: &str) -> Result<i64, MoneyParseError> {
    if s.is_empty() {
        return Ok(0);
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyParseError::InvalidFormat(original.to_string()));
    }
    s.parse()
        .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Money amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_f64_rounds_to_cent() {
        assert_eq!(Money::from_f64(100.0).unwrap().cents(), 10000);
        assert_eq!(Money::from_f64(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_f64(-12.346).unwrap().cents(), -1235);
        assert!(Money::from_f64(f64::NAN).is_none());
        assert!(Money::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(123456789).format_with_symbol("¥"), "¥1,234,567.89");
        assert_eq!(Money::from_cents(-100000).format_with_symbol("¥"), "-¥1,000.00");
        assert_eq!(Money::from_cents(99).format_with_symbol("$"), "$0.99");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("¥10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("¥-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("1,234.56").unwrap().cents(), 123456);
        assert_eq!(Money::parse(" +3 ").unwrap().cents(), 300);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
    }

    #[test]
    fn test_parse_rounds_extra_decimals() {
        assert_eq!(Money::parse("0.999").unwrap().cents(), 100);
        assert_eq!(Money::parse("0.994").unwrap().cents(), 99);
        assert_eq!(Money::parse("0.335").unwrap().cents(), 34);
        assert_eq!(Money::parse("-12.346").unwrap().cents(), -1235);
        assert_eq!(Money::parse("9.9951").unwrap().cents(), 1000);

        for value in [0.999, 12.346, -12.346, 1234.5678] {
            assert_eq!(
                Money::parse(&value.to_string()).unwrap(),
                Money::from_f64(value).unwrap(),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_input_magnitude_is_bounded() {
        assert_eq!(Money::parse("1000000000000").unwrap().cents(), MAX_INPUT_CENTS);
        assert_eq!(
            Money::parse("90000000000000000"),
            Err(MoneyParseError::OutOfRange("90000000000000000".to_string()))
        );
        assert!(Money::parse("-1000000000000.01").is_err());
        assert!(Money::from_f64(9.0e16).is_none());
        assert!(Money::from_f64(-1.0e12).is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("¥").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("12a").is_err());
    }

    #[test]
    fn test_mean_of() {
        assert_eq!(Money::from_cents(15000).mean_of(2), Some(Money::from_cents(7500)));
        assert_eq!(Money::from_cents(100).mean_of(3), Some(Money::from_cents(33)));
        assert_eq!(Money::from_cents(5).mean_of(2), Some(Money::from_cents(3)));
        assert_eq!(Money::from_cents(-5).mean_of(2), Some(Money::from_cents(-3)));
        assert_eq!(Money::from_cents(100).mean_of(0), None);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
