//! Type-safe price representation using decimal arithmetic.
//!
//! Every amount in the marketplace is Korean won. The backend serializes
//! prices as `BigDecimal`, so amounts are carried as [`Decimal`] and only
//! rounded to whole won when displayed.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in Korean won.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero won.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of won.
    #[must_use]
    pub fn from_won(won: i64) -> Self {
        Self(Decimal::from(won))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Error returned when a price string is not a decimal number.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid price: {0:?}")]
pub struct ParsePriceError(String);

impl FromStr for Price {
    type Err = ParsePriceError;

    /// Parses a plain amount, tolerating thousands separators and a trailing `원`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_end_matches('원')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        Decimal::from_str(&cleaned)
            .map(Self)
            .map_err(|_| ParsePriceError(s.to_owned()))
    }
}

/// Renders as grouped whole won, e.g. `15,000원`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = rounded.abs().trunc().to_string();
        write!(f, "{sign}{}원", group_thousands(&digits))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_won(0).to_string(), "0원");
        assert_eq!(Price::from_won(999).to_string(), "999원");
        assert_eq!(Price::from_won(1000).to_string(), "1,000원");
        assert_eq!(Price::from_won(18_000).to_string(), "18,000원");
        assert_eq!(Price::from_won(1_234_567).to_string(), "1,234,567원");
    }

    #[test]
    fn test_display_rounds_fractional_won() {
        let price = Price::new(Decimal::new(500_050, 2)); // 5000.50
        assert_eq!(price.to_string(), "5,001원");
        assert_eq!(Price::new(Decimal::new(-150_000, 2)).to_string(), "-1,500원");
    }

    #[test]
    fn test_times_and_sum() {
        let line = Price::from_won(5000).times(3);
        assert_eq!(line, Price::from_won(15_000));

        let total: Price = [Price::from_won(1000), Price::from_won(2500)].iter().sum();
        assert_eq!(total, Price::from_won(3500));
    }

    #[test]
    fn test_parse_accepts_formatted_input() {
        assert_eq!("15,000원".parse::<Price>().unwrap(), Price::from_won(15_000));
        assert_eq!(" 3000 ".parse::<Price>().unwrap(), Price::from_won(3000));
        assert!("cheap".parse::<Price>().is_err());
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("5000.00").unwrap();
        assert_eq!(price, Price::from_won(5000));
    }
}
