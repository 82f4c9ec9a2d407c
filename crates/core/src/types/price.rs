//! Type-safe price representation using decimal arithmetic.
//!
//! All catalog prices are Indian Rupees in the standard unit (rupees, not
//! paise). Decimal arithmetic keeps discounts exact: a 10% discount on
//! `₹99,900` is exactly `₹9,990`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of Indian Rupees.
///
/// ## Examples
///
/// ```
/// use flipmart_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::try_new(Decimal::new(119_999, 0)).unwrap();
/// assert_eq!(price.display(), "₹1,19,999.00");
/// assert!(Price::try_new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "₹";

    /// ISO 4217 code of the store currency.
    pub const CURRENCY_CODE: &'static str = "INR";

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn try_new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a line quantity, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// The given fraction of this price (`rate` of `0.10` is ten percent).
    ///
    /// Negative rates are treated as zero.
    #[must_use]
    pub fn portion(self, rate: Decimal) -> Self {
        if rate.is_sign_negative() {
            return Self::ZERO;
        }
        Self(self.0.saturating_mul(rate))
    }

    /// Format for display with paise, e.g. `₹1,19,999.00`.
    #[must_use]
    pub fn display(&self) -> String {
        let fixed = format!("{:.2}", self.0.round_dp(2));
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{}{}.{fraction}", Self::SYMBOL, group_indian(whole))
    }

    /// Format rounded to whole rupees, e.g. `₹1,19,999`.
    #[must_use]
    pub fn display_whole(&self) -> String {
        let whole = self.0.round().trunc().to_string();
        format!("{}{}", Self::SYMBOL, group_indian(&whole))
    }
}

/// Group digits the Indian way: the last three together, then pairs.
fn group_indian(digits: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(len - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Addition saturates at [`Decimal::MAX`].
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// Subtraction floors at zero so a total can never go negative.
impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self((self.0 - rhs.0).max(Decimal::ZERO))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Price::try_new(Decimal::new(-5, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::try_new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [
            Price::from_rupees(119_999).times(1),
            Price::from_rupees(150_000).times(2),
        ];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_rupees(419_999));
    }

    #[test]
    fn test_ten_percent_portion_is_exact() {
        let subtotal = Price::from_rupees(99_900);
        let discount = subtotal.portion(Decimal::new(10, 2));
        assert_eq!(discount, Price::from_rupees(9_990));
        assert_eq!(subtotal - discount, Price::from_rupees(89_910));
    }

    #[test]
    fn test_huge_line_saturates() {
        let price = Price::try_new(Decimal::from_i128_with_scale(10_i128.pow(20), 0)).unwrap();
        let line = price.times(u32::MAX);
        assert_eq!(line.amount(), Decimal::MAX);

        let total: Price = [line, line].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
        assert!(total.portion(Decimal::new(10, 2)) < total);
    }

    #[test]
    fn test_sub_floors_at_zero() {
        assert_eq!(Price::from_rupees(1) - Price::from_rupees(5), Price::ZERO);
    }

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Price::from_rupees(250).display(), "₹250.00");
        assert_eq!(Price::from_rupees(8_999).display(), "₹8,999.00");
        assert_eq!(Price::from_rupees(99_900).display(), "₹99,900.00");
        assert_eq!(Price::from_rupees(119_999).display(), "₹1,19,999.00");
        assert_eq!(Price::from_rupees(41_999_999).display(), "₹4,19,99,999.00");
    }

    #[test]
    fn test_display_whole_rounds_paise() {
        let price = Price::try_new(Decimal::new(1_079_991, 1)).unwrap();
        assert_eq!(price.display_whole(), "₹1,07,999");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
        let price: Price = serde_json::from_str("\"99900\"").unwrap();
        assert_eq!(price, Price::from_rupees(99_900));
    }
}
