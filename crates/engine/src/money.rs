use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Currency-agnostic decimal amount.
///
/// The remote API exchanges amounts as JSON numbers, so the value is kept as
/// an `f64`. Sums must go through [`Accumulator`] (or the [`Sum`] impl, which
/// uses it) so that long ledgers do not drift. Rounding to two decimals only
/// happens when the amount is rendered.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12.5);
/// assert_eq!(amount.to_string(), "12.50");
/// assert_eq!("10,5".parse::<Amount>().unwrap(), Amount::new(10.5));
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Validates a value coming from outside the engine: it must be finite
    /// and `>= 0`.
    pub fn non_negative(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "{value} is not a finite number"
            )));
        }
        if value < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "{value} is negative"
            )));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    /// `self / whole * 100`, or `None` when `whole` is not positive.
    #[must_use]
    pub fn percentage_of(self, whole: Amount) -> Option<f64> {
        whole.is_positive().then(|| self.0 / whole.0 * 100.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid printing "-0.00" for tiny negative residues.
        let value = if self.0.abs() < 0.005 { 0.0 } else { self.0 };
        write!(f, "{value:.2}")
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        for amount in iter {
            acc.add(amount);
        }
        acc.total()
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses user input into an amount.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty, negative or otherwise invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let normalized = rest.replace(',', ".");
        let mut parts = normalized.split('.');
        let whole = parts.next().ok_or_else(invalid)?;
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if let Some(frac) = fraction {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            if frac.len() > 2 {
                return Err(EngineError::InvalidAmount("too many decimals".to_string()));
            }
        }

        let value: f64 = normalized.trim_end_matches('.').parse().map_err(|_| invalid())?;
        Amount::non_negative(value)
    }
}

/// Compensated (Neumaier) running sum.
///
/// Keeps the low-order bits that plain `f64` addition drops, so the result
/// does not depend on how many small amounts were added.
#[derive(Clone, Copy, Debug, Default)]
pub struct Accumulator {
    sum: f64,
    compensation: f64,
}

impl Accumulator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            compensation: 0.0,
        }
    }

    pub fn add(&mut self, amount: Amount) {
        let value = amount.0;
        let next = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - next) + value;
        } else {
            self.compensation += (value - next) + self.sum;
        }
        self.sum = next;
    }

    #[must_use]
    pub fn total(&self) -> Amount {
        Amount(self.sum + self.compensation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Amount::new(0.0).to_string(), "0.00");
        assert_eq!(Amount::new(0.1).to_string(), "0.10");
        assert_eq!(Amount::new(100.0).to_string(), "100.00");
        assert_eq!(Amount::new(1234567.5).to_string(), "1234567.50");
        assert_eq!(Amount::new(-10.5).to_string(), "-10.50");
        assert_eq!(Amount::new(-0.0001).to_string(), "0.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap(), Amount::new(10.0));
        assert_eq!("10.5".parse::<Amount>().unwrap(), Amount::new(10.5));
        assert_eq!("10,50".parse::<Amount>().unwrap(), Amount::new(10.5));
        assert_eq!("+1.00".parse::<Amount>().unwrap(), Amount::new(1.0));
        assert_eq!("  2.25 ".parse::<Amount>().unwrap(), Amount::new(2.25));
        assert_eq!("7.".parse::<Amount>().unwrap(), Amount::new(7.0));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert!("12.345".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!(".5".parse::<Amount>().is_err());
    }

    #[test]
    fn non_negative_rejects_nan_and_negative() {
        assert!(Amount::non_negative(f64::NAN).is_err());
        assert!(Amount::non_negative(f64::INFINITY).is_err());
        assert!(Amount::non_negative(-0.01).is_err());
        assert_eq!(Amount::non_negative(0.0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn accumulator_keeps_small_terms() {
        let mut acc = Accumulator::new();
        for value in [1e100, 1.0, -1e100] {
            acc.add(Amount::new(value));
        }
        assert_eq!(acc.total(), Amount::new(1.0));
    }

    #[test]
    fn sum_of_tenths_is_exact() {
        let total: Amount = std::iter::repeat_n(Amount::new(0.1), 10).sum();
        assert_eq!(total, Amount::new(1.0));
    }

    #[test]
    fn percentage_of_guards_zero() {
        assert_eq!(Amount::new(50.0).percentage_of(Amount::new(80.0)), Some(62.5));
        assert_eq!(Amount::new(50.0).percentage_of(Amount::ZERO), None);
    }
}
