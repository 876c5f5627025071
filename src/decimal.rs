use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type quantized to 2 decimal places (currency cents).
///
/// Every construction and arithmetic result is rounded half away from zero,
/// so a `Money` value is always an exact number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal, rounding half away from zero to the cent
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// create from decimal, rounding **up** to the next cent
    ///
    /// Used for level-payment derivation so the lender never under-collects
    /// due to rounding; the trailing residual stays non-negative.
    pub fn ceil_from_decimal(d: Decimal) -> Self {
        let cents = (d * Decimal::from(100)).ceil();
        Money(cents / Decimal::from(100))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s)?))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// check if strictly negative
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 / other)
    }
}

/// rate type for annual interest rates expressed as a fraction (0.07 for 7%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal fraction (e.g., 0.07 for 7%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a percentage, fractional percents allowed (e.g., 7.25)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::from(100))
    }

    /// get as decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percent(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// periodic rate for the given number of payments per year
    pub fn periodic(&self, per_year: u32) -> Rate {
        Rate(self.0 / Decimal::from(per_year))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_quantized_to_cents() {
        let m = Money::from_decimal(dec!(100.005));
        assert_eq!(m, Money::from_str_exact("100.01").unwrap());

        // half away from zero, not banker's rounding
        let m = Money::from_decimal(dec!(2.125));
        assert_eq!(m.to_string(), "2.13");
        let m = Money::from_decimal(dec!(-2.125));
        assert_eq!(m.to_string(), "-2.13");
    }

    #[test]
    fn test_ceiling_to_cent() {
        assert_eq!(
            Money::ceil_from_decimal(dec!(71.801)),
            Money::from_str_exact("71.81").unwrap()
        );
        assert_eq!(
            Money::ceil_from_decimal(dec!(71.81)),
            Money::from_str_exact("71.81").unwrap()
        );
        assert_eq!(
            Money::ceil_from_decimal(dec!(71.8100001)),
            Money::from_str_exact("71.82").unwrap()
        );
    }

    #[test]
    fn test_sign_checks() {
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::CENT.is_positive());
        assert!((Money::ZERO - Money::CENT).is_negative());
    }

    #[test]
    fn test_rate_conversions() {
        let r = Rate::from_percent(dec!(7.25));
        assert_eq!(r.as_decimal(), dec!(0.0725));
        assert_eq!(r.as_percent(), dec!(7.25));

        let monthly = Rate::from_percent(dec!(12)).periodic(12);
        assert_eq!(monthly.as_decimal(), dec!(0.01));
    }

    #[test]
    fn test_division_rounds_to_cents() {
        let m = Money::from_major(1000) / Decimal::from(3);
        assert_eq!(m, Money::from_str_exact("333.33").unwrap());
    }
}
