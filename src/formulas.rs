//! Stateless closed-form payment math.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// how interest accrues for EMI purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// interest on the outstanding balance, which declines as payments land
    ReducingBalance,
    /// interest on the original principal, spread evenly over the term
    FlatRate,
}

/// level payment for an amortizing loan: `r·PV / (1 − (1+r)^−n)`
///
/// The result is rounded **up** to the cent. At worst this over-collects by
/// under a cent per period; the scheduler's balloon adjustment reconciles
/// the difference, and the residual it sees is never negative.
///
/// A zero periodic rate degrades to simple division, since the closed form's
/// denominator vanishes there.
pub fn level_payment(principal: Money, periodic_rate: Rate, periods: u32) -> Result<Money> {
    if periods == 0 {
        return Err(ScheduleError::configuration(
            "level payment requires at least one period",
        ));
    }

    if periodic_rate.is_zero() {
        return Ok(Money::ceil_from_decimal(
            principal.as_decimal() / Decimal::from(periods),
        ));
    }

    let r = periodic_rate.as_decimal();
    let compound = compound_factor(r, periods);

    // r·PV / (1 − (1+r)^−n) == r·PV·(1+r)^n / ((1+r)^n − 1)
    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Ok(Money::ceil_from_decimal(numerator / denominator))
}

/// equated periodic installment for a monthly-repaid loan
///
/// Reducing balance converts the annual rate to a monthly rate and applies
/// the annuity formula. Flat rate charges the annual rate on the original
/// principal for the whole term in years and spreads the total evenly, so it
/// never rewards amortization.
pub fn emi(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    method: InterestMethod,
) -> Result<Money> {
    if term_months == 0 {
        return Err(ScheduleError::configuration(
            "emi requires a term of at least one month",
        ));
    }

    match method {
        InterestMethod::ReducingBalance => {
            level_payment(principal, annual_rate.periodic(12), term_months)
        }
        InterestMethod::FlatRate => {
            let years = Decimal::from(term_months) / Decimal::from(12);
            let total_repayable =
                principal.as_decimal() * (Decimal::ONE + annual_rate.as_decimal() * years);
            Ok(Money::from_decimal(
                total_repayable / Decimal::from(term_months),
            ))
        }
    }
}

/// `(1 + r)^n` by repeated multiplication
fn compound_factor(r: Decimal, n: u32) -> Decimal {
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        compound *= base;
    }
    compound
}
