use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// how many days a month contributes to accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCount {
    /// actual days elapsed
    Actual,
    /// at most 30 days per month
    Thirty,
}

/// how many days make up a year for the interest basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBasis {
    /// actual days, leap-year aware (see [`YearMethod`])
    Actual,
    /// fixed 365-day year
    Fixed365,
    /// fixed 360-day year
    Fixed360,
}

/// how leap years are attributed under [`YearBasis::Actual`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearMethod {
    /// the calendar year containing the day before the accrual end decides
    Civil,
    /// actual day count back to the same date one year prior
    Anniversary,
}

/// billing period length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPeriod {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentPeriod {
    /// calendar months between consecutive due dates
    pub fn months_between(&self) -> u32 {
        match self {
            PaymentPeriod::Monthly => 1,
            PaymentPeriod::Quarterly => 3,
            PaymentPeriod::SemiAnnual => 6,
            PaymentPeriod::Annual => 12,
        }
    }

    /// payments per year
    pub fn per_year(&self) -> u32 {
        match self {
            PaymentPeriod::Monthly => 12,
            PaymentPeriod::Quarterly => 4,
            PaymentPeriod::SemiAnnual => 2,
            PaymentPeriod::Annual => 1,
        }
    }

    /// diagnostic label for non-monthly accrual fractions
    pub fn fraction_label(&self) -> &'static str {
        match self {
            PaymentPeriod::Monthly => "",
            PaymentPeriod::Quarterly => "quarter year",
            PaymentPeriod::SemiAnnual => "half year",
            PaymentPeriod::Annual => "full year",
        }
    }
}

/// what is fixed and what is solved for
///
/// Exactly one of payment amount and installment count may be unknown, and
/// the unknown-unknown combination is unrepresentable here on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repayment {
    /// payment known, schedule runs until the balance is extinguished
    FixedPayment { payment: Money },
    /// count known, the engine solves for the level payment
    FixedCount { installments: u32 },
    /// both known
    Fixed { payment: Money, installments: u32 },
}

impl Repayment {
    /// the scheduled payment, if fixed
    pub fn payment(&self) -> Option<Money> {
        match self {
            Repayment::FixedPayment { payment } | Repayment::Fixed { payment, .. } => {
                Some(*payment)
            }
            Repayment::FixedCount { .. } => None,
        }
    }

    /// the installment cap, if fixed
    pub fn installments(&self) -> Option<u32> {
        match self {
            Repayment::FixedCount { installments } | Repayment::Fixed { installments, .. } => {
                Some(*installments)
            }
            Repayment::FixedPayment { .. } => None,
        }
    }
}

/// an irregular leading payment consumed before regular billing begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstPayment {
    pub date: NaiveDate,
    pub amount: Money,
}

impl FirstPayment {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self { date, amount }
    }
}

/// immutable input to a scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// date the loan was made
    pub origin_date: NaiveDate,
    /// initial principal
    pub principal: Money,
    /// annual nominal interest rate
    pub annual_rate: Rate,
    pub repayment: Repayment,
    /// irregular leading payments, in date order
    pub first_payments: Vec<FirstPayment>,
    pub day_count: DayCount,
    pub year_basis: YearBasis,
    /// billing day-of-month; defaults to the origin date's day
    pub due_day: Option<u32>,
    pub period: PaymentPeriod,
    pub year_method: YearMethod,
}

impl LoanTerms {
    /// terms with the default conventions: monthly, actual/actual, civil
    /// years, billing on the origin date's day
    pub fn new(
        origin_date: NaiveDate,
        principal: Money,
        annual_rate: Rate,
        repayment: Repayment,
    ) -> Self {
        Self {
            origin_date,
            principal,
            annual_rate,
            repayment,
            first_payments: Vec::new(),
            day_count: DayCount::Actual,
            year_basis: YearBasis::Actual,
            due_day: None,
            period: PaymentPeriod::Monthly,
            year_method: YearMethod::Civil,
        }
    }

    /// the effective billing day-of-month
    pub fn billing_day(&self) -> u32 {
        self.due_day.unwrap_or_else(|| self.origin_date.day())
    }

    /// reject contradictory terms before any computation begins
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ScheduleError::configuration(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }

        if self.annual_rate.as_decimal().is_sign_negative() {
            return Err(ScheduleError::configuration(format!(
                "annual rate must not be negative, got {}",
                self.annual_rate
            )));
        }

        if let Some(payment) = self.repayment.payment() {
            if !payment.is_positive() {
                return Err(ScheduleError::configuration(format!(
                    "payment must be positive, got {payment}"
                )));
            }
        }

        if let Some(installments) = self.repayment.installments() {
            if installments == 0 {
                return Err(ScheduleError::configuration(
                    "number of installments must be at least 1",
                ));
            }
        }

        let day = self.billing_day();
        if !(1..=31).contains(&day) {
            return Err(ScheduleError::configuration(format!(
                "billing day must be within 1..=31, got {day}"
            )));
        }

        let mut anchor = self.origin_date;
        for fp in &self.first_payments {
            if fp.date <= anchor {
                return Err(ScheduleError::configuration(format!(
                    "first payments must be strictly ascending and after the origin date, \
                     got {} following {}",
                    crate::dates::format_date(fp.date),
                    crate::dates::format_date(anchor),
                )));
            }
            anchor = fp.date;
        }

        Ok(())
    }
}
