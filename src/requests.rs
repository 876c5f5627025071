//! Intake for the two kinds of scheduling request the web layer makes:
//! a persisted loan disbursement record and an ad-hoc calculator request.
//! Both map into [`LoanTerms`]; nothing here is written back anywhere.

use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::formulas::{self, InterestMethod};
use crate::terms::{LoanTerms, Repayment};

/// unit the repayment period of a disbursement is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Months,
    Years,
}

impl PeriodUnit {
    fn months(&self, period: u32) -> u32 {
        match self {
            PeriodUnit::Months => period,
            PeriodUnit::Years => period * 12,
        }
    }
}

/// the slice of a persisted loan disbursement the engine needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDisbursement {
    pub loan_id: Uuid,
    pub amount_disbursed: Money,
    pub annual_rate: Rate,
    pub interest_method: InterestMethod,
    pub repayment_period: u32,
    pub period_unit: PeriodUnit,
    /// due date of the first installment
    pub first_due: NaiveDate,
}

impl LoanDisbursement {
    /// repayment term in months
    pub fn term_months(&self) -> u32 {
        self.period_unit.months(self.repayment_period)
    }

    /// periodic installment amount for this disbursement
    pub fn emi(&self) -> Result<Money> {
        formulas::emi(
            self.amount_disbursed,
            self.annual_rate,
            self.term_months(),
            self.interest_method,
        )
    }

    /// total amount the member will repay over the full term
    pub fn total_repayable(&self) -> Result<Money> {
        let term = Decimal::from(self.term_months());
        Ok(self.emi()? * term)
    }

    /// scheduling terms for this disbursement: monthly billing on the
    /// first-due day, EMI payments, capped at the term
    pub fn to_terms(&self) -> Result<LoanTerms> {
        let mut terms = LoanTerms::new(
            month_before(self.first_due),
            self.amount_disbursed,
            self.annual_rate,
            Repayment::Fixed {
                payment: self.emi()?,
                installments: self.term_months(),
            },
        );
        terms.due_day = Some(self.first_due.day());
        Ok(terms)
    }
}

/// a manually entered calculator request, nothing persisted behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorRequest {
    pub principal: Money,
    pub annual_rate: Rate,
    pub installments: u32,
    pub interest_method: InterestMethod,
    /// defaults to today when absent
    pub origin_date: Option<NaiveDate>,
    /// defaults to the origin date's day when absent
    pub due_day: Option<u32>,
}

impl CalculatorRequest {
    /// periodic installment amount for the requested loan
    pub fn emi(&self) -> Result<Money> {
        formulas::emi(
            self.principal,
            self.annual_rate,
            self.installments,
            self.interest_method,
        )
    }

    /// total amount repaid over the full term
    pub fn total_repayable(&self) -> Result<Money> {
        Ok(self.emi()? * Decimal::from(self.installments))
    }

    /// scheduling terms for this request; the origin date falls back to
    /// today as seen by the supplied time provider
    pub fn to_terms(&self, time: &SafeTimeProvider) -> Result<LoanTerms> {
        let origin = self
            .origin_date
            .unwrap_or_else(|| time.now().date_naive());
        let mut terms = LoanTerms::new(
            origin,
            self.principal,
            self.annual_rate,
            Repayment::Fixed {
                payment: self.emi()?,
                installments: self.installments,
            },
        );
        terms.due_day = self.due_day;
        Ok(terms)
    }
}

/// same day one month earlier, clamped to the month's last day
///
/// Only used to synthesize the accrual anchor one period ahead of a stored
/// first-due date; the due dates themselves always come from the billing
/// day, never from this clamp.
fn month_before(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };

    let mut day = date.day();
    loop {
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return d;
        }
        day -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;
    use crate::schedule::compute_schedule;
    use chrono::TimeZone;
    use chrono::Utc;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        dates::parse_date(s).unwrap()
    }

    fn disbursement() -> LoanDisbursement {
        LoanDisbursement {
            loan_id: Uuid::new_v4(),
            amount_disbursed: Money::from_major(200_000),
            annual_rate: Rate::from_percent(dec!(12)),
            interest_method: InterestMethod::ReducingBalance,
            repayment_period: 2,
            period_unit: PeriodUnit::Years,
            first_due: d("2024-2-10"),
        }
    }

    #[test]
    fn test_term_months_conversion() {
        assert_eq!(disbursement().term_months(), 24);

        let mut disb = disbursement();
        disb.period_unit = PeriodUnit::Months;
        assert_eq!(disb.term_months(), 2);
    }

    #[test]
    fn test_disbursement_emi_and_total() {
        let disb = disbursement();
        let emi = disb.emi().unwrap();
        assert_eq!(emi, Money::from_str_exact("9414.70").unwrap());
        assert_eq!(
            disb.total_repayable().unwrap(),
            emi * Decimal::from(24)
        );
    }

    #[test]
    fn test_disbursement_schedule_lands_on_first_due() {
        let disb = disbursement();
        let schedule = compute_schedule(&disb.to_terms().unwrap()).unwrap();

        assert_eq!(schedule.lines.len(), 24);
        assert_eq!(schedule.line(1).unwrap().due_date, d("2024-2-10"));
        assert_eq!(schedule.line(2).unwrap().due_date, d("2024-3-10"));
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_month_before_clamps_to_month_end() {
        assert_eq!(month_before(d("2024-3-31")), d("2024-2-29"));
        assert_eq!(month_before(d("2023-3-31")), d("2023-2-28"));
        assert_eq!(month_before(d("2024-1-15")), d("2023-12-15"));
        assert_eq!(month_before(d("2024-7-31")), d("2024-6-30"));
    }

    #[test]
    fn test_calculator_defaults_origin_to_today() {
        let request = CalculatorRequest {
            principal: Money::from_major(1000),
            annual_rate: Rate::from_percent(dec!(7)),
            installments: 15,
            interest_method: InterestMethod::ReducingBalance,
            origin_date: None,
            due_day: None,
        };

        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        ));
        let terms = request.to_terms(&time).unwrap();
        assert_eq!(terms.origin_date, d("2024-3-10"));
        assert_eq!(terms.billing_day(), 10);

        let schedule = compute_schedule(&terms).unwrap();
        assert_eq!(schedule.lines.len(), 15);
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_calculator_explicit_origin_wins() {
        let request = CalculatorRequest {
            principal: Money::from_major(1000),
            annual_rate: Rate::from_percent(dec!(7)),
            installments: 15,
            interest_method: InterestMethod::ReducingBalance,
            origin_date: Some(d("2014-3-10")),
            due_day: Some(15),
        };

        let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
        let terms = request.to_terms(&time).unwrap();
        assert_eq!(terms.origin_date, d("2014-3-10"));
        assert_eq!(terms.billing_day(), 15);
    }
}
