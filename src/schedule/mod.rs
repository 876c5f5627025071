mod engine;
mod timeline;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::terms::{LoanTerms, PaymentPeriod};

pub use engine::compute_schedule;

/// one installment in an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    /// 1-based sequence number
    pub number: u32,
    pub due_date: NaiveDate,
    pub opening_balance: Money,
    pub payment: Money,
    /// diagnostic description of the year fraction the interest covers,
    /// e.g. "31/365", "12/365,19/366", or "quarter year"
    pub fraction: String,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// full repayment timeline for one set of loan terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub period: PaymentPeriod,
    pub lines: Vec<ScheduleLine>,
    pub total_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

impl Schedule {
    pub(crate) fn new(terms: &LoanTerms, lines: Vec<ScheduleLine>) -> Self {
        let total_payment = lines.iter().map(|l| l.payment).fold(Money::ZERO, |a, x| a + x);
        let total_interest = lines.iter().map(|l| l.interest).fold(Money::ZERO, |a, x| a + x);
        let total_principal = lines
            .iter()
            .map(|l| l.principal)
            .fold(Money::ZERO, |a, x| a + x);

        Self {
            principal: terms.principal,
            annual_rate: terms.annual_rate,
            period: terms.period,
            lines,
            total_payment,
            total_interest,
            total_principal,
        }
    }

    /// get the line for a specific installment number
    pub fn line(&self, number: u32) -> Option<&ScheduleLine> {
        self.lines.get((number as usize).checked_sub(1)?)
    }

    /// closing balance of the last installment
    pub fn final_balance(&self) -> Money {
        self.lines
            .last()
            .map(|l| l.closing_balance)
            .unwrap_or(self.principal)
    }
}
