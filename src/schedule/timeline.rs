use chrono::NaiveDate;

use crate::dates;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::terms::LoanTerms;

/// hard stop for open-ended schedules, in years of billing periods
const MAX_SCHEDULE_YEARS: u32 = 35;

/// The sequence of payment events for one scheduling run: any irregular
/// first payments in order, then regular due dates derived by advancing the
/// anchor by the period length and snapping to the billing day.
///
/// The advance-then-snap split keeps billing anchored to a fixed day of the
/// month regardless of where the previous period landed, so variable month
/// lengths cannot make the due day drift.
pub(crate) struct PaymentTimeline<'a> {
    terms: &'a LoanTerms,
    payment: Money,
    anchor: NaiveDate,
    next_first: usize,
    generated: u32,
    cap: Option<u32>,
}

impl<'a> PaymentTimeline<'a> {
    pub(crate) fn new(terms: &'a LoanTerms, payment: Money) -> Self {
        let cap = match terms.repayment.installments() {
            // count is fixed, the scheduler loop terminates on its own
            Some(_) => None,
            None => Some(terms.period.per_year() * MAX_SCHEDULE_YEARS),
        };

        Self {
            terms,
            payment,
            anchor: terms.origin_date,
            next_first: 0,
            generated: 0,
            cap,
        }
    }

    /// next (due date, scheduled amount) pair
    pub(crate) fn next_payment(&mut self) -> Result<(NaiveDate, Money)> {
        if let Some(first) = self.terms.first_payments.get(self.next_first) {
            self.next_first += 1;
            self.anchor = first.date;
            return Ok((first.date, first.amount));
        }

        self.generated += 1;
        if let Some(cap) = self.cap {
            if self.generated > cap {
                return Err(ScheduleError::convergence(format!(
                    "balance still outstanding after {MAX_SCHEDULE_YEARS} years of periods; \
                     the payment amount is too small for this term"
                )));
            }
        }

        let (year, month) = dates::add_months(self.anchor, self.terms.period.months_between());
        let due = dates::date_from_ymd(year, month, self.terms.billing_day())?;
        self.anchor = due;

        Ok((due, self.payment))
    }
}
