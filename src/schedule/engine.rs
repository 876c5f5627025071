use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use crate::dates;
use crate::decimal::Money;
use crate::errors::Result;
use crate::formulas;
use crate::schedule::timeline::PaymentTimeline;
use crate::schedule::{Schedule, ScheduleLine};
use crate::terms::{DayCount, LoanTerms, PaymentPeriod, Repayment, YearBasis, YearMethod};

/// Derive the full payment-by-payment schedule for the given terms.
///
/// Pure: the same terms always produce the same schedule, nothing outside
/// the call is read or written.
pub fn compute_schedule(terms: &LoanTerms) -> Result<Schedule> {
    terms.validate()?;
    Amortizer { terms }.run()
}

struct Amortizer<'a> {
    terms: &'a LoanTerms,
}

impl Amortizer<'_> {
    fn run(&self) -> Result<Schedule> {
        let terms = self.terms;
        let mut payment = match terms.repayment {
            Repayment::FixedPayment { payment } | Repayment::Fixed { payment, .. } => payment,
            Repayment::FixedCount { installments } => formulas::level_payment(
                terms.principal,
                terms.annual_rate.periodic(terms.period.per_year()),
                installments,
            )?,
        };
        let solving = matches!(terms.repayment, Repayment::FixedCount { .. });

        loop {
            let (mut lines, residual) = self.build(payment)?;

            if solving && residual.is_positive() {
                // The level payment was rounded up, so the residual after
                // the fixed number of installments is small and shrinks as
                // the payment grows: a penny at a time reaches zero in a
                // handful of passes.
                debug!(
                    "residual {residual} after {} installments, retrying with payment {}",
                    lines.len(),
                    payment + Money::CENT
                );
                payment += Money::CENT;
                continue;
            }

            if residual.is_positive() {
                balloon(&mut lines, residual);
            }

            return Ok(Schedule::new(terms, lines));
        }
    }

    /// one full pass over the timeline with a candidate payment, answering
    /// the lines and the balance left after the last of them
    fn build(&self, payment: Money) -> Result<(Vec<ScheduleLine>, Money)> {
        let terms = self.terms;
        let mut timeline = PaymentTimeline::new(terms, payment);
        let installment_cap = terms.repayment.installments();

        let mut prev = terms.origin_date;
        let mut balance = terms.principal;
        let mut lines = Vec::new();
        let mut number: u32 = 1;

        while balance.is_positive() && installment_cap.map_or(true, |cap| number <= cap) {
            let (due_date, scheduled) = timeline.next_payment()?;

            let (fraction, interest) = self.accrue(prev, due_date, balance)?;
            let amount_owed = balance + interest;
            // the final regular payment must not overpay principal
            let paid = scheduled.min(amount_owed);
            let principal_portion = (paid - interest).max(Money::ZERO);
            let closing_balance = amount_owed - paid;

            lines.push(ScheduleLine {
                number,
                due_date,
                opening_balance: balance,
                payment: paid,
                fraction,
                interest,
                principal: principal_portion,
                closing_balance,
            });

            balance = closing_balance;
            prev = due_date;
            number += 1;
        }

        let residual = lines.last().map_or(Money::ZERO, |l| l.closing_balance);
        Ok((lines, residual))
    }

    /// interest for one accrual interval, with its year-fraction diagnostic
    fn accrue(&self, prev: NaiveDate, cur: NaiveDate, balance: Money) -> Result<(String, Money)> {
        let terms = self.terms;
        let principal = balance.as_decimal();
        let rate = terms.annual_rate.as_decimal();

        if terms.period != PaymentPeriod::Monthly {
            // non-monthly periods accrue a flat fraction of the annual rate
            // regardless of actual days elapsed
            let divisor = Decimal::from(terms.period.per_year());
            let interest = Money::from_decimal(principal * rate / divisor);
            return Ok((terms.period.fraction_label().to_string(), interest));
        }

        // Split the interval at Jan 1 when days in it fall under two
        // different year bases. An interval ending exactly on Jan 1 has no
        // days in the new year (the end date itself is excluded), so only
        // intervals ending strictly after Jan 1 split.
        let crosses_year = terms.day_count == DayCount::Actual
            && prev.year() != cur.year()
            && !(cur.month() == 1 && cur.day() == 1);

        if crosses_year {
            let jan_first = dates::date_from_ymd(cur.year(), 1, 1)?;
            let days_old = self.days_elapsed(prev, jan_first);
            let basis_old = self.days_in_year(jan_first)?;
            let days_new = self.days_elapsed(jan_first, cur);
            let basis_new = self.days_in_year(cur)?;

            let fraction = format!("{days_old}/{basis_old},{days_new}/{basis_new}");
            let accrued = principal * Decimal::from(days_old) * rate / Decimal::from(basis_old)
                + principal * Decimal::from(days_new) * rate / Decimal::from(basis_new);
            Ok((fraction, Money::from_decimal(accrued)))
        } else {
            let days = self.days_elapsed(prev, cur);
            let basis = self.days_in_year(cur)?;

            let fraction = format!("{days}/{basis}");
            let accrued = principal * Decimal::from(days) * rate / Decimal::from(basis);
            Ok((fraction, Money::from_decimal(accrued)))
        }
    }

    /// day count for an accrual interval under the month convention
    fn days_elapsed(&self, prev: NaiveDate, cur: NaiveDate) -> i64 {
        let actual = dates::days_between(prev, cur);
        match self.terms.day_count {
            DayCount::Actual => actual,
            DayCount::Thirty => actual.min(30),
        }
    }

    /// days in the year used as the interest basis for an interval ending
    /// on `cur`
    fn days_in_year(&self, cur: NaiveDate) -> Result<i64> {
        match self.terms.year_basis {
            YearBasis::Fixed365 => Ok(365),
            YearBasis::Fixed360 => Ok(360),
            YearBasis::Actual => match self.terms.year_method {
                // Interest covers the from-date but not the to-date, so the
                // day before `cur` decides the year: a period ending Jan 1
                // belongs entirely to the prior year.
                YearMethod::Civil => {
                    if dates::is_leap_year(dates::yesterday(cur)) {
                        Ok(366)
                    } else {
                        Ok(365)
                    }
                }
                YearMethod::Anniversary => {
                    Ok(dates::days_between(dates::subtract_one_year(cur)?, cur))
                }
            },
        }
    }
}

/// fold a trailing residual into the last line so the schedule closes at
/// exactly zero; the final payment absorbs the rounding residue
fn balloon(lines: &mut [ScheduleLine], residual: Money) {
    if let Some(last) = lines.last_mut() {
        last.payment += residual;
        last.principal += residual;
        last.closing_balance = Money::ZERO;
    }
}
