pub mod dates;
pub mod decimal;
pub mod errors;
pub mod formulas;
pub mod requests;
pub mod schedule;
pub mod terms;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use formulas::{emi, level_payment, InterestMethod};
pub use requests::{CalculatorRequest, LoanDisbursement, PeriodUnit};
pub use schedule::{compute_schedule, Schedule, ScheduleLine};
pub use terms::{
    DayCount, FirstPayment, LoanTerms, PaymentPeriod, Repayment, YearBasis, YearMethod,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
