use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("malformed date string: {input:?}")]
    Format { input: String },

    #[error("invalid calendar date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("schedule does not converge: {message}")]
    Convergence { message: String },
}

impl ScheduleError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        ScheduleError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn convergence(message: impl Into<String>) -> Self {
        ScheduleError::Convergence {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
