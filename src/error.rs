use chrono::NaiveDateTime;
use thiserror::Error;

use crate::lunisolar::LunarDate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid lunisolar date: {0}")]
    InvalidCalendarDate(LunarDate),

    #[error("year {year} is outside the supported range 1900..=2100")]
    UnsupportedDateRange { year: i32 },

    #[error("local time {0} does not map to a single instant")]
    AmbiguousTime(NaiveDateTime),

    #[error("luck pillar count must be between 1 and {max}", max = crate::luck::MAX_DAEWOON_COUNT)]
    InvalidCount,

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
