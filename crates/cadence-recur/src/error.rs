use thiserror::Error;

/// Recurrence rule validation and calculation errors
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Missing or invalid interval: {0}")]
    MissingInterval(i32),

    #[error("Missing day in month for {0} rule")]
    MissingDayInMonth(&'static str),

    #[error("Invalid day in month {day} (expected {expected})")]
    InvalidDayInMonthType { day: i32, expected: &'static str },

    #[error("Unknown weekday code: {0:#04x}")]
    UnknownWeekdayCode(u16),

    #[error("Weekly rule selects no weekdays")]
    MissingWeekdays,

    #[error("Yearly rule has no month")]
    MissingMonth,

    #[error("Invalid month index {0} (expected 0..=11)")]
    InvalidMonth(i32),

    #[error("Unsupported recurrence type code: {0}")]
    UnsupportedRecurrenceType(i32),

    #[error("Instant {0} is outside the supported calendar range")]
    InvalidInstant(i64),

    #[error("Occurrence end {end} is before its start {start}")]
    InvalidDuration { start: i64, end: i64 },

    #[error("Query position must be at least 1")]
    InvalidQueryPosition,

    #[error(transparent)]
    Conversion(#[from] crate::timezone::ConversionError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::CoreError),
}

pub type RecurrenceResult<T> = std::result::Result<T, RecurrenceError>;
