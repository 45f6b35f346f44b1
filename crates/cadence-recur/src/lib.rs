//! Recurrence expansion engine.
//!
//! ## Summary
//! Turns a recurring event's rule ([`RecurrenceSpec`]) into the concrete,
//! position-numbered occurrence instants it falls on. Daily, weekly, monthly
//! and yearly rules are supported, with ordinal weekday selectors, literal
//! month days, change/delete exceptions, and range or position queries.
//!
//! All instants are epoch milliseconds in UTC; calendar arithmetic runs in
//! the rule's calendar timezone.

pub mod calendar;
pub mod collector;
pub mod days;
pub mod engine;
pub mod error;
pub mod exception;
pub mod spec;
pub mod timezone;

pub use collector::{Occurrence, ResultCollector};
pub use days::{DayCode, DaysMask};
pub use engine::{DaySelector, Occurrences, calculate, calculate_with_filter, series_end};
pub use error::{RecurrenceError, RecurrenceResult};
pub use exception::{DayExceptionFilter, ExceptionFilter, InstantExceptionFilter};
pub use spec::{QueryRange, RecurrenceSpec, RecurrenceSpecBuilder, RecurrenceType};
pub use timezone::{ConversionError, local_to_utc, resolve_timezone};
