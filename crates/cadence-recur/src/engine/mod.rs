//! Recurrence expansion: validation, dispatch and the shared candidate cursor.
//!
//! Each calculation runs over a stack-local [`Cursor`]; nothing is shared
//! between calls, so specs can be expanded concurrently.

mod daily;
mod monthly;
mod weekly;
mod yearly;

use chrono::{DateTime, Months, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::calendar::{midnight_millis, utc_date};
use crate::collector::ResultCollector;
use crate::days::DaysMask;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::exception::{ExceptionFilter, InstantExceptionFilter};
use crate::spec::{QueryRange, RecurrenceSpec, RecurrenceType};
use crate::timezone::local_to_utc;

pub use monthly::DaySelector;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Result set of one calculation.
pub type Occurrences = ResultCollector;

/// ## Summary
/// Expands `spec` into its occurrences, suppressing candidates whose start
/// instant is listed as a change or delete exception.
///
/// ## Errors
/// Returns a validation error if the rule is malformed. No partial results
/// are produced.
pub fn calculate(spec: &RecurrenceSpec) -> RecurrenceResult<Occurrences> {
    calculate_with_filter(spec, &InstantExceptionFilter)
}

/// ## Summary
/// Expands `spec`, consulting `filter` for every candidate that passed the
/// date-bound test.
///
/// ## Errors
/// Returns a validation error if the rule is malformed.
pub fn calculate_with_filter<F>(spec: &RecurrenceSpec, filter: &F) -> RecurrenceResult<Occurrences>
where
    F: ExceptionFilter + ?Sized,
{
    let rule = Rule::validate(spec)?;
    let mut cursor = Cursor::new(spec, filter)?;

    tracing::debug!(
        recurrence_type = %spec.recurrence_type(),
        interval = spec.interval(),
        series_start = %cursor.series_start,
        until = cursor.until,
        occurrence_count = ?spec.occurrence_count(),
        tz = %cursor.tz.name(),
        "Calculating recurrence"
    );

    match rule {
        Rule::Daily { interval } => daily::expand(&mut cursor, interval)?,
        Rule::Weekly { interval, days } => weekly::expand(&mut cursor, interval, days)?,
        Rule::Monthly { interval, selector } => monthly::expand(&mut cursor, interval, selector)?,
        Rule::Yearly {
            interval,
            month,
            selector,
        } => yearly::expand(&mut cursor, interval, month, selector)?,
    }

    tracing::debug!(
        occurrences = cursor.results.len(),
        last_position = cursor.position,
        "Recurrence calculated"
    );

    Ok(cursor.results)
}

/// ## Summary
/// Computes the last occurrence of a count-bounded series.
///
/// Exceptions, range and position bounds are ignored. Returns `Ok(None)` for
/// series without an occurrence count.
///
/// ## Errors
/// Returns a validation error if the rule is malformed.
pub fn series_end(spec: &RecurrenceSpec) -> RecurrenceResult<Option<crate::Occurrence>> {
    if spec.occurrence_count().is_none() {
        return Ok(None);
    }
    let raw = calculate(&spec.unbounded_raw())?;
    Ok(raw.last().copied())
}

/// A validated rule, ready for its expansion algorithm.
#[derive(Debug, Clone)]
enum Rule {
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        days: DaysMask,
    },
    Monthly {
        interval: u32,
        selector: DaySelector,
    },
    Yearly {
        interval: u32,
        month: u32,
        selector: DaySelector,
    },
}

impl Rule {
    fn validate(spec: &RecurrenceSpec) -> RecurrenceResult<Self> {
        if spec.query_position() == Some(0) {
            return Err(RecurrenceError::InvalidQueryPosition);
        }

        let interval = u32::try_from(spec.interval())
            .ok()
            .filter(|interval| *interval >= 1)
            .ok_or(RecurrenceError::MissingInterval(spec.interval()))?;

        match spec.recurrence_type() {
            RecurrenceType::Daily => Ok(Self::Daily { interval }),
            RecurrenceType::Weekly => {
                let days = spec
                    .days_mask()
                    .filter(|mask| !mask.is_empty())
                    .ok_or(RecurrenceError::MissingWeekdays)?
                    .check_known()?;
                Ok(Self::Weekly { interval, days })
            }
            RecurrenceType::Monthly => Ok(Self::Monthly {
                interval,
                selector: DaySelector::from_spec(spec)?,
            }),
            RecurrenceType::Yearly => {
                let month = spec.month().ok_or(RecurrenceError::MissingMonth)?;
                let month = u32::try_from(month)
                    .ok()
                    .filter(|month| *month < 12)
                    .ok_or(RecurrenceError::InvalidMonth(month))?;
                Ok(Self::Yearly {
                    interval,
                    month: month + 1,
                    selector: DaySelector::from_spec(spec)?,
                })
            }
        }
    }
}

/// Whether an algorithm should keep offering candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// Mutable working state of one calculation.
struct Cursor<'a, F: ?Sized> {
    spec: &'a RecurrenceSpec,
    filter: &'a F,
    tz: Tz,
    time_of_day: NaiveTime,
    series_start: NaiveDate,
    /// Effective upper bound on occurrence starts, inclusive.
    until: i64,
    until_date: NaiveDate,
    query_range: Option<QueryRange>,
    query_position: Option<u32>,
    /// Candidates that passed the date-bound test so far.
    position: u32,
    /// Occurrences appended to `results` so far.
    accepted: u32,
    results: ResultCollector,
}

impl<'a, F> Cursor<'a, F>
where
    F: ExceptionFilter + ?Sized,
{
    fn new(spec: &'a RecurrenceSpec, filter: &'a F) -> RecurrenceResult<Self> {
        let tz = spec.calendar_timezone();
        let anchor = DateTime::from_timestamp_millis(spec.start_anchor())
            .ok_or(RecurrenceError::InvalidInstant(spec.start_anchor()))?
            .with_timezone(&tz);
        let series_start = utc_date(spec.recurrence_start_normalized())?;

        let until = match spec.until() {
            Some(until) => until,
            None => {
                if spec.occurrence_count().is_none() {
                    tracing::warn!(
                        horizon_years = spec.fallback_horizon_years(),
                        "Rule has neither until nor occurrence count, using fallback horizon"
                    );
                }
                fallback_until(series_start, spec.fallback_horizon_years())
            }
        };

        let (query_range, query_position) = match (spec.query_range(), spec.query_position()) {
            (Some(range), Some(position)) => {
                tracing::warn!(
                    range_start = range.start,
                    range_end = range.end,
                    position,
                    "Both query range and query position set, ignoring position"
                );
                (Some(range), None)
            }
            bounds => bounds,
        };

        Ok(Self {
            spec,
            filter,
            tz,
            time_of_day: anchor.time(),
            series_start,
            until,
            until_date: local_date(until, tz)?,
            query_range,
            query_position,
            position: 0,
            accepted: 0,
            results: ResultCollector::new(),
        })
    }

    /// Moves the effective until forward by whole days.
    fn extend_until(&mut self, days: u32) -> RecurrenceResult<()> {
        self.until = self
            .until
            .saturating_add(i64::from(days) * MILLIS_PER_DAY);
        self.until_date = local_date(self.until, self.tz)?;
        tracing::trace!(days, until = self.until, "Extended effective until");
        Ok(())
    }

    /// Whether a period starting on `date` lies entirely after the until bound.
    fn is_past_until(&self, date: NaiveDate) -> bool {
        date > self.until_date
    }

    /// Start instant of the occurrence on calendar day `date`, or `None` when
    /// the wall-clock time does not exist that day (a skipped calendar day).
    fn instant_on(&self, date: NaiveDate) -> Option<i64> {
        match local_to_utc(date.and_time(self.time_of_day), self.tz) {
            Ok(instant) => Some(instant.timestamp_millis()),
            Err(err) => {
                tracing::debug!(%date, %err, "No such wall-clock time, skipping candidate");
                None
            }
        }
    }

    /// ## Summary
    /// Runs the acceptance test for the candidate on `date`.
    ///
    /// Candidates before the series start, and candidates whose wall-clock
    /// time does not exist in the calendar zone, are skipped without consuming
    /// a position. Every other candidate up to the until bound consumes one,
    /// whether or not it ends up in the results.
    fn offer(&mut self, date: NaiveDate) -> RecurrenceResult<Step> {
        if date < self.series_start {
            return Ok(Step::Continue);
        }

        let Some(start) = self.instant_on(date) else {
            return Ok(Step::Continue);
        };
        if start > self.until {
            tracing::trace!(%date, start, until = self.until, "Candidate after until");
            return Ok(Step::Stop);
        }
        if self.accepted >= self.spec.max_iterations() {
            tracing::debug!(
                max_iterations = self.spec.max_iterations(),
                "Iteration cap reached"
            );
            return Ok(Step::Stop);
        }
        if self.query_range.is_some_and(|range| start > range.end) {
            return Ok(Step::Stop);
        }

        self.position += 1;
        let position = self.position;
        let end = start
            .checked_add(self.spec.diff())
            .ok_or(RecurrenceError::InvalidInstant(start))?;
        let suppressed = !self.spec.ignores_exceptions()
            && self.filter.is_exception(
                start,
                self.spec.change_exceptions(),
                self.spec.delete_exceptions(),
            );

        if let Some(target) = self.query_position {
            if position == target {
                tracing::trace!(position, start, suppressed, "Reached query position");
                if !suppressed {
                    self.append(position, start, end);
                }
                return Ok(Step::Stop);
            }
        } else if suppressed {
            tracing::trace!(position, start, "Candidate suppressed by exception");
        } else if self.query_range.is_none_or(|range| range.contains(start)) {
            tracing::trace!(position, start, "Candidate accepted");
            self.append(position, start, end);
        }

        if self
            .spec
            .occurrence_count()
            .is_some_and(|count| position >= count)
        {
            return Ok(Step::Stop);
        }
        Ok(Step::Continue)
    }

    fn append(&mut self, position: u32, start: i64, end: i64) {
        self.results.append(position, start, end);
        self.accepted += 1;
    }
}

/// Series start plus the fallback horizon, as an instant.
fn fallback_until(series_start: NaiveDate, horizon_years: u32) -> i64 {
    let horizon = series_start
        .checked_add_months(Months::new(horizon_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX);
    midnight_millis(horizon)
}

/// Calendar date of `instant` in `tz`.
fn local_date(instant: i64, tz: Tz) -> RecurrenceResult<NaiveDate> {
    DateTime::from_timestamp_millis(instant)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .ok_or(RecurrenceError::InvalidInstant(instant))
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
