//! Calendar-field helpers shared by the expansion algorithms.

use chrono::{DateTime, Datelike, Days, NaiveDate, Weekday};

use crate::days::DayCode;
use crate::error::{RecurrenceError, RecurrenceResult};

/// Ordinal selecting the last matching day of a month.
pub const LAST_ORDINAL: u32 = 5;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Returns the number of days in a month (1-based month).
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}

/// Advances a (year, 1-based month) pair by `months`.
#[must_use]
pub fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(months);
    let next_year = i32::try_from(total.div_euclid(12)).unwrap_or(i32::MAX);
    let next_month = u32::try_from(total.rem_euclid(12)).unwrap_or(0) + 1;
    (next_year, next_month)
}

/// The day `day` of the given month, or `None` when the month is too short.
#[must_use]
pub fn literal_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 || day > days_in_month(year, month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// ## Summary
/// Resolves an ordinal day selector inside a month.
///
/// Ordinals 1..=4 count forward from the first of the month, `LAST_ORDINAL`
/// counts backward from the last day. The `AnyWeekday` and `AnyWeekendDay`
/// codes only move the month boundary itself onto a suitable day; later
/// forward ordinals step plain calendar days from there.
#[must_use]
pub fn ordinal_day(year: i32, month: u32, code: DayCode, ordinal: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    let from_last = ordinal == LAST_ORDINAL;
    let steps = u64::from(ordinal.saturating_sub(1));

    if let Some(weekday) = code.weekday() {
        return if from_last {
            last_weekday_of_month(last, weekday)
        } else {
            nth_weekday_of_month(first, weekday, ordinal)
        };
    }

    match (code, from_last) {
        (DayCode::AnyWeekday, false) => {
            let start = match first.weekday() {
                Weekday::Sat => first.checked_add_days(Days::new(2))?,
                Weekday::Sun => first.checked_add_days(Days::new(1))?,
                _ => first,
            };
            start.checked_add_days(Days::new(steps))
        }
        (DayCode::AnyWeekday, true) => match last.weekday() {
            Weekday::Sat => last.checked_sub_days(Days::new(1)),
            Weekday::Sun => last.checked_sub_days(Days::new(2)),
            _ => Some(last),
        },
        (DayCode::AnyWeekendDay, false) => {
            let offset = first.weekday().num_days_from_monday();
            let start = if offset < 5 {
                first.checked_add_days(Days::new(u64::from(5 - offset)))?
            } else {
                first
            };
            start.checked_add_days(Days::new(steps))
        }
        (DayCode::AnyWeekendDay, true) => {
            let offset = last.weekday().num_days_from_monday();
            if offset < 5 {
                last.checked_sub_days(Days::new(u64::from(offset + 1)))
            } else {
                Some(last)
            }
        }
        (_, true) => Some(last),
        (_, false) => first.checked_add_days(Days::new(steps)),
    }
}

/// The `n`th (1-based) `weekday` of the month starting at `first`.
#[must_use]
pub fn nth_weekday_of_month(first: NaiveDate, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let lead = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let date = first.checked_add_days(Days::new(u64::from(lead + 7 * n.saturating_sub(1))))?;
    (date.month() == first.month()).then_some(date)
}

/// The last `weekday` of the month ending at `last`.
#[must_use]
pub fn last_weekday_of_month(last: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let lag = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last.checked_sub_days(Days::new(u64::from(lag)))
}

/// Moves `date` back to the first day of its week.
#[must_use]
pub fn week_start(date: NaiveDate, first_day_of_week: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_monday()
        - first_day_of_week.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}

/// ## Summary
/// The UTC calendar date of an epoch-millis instant.
///
/// ## Errors
/// Returns `RecurrenceError::InvalidInstant` if the instant is out of range.
pub fn utc_date(millis: i64) -> RecurrenceResult<NaiveDate> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or(RecurrenceError::InvalidInstant(millis))
}

/// Midnight UTC of `date` as epoch millis.
#[must_use]
pub fn midnight_millis(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE) * MILLIS_PER_DAY
}

/// `NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()`
const EPOCH_DAYS_FROM_CE: i32 = 719_163;
