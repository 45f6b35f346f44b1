use chrono::{Datelike, Days};

use super::{Cursor, Step};
use crate::calendar::week_start;
use crate::days::DaysMask;
use crate::error::RecurrenceResult;
use crate::exception::ExceptionFilter;

/// ## Summary
/// Selected weekdays of every `interval`th week, starting with the week that
/// contains the series start.
///
/// Weeks begin on the configured first day of the week. Weekday offsets are
/// decoded Monday-based, and the partial-first-week until adjustment for
/// count-bounded series compares Monday-based offsets regardless of the
/// configured first day.
pub(super) fn expand<F>(
    cursor: &mut Cursor<'_, F>,
    interval: u32,
    days: DaysMask,
) -> RecurrenceResult<()>
where
    F: ExceptionFilter + ?Sized,
{
    let first_day = cursor.spec.first_day_of_week();
    let monday_offsets = days.monday_offsets();

    let start_offset = cursor.series_start.weekday().num_days_from_monday();
    if cursor.spec.occurrence_count().is_some()
        && let Some(&highest) = monday_offsets.last()
        && highest < start_offset
    {
        cursor.extend_until(start_offset - highest)?;
    }

    let shift = first_day.num_days_from_monday();
    let mut week_offsets: Vec<u64> = monday_offsets
        .iter()
        .map(|offset| u64::from((offset + 7 - shift) % 7))
        .collect();
    week_offsets.sort_unstable();

    let step = Days::new(7 * u64::from(interval));
    let mut week = week_start(cursor.series_start, first_day);

    while !cursor.is_past_until(week) {
        for &offset in &week_offsets {
            let Some(date) = week.checked_add_days(Days::new(offset)) else {
                return Ok(());
            };
            if cursor.offer(date)? == Step::Stop {
                return Ok(());
            }
        }
        let Some(next) = week.checked_add_days(step) else {
            break;
        };
        week = next;
    }

    Ok(())
}
