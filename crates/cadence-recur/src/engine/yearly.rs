use chrono::{Datelike, NaiveDate};

use super::monthly::DaySelector;
use super::{Cursor, Step};
use crate::error::RecurrenceResult;
use crate::exception::ExceptionFilter;

/// The selected day of `month` in every `interval`th year.
pub(super) fn expand<F>(
    cursor: &mut Cursor<'_, F>,
    interval: u32,
    month: u32,
    selector: DaySelector,
) -> RecurrenceResult<()>
where
    F: ExceptionFilter + ?Sized,
{
    let step = i32::try_from(interval).unwrap_or(i32::MAX);
    let mut year = cursor.series_start.year();

    loop {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            break;
        };
        if cursor.is_past_until(first) {
            break;
        }

        match selector.resolve(year, month) {
            Some(date) => {
                if cursor.offer(date)? == Step::Stop {
                    break;
                }
            }
            None => tracing::trace!(year, month, ?selector, "Year has no matching day"),
        }

        let Some(next) = year.checked_add(step) else {
            break;
        };
        year = next;
    }

    Ok(())
}
