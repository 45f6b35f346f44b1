use chrono::Days;

use super::{Cursor, Step};
use crate::error::RecurrenceResult;
use crate::exception::ExceptionFilter;

/// Every `interval` days from the series start.
pub(super) fn expand<F>(cursor: &mut Cursor<'_, F>, interval: u32) -> RecurrenceResult<()>
where
    F: ExceptionFilter + ?Sized,
{
    let step = Days::new(u64::from(interval));
    let mut date = cursor.series_start;

    while !cursor.is_past_until(date) {
        if cursor.offer(date)? == Step::Stop {
            break;
        }
        let Some(next) = date.checked_add_days(step) else {
            break;
        };
        date = next;
    }

    Ok(())
}
