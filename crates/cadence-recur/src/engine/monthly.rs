use chrono::{Datelike, NaiveDate};

use super::{Cursor, Step};
use crate::calendar::{LAST_ORDINAL, add_months, literal_day, ordinal_day};
use crate::days::DayCode;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::exception::ExceptionFilter;
use crate::spec::RecurrenceSpec;

/// How a monthly or yearly rule picks its day inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    /// A fixed day of the month; months without that day are skipped.
    Literal(u32),
    /// The nth (1..=4) or last (5) day matching `code`.
    Ordinal { code: DayCode, ordinal: u32 },
}

impl DaySelector {
    /// ## Summary
    /// Builds the selector from the rule's days mask and day in month.
    ///
    /// ## Errors
    /// Returns `MissingDayInMonth` without a day, `InvalidDayInMonthType` for
    /// a day out of range, and `UnknownWeekdayCode` for an unusable mask.
    pub fn from_spec(spec: &RecurrenceSpec) -> RecurrenceResult<Self> {
        let day = spec
            .day_in_month()
            .ok_or(RecurrenceError::MissingDayInMonth(spec.recurrence_type().as_str()))?;

        match spec.days_mask() {
            Some(mask) => {
                let code = mask.check_known()?.day_code()?;
                let ordinal = u32::try_from(day)
                    .ok()
                    .filter(|ordinal| (1..=LAST_ORDINAL).contains(ordinal))
                    .ok_or(RecurrenceError::InvalidDayInMonthType {
                        day,
                        expected: "1..=5",
                    })?;
                Ok(Self::Ordinal { code, ordinal })
            }
            None => {
                let literal = u32::try_from(day)
                    .ok()
                    .filter(|literal| (1..=31).contains(literal))
                    .ok_or(RecurrenceError::InvalidDayInMonthType {
                        day,
                        expected: "1..=31",
                    })?;
                Ok(Self::Literal(literal))
            }
        }
    }

    /// The selected day of the given month, if it exists.
    #[must_use]
    pub fn resolve(self, year: i32, month: u32) -> Option<NaiveDate> {
        match self {
            Self::Literal(day) => literal_day(year, month, day),
            Self::Ordinal { code, ordinal } => ordinal_day(year, month, code, ordinal),
        }
    }
}

/// The selected day of every `interval`th month from the series start month.
pub(super) fn expand<F>(
    cursor: &mut Cursor<'_, F>,
    interval: u32,
    selector: DaySelector,
) -> RecurrenceResult<()>
where
    F: ExceptionFilter + ?Sized,
{
    let mut year = cursor.series_start.year();
    let mut month = cursor.series_start.month();

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
            None => tracing::trace!(year, month, ?selector, "Month has no matching day"),
        }

        (year, month) = add_months(year, month, interval);
    }

    Ok(())
}
