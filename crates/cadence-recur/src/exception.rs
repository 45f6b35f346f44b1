//! Suppression of candidates listed as change or delete exceptions.

use std::collections::BTreeSet;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::calendar::midnight_millis;
use crate::spec::RecurrenceSpec;

/// ## Summary
/// Decides whether a candidate occurrence is suppressed by the rule's
/// exception lists.
///
/// Implementations must be total: an empty exception set never suppresses.
pub trait ExceptionFilter {
    fn is_exception(
        &self,
        candidate: i64,
        change_exceptions: &BTreeSet<i64>,
        delete_exceptions: &BTreeSet<i64>,
    ) -> bool;
}

/// Matches exceptions recorded as the exact occurrence start instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantExceptionFilter;

impl ExceptionFilter for InstantExceptionFilter {
    fn is_exception(
        &self,
        candidate: i64,
        change_exceptions: &BTreeSet<i64>,
        delete_exceptions: &BTreeSet<i64>,
    ) -> bool {
        change_exceptions.contains(&candidate) || delete_exceptions.contains(&candidate)
    }
}

/// Matches exceptions recorded as normalized dates (midnight UTC of the
/// excepted day) against the candidate's calendar date in `tz`.
#[derive(Debug, Clone, Copy)]
pub struct DayExceptionFilter {
    tz: Tz,
}

impl DayExceptionFilter {
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// A filter using the spec's calendar zone (UTC for full-time series).
    #[must_use]
    pub const fn for_spec(spec: &RecurrenceSpec) -> Self {
        Self::new(spec.calendar_timezone())
    }
}

impl Default for DayExceptionFilter {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl ExceptionFilter for DayExceptionFilter {
    fn is_exception(
        &self,
        candidate: i64,
        change_exceptions: &BTreeSet<i64>,
        delete_exceptions: &BTreeSet<i64>,
    ) -> bool {
        if change_exceptions.is_empty() && delete_exceptions.is_empty() {
            return false;
        }
        let Some(day) = DateTime::from_timestamp_millis(candidate)
            .map(|instant| instant.with_timezone(&self.tz).date_naive())
        else {
            return false;
        };
        let normalized = midnight_millis(day);
        change_exceptions.contains(&normalized) || delete_exceptions.contains(&normalized)
    }
}

impl<F: Fn(i64, &BTreeSet<i64>, &BTreeSet<i64>) -> bool> ExceptionFilter for F {
    fn is_exception(
        &self,
        candidate: i64,
        change_exceptions: &BTreeSet<i64>,
        delete_exceptions: &BTreeSet<i64>,
    ) -> bool {
        self(candidate, change_exceptions, delete_exceptions)
    }
}
