//! Immutable description of a recurrence rule plus its query bounds.

use std::collections::BTreeSet;

use cadence_core::EngineSettings;
use chrono::{DateTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::midnight_millis;
use crate::days::DaysMask;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::timezone::resolve_timezone;

/// Base repetition unit of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Integer code used by the storage layer.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
            Self::Yearly => 4,
        }
    }
}

impl TryFrom<i32> for RecurrenceType {
    type Error = RecurrenceError;

    fn try_from(code: i32) -> RecurrenceResult<Self> {
        match code {
            1 => Ok(Self::Daily),
            2 => Ok(Self::Weekly),
            3 => Ok(Self::Monthly),
            4 => Ok(Self::Yearly),
            other => Err(RecurrenceError::UnsupportedRecurrenceType(other)),
        }
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive window on occurrence start instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    pub start: i64,
    pub end: i64,
}

impl QueryRange {
    #[must_use]
    pub const fn contains(self, instant: i64) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// ## Summary
/// A recurrence rule and the bounds of one expansion query.
///
/// All instants are epoch milliseconds (UTC). Built through
/// [`RecurrenceSpecBuilder`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RecurrenceSpec {
    recurrence_type: RecurrenceType,
    interval: i32,
    days_mask: Option<DaysMask>,
    day_in_month: Option<i32>,
    month: Option<i32>,
    start_anchor: i64,
    end_anchor: i64,
    recurrence_start_normalized: i64,
    until: Option<i64>,
    occurrence_count: Option<u32>,
    change_exceptions: BTreeSet<i64>,
    delete_exceptions: BTreeSet<i64>,
    query_range: Option<QueryRange>,
    query_position: Option<u32>,
    calendar_timezone: Tz,
    first_day_of_week: Weekday,
    max_iterations: u32,
    fallback_horizon_years: u32,
    full_time: bool,
    ignore_exceptions: bool,
}

impl RecurrenceSpec {
    /// Starts a builder with the default engine settings.
    #[must_use]
    pub fn builder(
        recurrence_type: RecurrenceType,
        start_anchor: i64,
        end_anchor: i64,
    ) -> RecurrenceSpecBuilder {
        RecurrenceSpecBuilder::new(recurrence_type, start_anchor, end_anchor)
    }

    #[must_use]
    pub const fn recurrence_type(&self) -> RecurrenceType {
        self.recurrence_type
    }

    #[must_use]
    pub const fn interval(&self) -> i32 {
        self.interval
    }

    #[must_use]
    pub const fn days_mask(&self) -> Option<DaysMask> {
        self.days_mask
    }

    #[must_use]
    pub const fn day_in_month(&self) -> Option<i32> {
        self.day_in_month
    }

    /// 0-based month index of a yearly rule.
    #[must_use]
    pub const fn month(&self) -> Option<i32> {
        self.month
    }

    #[must_use]
    pub const fn start_anchor(&self) -> i64 {
        self.start_anchor
    }

    #[must_use]
    pub const fn end_anchor(&self) -> i64 {
        self.end_anchor
    }

    /// Duration of a single occurrence in millis.
    #[must_use]
    pub const fn diff(&self) -> i64 {
        self.end_anchor.saturating_sub(self.start_anchor)
    }

    /// Midnight UTC of the first calendar day of the series.
    #[must_use]
    pub const fn recurrence_start_normalized(&self) -> i64 {
        self.recurrence_start_normalized
    }

    #[must_use]
    pub const fn until(&self) -> Option<i64> {
        self.until
    }

    #[must_use]
    pub const fn occurrence_count(&self) -> Option<u32> {
        self.occurrence_count
    }

    #[must_use]
    pub const fn change_exceptions(&self) -> &BTreeSet<i64> {
        &self.change_exceptions
    }

    #[must_use]
    pub const fn delete_exceptions(&self) -> &BTreeSet<i64> {
        &self.delete_exceptions
    }

    #[must_use]
    pub const fn query_range(&self) -> Option<QueryRange> {
        self.query_range
    }

    #[must_use]
    pub const fn query_position(&self) -> Option<u32> {
        self.query_position
    }

    /// Zone used for calendar-field arithmetic; UTC for full-time series.
    #[must_use]
    pub const fn calendar_timezone(&self) -> Tz {
        if self.full_time {
            Tz::UTC
        } else {
            self.calendar_timezone
        }
    }

    #[must_use]
    pub const fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub const fn fallback_horizon_years(&self) -> u32 {
        self.fallback_horizon_years
    }

    #[must_use]
    pub const fn is_full_time(&self) -> bool {
        self.full_time
    }

    #[must_use]
    pub const fn ignores_exceptions(&self) -> bool {
        self.ignore_exceptions
    }

    /// A copy of this spec asking for the raw series: no range, no position,
    /// no exception suppression.
    #[must_use]
    pub(crate) fn unbounded_raw(&self) -> Self {
        Self {
            query_range: None,
            query_position: None,
            ignore_exceptions: true,
            ..self.clone()
        }
    }
}

/// Builder for [`RecurrenceSpec`].
#[derive(Debug, Clone)]
pub struct RecurrenceSpecBuilder {
    spec: RecurrenceSpec,
    recurrence_start: Option<i64>,
}

impl RecurrenceSpecBuilder {
    /// Creates a builder using `EngineSettings::default()`.
    #[must_use]
    pub fn new(recurrence_type: RecurrenceType, start_anchor: i64, end_anchor: i64) -> Self {
        let defaults = EngineSettings::default();
        Self {
            spec: RecurrenceSpec {
                recurrence_type,
                interval: 1,
                days_mask: None,
                day_in_month: None,
                month: None,
                start_anchor,
                end_anchor,
                recurrence_start_normalized: 0,
                until: None,
                occurrence_count: None,
                change_exceptions: BTreeSet::new(),
                delete_exceptions: BTreeSet::new(),
                query_range: None,
                query_position: None,
                calendar_timezone: Tz::UTC,
                first_day_of_week: defaults.first_day_of_week,
                max_iterations: defaults.max_iterations,
                fallback_horizon_years: defaults.fallback_horizon_years,
                full_time: false,
                ignore_exceptions: false,
            },
            recurrence_start: None,
        }
    }

    /// ## Summary
    /// Applies loaded engine settings: caps, first day of week and default zone.
    ///
    /// ## Errors
    /// Returns an error if the settings are invalid or name an unknown zone.
    pub fn with_settings(mut self, settings: &EngineSettings) -> RecurrenceResult<Self> {
        settings.validate()?;
        self.spec.calendar_timezone = resolve_timezone(&settings.default_timezone)?;
        self.spec.first_day_of_week = settings.first_day_of_week;
        self.spec.max_iterations = settings.max_iterations;
        self.spec.fallback_horizon_years = settings.fallback_horizon_years;
        Ok(self)
    }

    #[must_use]
    pub fn interval(mut self, interval: i32) -> Self {
        self.spec.interval = interval;
        self
    }

    #[must_use]
    pub fn days(mut self, mask: DaysMask) -> Self {
        self.spec.days_mask = Some(mask);
        self
    }

    #[must_use]
    pub fn day_in_month(mut self, day: i32) -> Self {
        self.spec.day_in_month = Some(day);
        self
    }

    /// Sets the 0-based month of a yearly rule.
    #[must_use]
    pub fn month(mut self, month: i32) -> Self {
        self.spec.month = Some(month);
        self
    }

    #[must_use]
    pub fn until(mut self, until: i64) -> Self {
        self.spec.until = Some(until);
        self
    }

    #[must_use]
    pub fn occurrence_count(mut self, count: u32) -> Self {
        self.spec.occurrence_count = Some(count);
        self
    }

    #[must_use]
    pub fn change_exception(mut self, instant: i64) -> Self {
        self.spec.change_exceptions.insert(instant);
        self
    }

    #[must_use]
    pub fn delete_exception(mut self, instant: i64) -> Self {
        self.spec.delete_exceptions.insert(instant);
        self
    }

    /// Restricts results to occurrences starting in `[start, end]`.
    #[must_use]
    pub fn query_range(mut self, start: i64, end: i64) -> Self {
        self.spec.query_range = Some(QueryRange { start, end });
        self
    }

    /// Restricts results to the occurrence at this 1-based position.
    #[must_use]
    pub fn query_position(mut self, position: u32) -> Self {
        self.spec.query_position = Some(position);
        self
    }

    #[must_use]
    pub fn calendar_timezone(mut self, tz: Tz) -> Self {
        self.spec.calendar_timezone = tz;
        self
    }

    #[must_use]
    pub fn first_day_of_week(mut self, weekday: Weekday) -> Self {
        self.spec.first_day_of_week = weekday;
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max: u32) -> Self {
        self.spec.max_iterations = max;
        self
    }

    /// Overrides the series start; only its UTC calendar date is used.
    #[must_use]
    pub fn recurrence_start(mut self, instant: i64) -> Self {
        self.recurrence_start = Some(instant);
        self
    }

    #[must_use]
    pub fn full_time(mut self, full_time: bool) -> Self {
        self.spec.full_time = full_time;
        self
    }

    #[must_use]
    pub fn ignore_exceptions(mut self, ignore: bool) -> Self {
        self.spec.ignore_exceptions = ignore;
        self
    }

    /// ## Summary
    /// Finishes the spec, normalizing the series start to midnight UTC.
    ///
    /// Without an explicit series start, the calendar-zone date of the start
    /// anchor is used.
    ///
    /// ## Errors
    /// Returns `RecurrenceError::InvalidInstant` if an anchor or the series
    /// start cannot be represented as a calendar date, and
    /// `RecurrenceError::InvalidDuration` if the end anchor precedes the start
    /// anchor.
    pub fn build(mut self) -> RecurrenceResult<RecurrenceSpec> {
        let (start, end) = (self.spec.start_anchor, self.spec.end_anchor);
        for anchor in [start, end] {
            if DateTime::from_timestamp_millis(anchor).is_none() {
                return Err(RecurrenceError::InvalidInstant(anchor));
            }
        }
        if end < start {
            return Err(RecurrenceError::InvalidDuration { start, end });
        }

        let date = match self.recurrence_start {
            Some(instant) => crate::calendar::utc_date(instant)?,
            None => DateTime::from_timestamp_millis(self.spec.start_anchor)
                .ok_or(RecurrenceError::InvalidInstant(self.spec.start_anchor))?
                .with_timezone(&self.spec.calendar_timezone())
                .date_naive(),
        };
        self.spec.recurrence_start_normalized = midnight_millis(date);
        Ok(self.spec)
    }
}
