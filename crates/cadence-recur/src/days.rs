//! Weekday bitmasks and the day codes they resolve to.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};

/// Bitmask of selected weekdays, Sunday in the lowest bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysMask(u16);

impl DaysMask {
    pub const SUNDAY: Self = Self(1);
    pub const MONDAY: Self = Self(1 << 1);
    pub const TUESDAY: Self = Self(1 << 2);
    pub const WEDNESDAY: Self = Self(1 << 3);
    pub const THURSDAY: Self = Self(1 << 4);
    pub const FRIDAY: Self = Self(1 << 5);
    pub const SATURDAY: Self = Self(1 << 6);

    /// Every day of the week; selects the `AnyDay` pseudo code in ordinal rules.
    pub const DAY: Self = Self(0b111_1111);
    /// Monday through Friday; selects `AnyWeekday` in ordinal rules.
    pub const WEEKDAY: Self = Self(0b011_1110);
    /// Saturday and Sunday; selects `AnyWeekendDay` in ordinal rules.
    pub const WEEKEND_DAY: Self = Self(0b100_0001);

    const ALL_BITS: u16 = 0b111_1111;

    /// Wraps a raw mask as stored by the calendar layer.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn for_weekday(weekday: Weekday) -> Self {
        Self(1 << weekday.num_days_from_sunday())
    }

    #[must_use]
    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & Self::for_weekday(weekday).0 != 0
    }

    /// ## Summary
    /// Rejects bits that do not belong to any weekday.
    ///
    /// ## Errors
    /// Returns `RecurrenceError::UnknownWeekdayCode` if bits above Saturday are set.
    pub fn check_known(self) -> RecurrenceResult<Self> {
        if self.0 & !Self::ALL_BITS == 0 {
            Ok(self)
        } else {
            Err(RecurrenceError::UnknownWeekdayCode(self.0))
        }
    }

    /// ## Summary
    /// Decodes the selected weekdays as Monday-based offsets (0=Monday .. 6=Sunday),
    /// in ascending order.
    #[must_use]
    pub fn monday_offsets(self) -> Vec<u32> {
        (0u8..7)
            .filter_map(|offset| Weekday::try_from(offset).ok())
            .filter(|weekday| self.contains(*weekday))
            .map(|weekday| weekday.num_days_from_monday())
            .collect()
    }

    /// ## Summary
    /// Resolves the mask of an ordinal monthly/yearly rule to its day code.
    ///
    /// ## Errors
    /// Returns `RecurrenceError::UnknownWeekdayCode` if the mask is neither a
    /// single weekday nor one of the `DAY`, `WEEKDAY` and `WEEKEND_DAY` masks.
    pub fn day_code(self) -> RecurrenceResult<DayCode> {
        let code = match self {
            Self::DAY => DayCode::AnyDay,
            Self::WEEKDAY => DayCode::AnyWeekday,
            Self::WEEKEND_DAY => DayCode::AnyWeekendDay,
            Self::SUNDAY => DayCode::Sunday,
            Self::MONDAY => DayCode::Monday,
            Self::TUESDAY => DayCode::Tuesday,
            Self::WEDNESDAY => DayCode::Wednesday,
            Self::THURSDAY => DayCode::Thursday,
            Self::FRIDAY => DayCode::Friday,
            Self::SATURDAY => DayCode::Saturday,
            other => return Err(RecurrenceError::UnknownWeekdayCode(other.0)),
        };
        Ok(code)
    }
}

impl From<Weekday> for DaysMask {
    fn from(weekday: Weekday) -> Self {
        Self::for_weekday(weekday)
    }
}

impl FromIterator<Weekday> for DaysMask {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self(0), |mask, weekday| mask.union(Self::for_weekday(weekday)))
    }
}

/// Day selector of an ordinal monthly or yearly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCode {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    /// Any calendar day: the ordinal is a plain day number.
    AnyDay,
    /// Any business day, Monday through Friday.
    AnyWeekday,
    /// Any weekend day, Saturday or Sunday.
    AnyWeekendDay,
}

impl DayCode {
    /// The concrete weekday, if this is not a pseudo code.
    #[must_use]
    pub const fn weekday(self) -> Option<Weekday> {
        match self {
            Self::Sunday => Some(Weekday::Sun),
            Self::Monday => Some(Weekday::Mon),
            Self::Tuesday => Some(Weekday::Tue),
            Self::Wednesday => Some(Weekday::Wed),
            Self::Thursday => Some(Weekday::Thu),
            Self::Friday => Some(Weekday::Fri),
            Self::Saturday => Some(Weekday::Sat),
            Self::AnyDay | Self::AnyWeekday | Self::AnyWeekendDay => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_weekday_codes() {
        assert_eq!(DaysMask::FRIDAY.day_code().unwrap(), DayCode::Friday);
        assert_eq!(DaysMask::SUNDAY.day_code().unwrap(), DayCode::Sunday);
        assert_eq!(
            DaysMask::from(Weekday::Tue).day_code().unwrap(),
            DayCode::Tuesday
        );
    }

    #[test]
    fn test_pseudo_codes() {
        assert_eq!(DaysMask::DAY.day_code().unwrap(), DayCode::AnyDay);
        assert_eq!(DaysMask::WEEKDAY.day_code().unwrap(), DayCode::AnyWeekday);
        assert_eq!(
            DaysMask::WEEKEND_DAY.day_code().unwrap(),
            DayCode::AnyWeekendDay
        );
        assert_eq!(DayCode::AnyWeekday.weekday(), None);
    }

    #[test]
    fn test_pseudo_masks_match_their_weekdays() {
        let weekdays: DaysMask = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .collect();
        assert_eq!(weekdays, DaysMask::WEEKDAY);

        let weekend: DaysMask = [Weekday::Sat, Weekday::Sun].into_iter().collect();
        assert_eq!(weekend, DaysMask::WEEKEND_DAY);
    }

    #[test]
    fn test_unrecognized_combination() {
        let mask = DaysMask::MONDAY.union(DaysMask::WEDNESDAY);
        assert!(matches!(
            mask.day_code(),
            Err(RecurrenceError::UnknownWeekdayCode(10))
        ));
    }

    #[test]
    fn test_check_known_rejects_high_bits() {
        assert!(DaysMask::from_bits(0x80).check_known().is_err());
        assert!(DaysMask::DAY.check_known().is_ok());
    }

    #[test]
    fn test_monday_offsets_sorted() {
        let mask: DaysMask = [Weekday::Sun, Weekday::Wed, Weekday::Mon]
            .into_iter()
            .collect();
        assert_eq!(mask.monday_offsets(), vec![0, 2, 6]);
        assert!(DaysMask::from_bits(0).monday_offsets().is_empty());
    }
}
