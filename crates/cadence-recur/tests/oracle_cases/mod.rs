use cadence_recur::{DaysMask, RecurrenceSpec, RecurrenceType, calculate};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

/// A rule expressed both as an RFC 5545 rule set and as a native spec.
pub struct OracleCase {
    pub name: &'static str,
    pub rruleset: &'static str,
    pub spec: RecurrenceSpec,
    pub limit: u16,
}

fn millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn nine_am(recurrence_type: RecurrenceType) -> cadence_recur::RecurrenceSpecBuilder {
    RecurrenceSpec::builder(recurrence_type, millis(2024, 1, 1, 9), millis(2024, 1, 1, 10))
}

#[expect(clippy::too_many_lines)]
pub fn oracle_cases() -> Vec<OracleCase> {
    vec![
        OracleCase {
            name: "daily_every_third_day",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=DAILY;INTERVAL=3;COUNT=10",
            spec: nine_am(RecurrenceType::Daily)
                .interval(3)
                .occurrence_count(10)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "weekly_biweekly_mon_wed_fri",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR;COUNT=30",
            spec: nine_am(RecurrenceType::Weekly)
                .interval(2)
                .days(
                    DaysMask::MONDAY
                        .union(DaysMask::WEDNESDAY)
                        .union(DaysMask::FRIDAY),
                )
                .occurrence_count(30)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "weekly_new_york_across_dst",
            rruleset: "DTSTART;TZID=America/New_York:20240301T090000\nRRULE:FREQ=WEEKLY;BYDAY=TU,TH;COUNT=8",
            spec: RecurrenceSpec::builder(
                RecurrenceType::Weekly,
                millis(2024, 3, 1, 14),
                millis(2024, 3, 1, 15),
            )
            .calendar_timezone(Tz::America__New_York)
            .days(DaysMask::TUESDAY.union(DaysMask::THURSDAY))
            .occurrence_count(8)
            .build()
            .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_first_tuesday",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=MONTHLY;BYDAY=1TU;COUNT=24",
            spec: nine_am(RecurrenceType::Monthly)
                .days(DaysMask::TUESDAY)
                .day_in_month(1)
                .occurrence_count(24)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_last_friday",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=MONTHLY;BYDAY=-1FR;COUNT=24",
            spec: nine_am(RecurrenceType::Monthly)
                .days(DaysMask::FRIDAY)
                .day_in_month(5)
                .occurrence_count(24)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_third_thursday_every_other_month",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=MONTHLY;INTERVAL=2;BYDAY=3TH;COUNT=12",
            spec: nine_am(RecurrenceType::Monthly)
                .interval(2)
                .days(DaysMask::THURSDAY)
                .day_in_month(3)
                .occurrence_count(12)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_day_31_skips_short_months",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=MONTHLY;BYMONTHDAY=31;COUNT=7",
            spec: nine_am(RecurrenceType::Monthly)
                .day_in_month(31)
                .occurrence_count(7)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_last_day",
            rruleset: "DTSTART:20230101T090000Z\nRRULE:FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=24",
            spec: RecurrenceSpec::builder(
                RecurrenceType::Monthly,
                millis(2023, 1, 1, 9),
                millis(2023, 1, 1, 10),
            )
            .days(DaysMask::DAY)
            .day_in_month(5)
            .occurrence_count(24)
            .build()
            .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "monthly_second_day",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=MONTHLY;BYMONTHDAY=2;COUNT=6",
            spec: nine_am(RecurrenceType::Monthly)
                .days(DaysMask::DAY)
                .day_in_month(2)
                .occurrence_count(6)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "yearly_leap_day",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29;COUNT=3",
            spec: nine_am(RecurrenceType::Yearly)
                .month(1)
                .day_in_month(29)
                .occurrence_count(3)
                .build()
                .unwrap(),
            limit: 100,
        },
        OracleCase {
            name: "yearly_last_sunday_of_october",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU;COUNT=5",
            spec: nine_am(RecurrenceType::Yearly)
                .month(9)
                .days(DaysMask::SUNDAY)
                .day_in_month(5)
                .occurrence_count(5)
                .build()
                .unwrap(),
            limit: 100,
        },
    ]
}

pub fn assert_case(case: &OracleCase) {
    let rrule_set: RRuleSet = case
        .rruleset
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));

    let expected: Vec<i64> = rrule_set
        .all(case.limit)
        .dates
        .iter()
        .map(chrono::DateTime::timestamp_millis)
        .collect();

    let actual: Vec<i64> = calculate(&case.spec)
        .unwrap_or_else(|err| panic!("Failed to calculate {}: {}", case.name, err))
        .iter()
        .map(|occurrence| occurrence.start)
        .collect();

    assert!(!expected.is_empty(), "Case {} produced no dates", case.name);
    assert_eq!(actual, expected, "Case {} did not match", case.name);
}
