//! Calendar timezones: identifier lookup and wall-clock to UTC conversion.
//!
//! Windows zone names and IANA aliases are mapped through ICU4X data.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::str::FromStr;

/// Error during timezone lookup or conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Wall-clock time missing from the zone even one hour later, as on a
    /// skipped calendar day.
    #[error("Non-existent local time: {0}")]
    NonExistentTime(String),
}

/// Prefixes some calendar clients put in front of IANA identifiers.
const VENDOR_PREFIXES: [&str; 2] = ["/mozilla.org/", "/softwarestudio.org/"];

/// ## Summary
/// Resolves a calendar timezone identifier to a `chrono_tz::Tz`.
///
/// Vendor-prefixed, Windows and aliased identifiers are mapped to their
/// canonical IANA name first.
///
/// ## Errors
///
/// Returns `ConversionError::UnknownTimezone` if the identifier cannot be resolved.
pub fn resolve_timezone(tzid: &str) -> Result<Tz, ConversionError> {
    let canonical = canonical_tzid(tzid);
    let tz = Tz::from_str(&canonical)
        .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;

    tracing::trace!(tzid, resolved = %tz.name(), "Resolved calendar timezone");
    Ok(tz)
}

/// Canonical IANA name for `tzid`, or the unprefixed identifier when ICU
/// does not know it.
fn canonical_tzid(tzid: &str) -> String {
    let bare = VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid);
    let iana = IanaParserExtended::new();

    if let Some(zone) = WindowsParser::new().parse(bare, None)
        && let Some(entry) = iana.iter().find(|entry| entry.time_zone == zone)
    {
        return entry.canonical.to_string();
    }

    let parsed = iana.parse(bare);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        bare.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Converts a local wall-clock datetime in `tz` to UTC.
///
/// Times inside a DST gap are shifted forward by one hour. Times inside a
/// DST fold resolve to the earlier of the two instants.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the shifted time still does
/// not exist in `tz`.
pub fn local_to_utc(local_time: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local_time + chrono::Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    tracing::trace!(%local_time, tz = %tz.name(), "Shifted local time out of DST gap");
                    Ok(dt.with_timezone(&Utc))
                }
                LocalResult::None => Err(ConversionError::NonExistentTime(format!(
                    "{local_time} in timezone {}",
                    tz.name()
                ))),
            }
        }
    }
}
