use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::{ClientError, ClientResult};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a transaction timestamp into UTC.
///
/// Accepts RFC 3339 (`Z` or numeric offset), naive date-times (taken as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC). Anything else is `None`.
pub fn parse_transaction_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if !looks_like_iso_date(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a caller-supplied reference instant (`--now`).
pub fn parse_reference_instant(value: &str, command: &str) -> ClientResult<DateTime<Utc>> {
    let trimmed = value.trim();
    let is_supported = DateTime::parse_from_rfc3339(trimmed).is_ok() || looks_like_iso_date(trimmed);
    if !is_supported {
        return Err(ClientError::invalid_argument_for_command(
            "`now` must be an RFC 3339 timestamp or a YYYY-MM-DD date.",
            Some(command),
        ));
    }
    parse_transaction_datetime(trimmed).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            "`now` must use valid calendar values.",
            Some(command),
        )
    })
}

/// Whole days from `earlier` to `later`; partial days are dropped.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

/// Oldest instant still inside the lookback window, or `None` when the
/// window reaches past the representable calendar.
pub fn lookback_cutoff(now: DateTime<Utc>, lookback_days: u32) -> Option<DateTime<Utc>> {
    let span = Duration::try_days(i64::from(lookback_days))?;
    now.checked_sub_signed(span)
}

pub fn format_iso_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_iso_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
