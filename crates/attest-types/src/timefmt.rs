//! Timestamp codec for claim documents.
//!
//! Result timestamps: `2024-03-01 10:00:00.000000000 +0000 UTC`.
//! Metadata timestamps: `2024-03-01T10:00:00+00:00`.
//!
//! Parsing is lenient: a trailing monotonic clock reading (` m=+0.0123`) is ignored
//! and RFC 3339 input is accepted as well.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub fn format_result_time(t: OffsetDateTime) -> String {
    let t = t.to_offset(UtcOffset::UTC);
    t.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:9] +0000 UTC"
    ))
    .unwrap_or_default()
}

pub fn format_metadata_time(t: OffsetDateTime) -> String {
    let t = t.to_offset(UtcOffset::UTC);
    t.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]+00:00"
    ))
    .unwrap_or_default()
}

/// Drop a trailing ` m=...` monotonic reading, if any.
pub fn strip_monotonic(s: &str) -> &str {
    match s.find(" m=") {
        Some(idx) => s[..idx].trim_end(),
        None => s.trim(),
    }
}

/// Parse a result or metadata timestamp. Returns `None` for anything unrecognized.
pub fn parse_result_time(s: &str) -> Option<OffsetDateTime> {
    let s = strip_monotonic(s);
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(t);
    }

    // `<date> <clock> <offset> [zone]`
    let mut parts = s.split_whitespace();
    let date = parts.next()?;
    let clock = parts.next()?;
    let offset = parts.next()?;
    let joined = format!("{date} {clock} {offset}");

    let parsed = if clock.contains('.') {
        OffsetDateTime::parse(
            &joined,
            format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory][offset_minute]"
            ),
        )
    } else {
        OffsetDateTime::parse(
            &joined,
            format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
            ),
        )
    };
    parsed.ok()
}
