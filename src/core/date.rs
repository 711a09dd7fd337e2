//! Purpose: Own the canonical vault timestamp format for parsing and rendering.
//! Exports: `CANONICAL_FORMAT`, `parse_date`, `format_date`.
//! Role: Shared codec used by every date-bearing field so output never drifts.
//! Invariants: Parsed values are UTC with whole-second precision.
//! Invariants: Parsing and rendering share `CANONICAL_FORMAT`, so output always
//! parses back to the same instant.
//! Notes: Parsing is tolerant (RFC 3339 offsets, fractions, space separator,
//! bare dates); rendering is always `YYYY-MM-DDThh:mm:ssZ`.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub const CANONICAL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const SPACED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DATE_ONLY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parses a vault timestamp, returning `None` when no accepted layout matches.
pub fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, CANONICAL_FORMAT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        // Re-anchoring on the unix second normalizes to UTC and drops fractions.
        return OffsetDateTime::from_unix_timestamp(parsed.unix_timestamp()).ok();
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, SPACED_FORMAT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = Date::parse(trimmed, DATE_ONLY_FORMAT) {
        return Some(parsed.midnight().assume_utc());
    }
    None
}

/// Renders `value` in the canonical layout, converting to UTC first.
pub fn format_date(value: OffsetDateTime) -> String {
    let value = value.to_offset(UtcOffset::UTC);
    value
        .format(CANONICAL_FORMAT)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}
