use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// UTC+7, the learners' local time (WIB).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 7 * 60;

pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| {
        tracing::warn!("Invalid UTC offset of {} minutes, falling back to UTC", minutes);
        Utc.fix()
    })
}

/// Calendar day of `ts` as seen in `offset`.
pub fn local_date(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}
