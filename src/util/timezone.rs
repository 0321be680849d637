use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use time::{OffsetDateTime, UtcOffset};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> DateTime<Tz> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, utc.nanosecond())
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))
        .unwrap_or_default();
    tz.from_utc_datetime(&datetime_utc.naive_utc())
}

/// `March 4, 2025` in the site timezone.
pub fn format_long_date(time: OffsetDateTime, tz: Tz) -> String {
    localized_datetime(time, tz).format("%B %-d, %Y").to_string()
}

/// `2025-03-04 09:30` in the site timezone.
pub fn format_timestamp(time: OffsetDateTime, tz: Tz) -> String {
    localized_datetime(time, tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// `2025-03-04` for `<time datetime>` attributes.
pub fn iso_date(time: OffsetDateTime, tz: Tz) -> String {
    localized_datetime(time, tz).format("%Y-%m-%d").to_string()
}

pub fn current_year(tz: Tz) -> i32 {
    use chrono::Datelike;
    localized_datetime(OffsetDateTime::now_utc(), tz).year()
}
