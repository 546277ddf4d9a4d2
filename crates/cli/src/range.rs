//! Default date window

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// `[midnight `days` days ago, last instant of today]`, both inclusive
pub fn date_range(days: u32, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    let from = midnight - Duration::days(i64::from(days));
    let to = midnight + Duration::days(1) - Duration::nanoseconds(1);
    (from, to)
}
