use chrono::{NaiveDate, NaiveTime, Timelike};

pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";
pub const RECORD_TIME_FORMAT: &str = "%H:%M";

/// This is the standard way of converting a date to a string in tasklog.
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

pub fn format_record_time(time: NaiveTime) -> String {
    time.format(RECORD_TIME_FORMAT).to_string()
}

/// Drops seconds and anything below. Records only keep hour and minute.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Human readable countdown, e.g. `1h2m3s`, `4m0s` or `9s`.
pub fn format_countdown(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds / 60 % 60;
    let seconds = seconds % 60;
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
