use chrono::{Local, TimeZone};

/// Render epoch milliseconds as local time, e.g. `Tue Nov 14 2023 22:13:20`.
///
/// Used for commit and stash dates. `None` when the value is out of range.
pub fn format_local_time(ms: u64) -> Option<String> {
    let ms = i64::try_from(ms).ok()?;
    let when = Local.timestamp_millis_opt(ms).single()?;
    Some(when.format("%a %b %e %Y %H:%M:%S").to_string())
}
