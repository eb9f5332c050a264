use chrono::{prelude::*, LocalResult};
use chrono_tz::Tz;

/// Anchors a wall clock time in the given zone. Ambiguous local times pick
/// the earliest instant. Local times inside a DST gap keep the offset from
/// before the gap, so they land as far past it as they were into it.
pub fn local_to_millis(local: NaiveDateTime, tz: &Tz) -> i64 {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let before_gap = local - chrono::Duration::days(1);
            match tz.offset_from_local_datetime(&before_gap).earliest() {
                Some(offset) => Utc
                    .from_utc_datetime(&(local - offset.fix()))
                    .timestamp_millis(),
                None => tz.from_utc_datetime(&local).timestamp_millis(),
            }
        }
    }
}

pub fn millis_to_zoned(millis: i64, tz: &Tz) -> DateTime<Tz> {
    match tz.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => dt,
        // Only reachable for instants outside of chrono's range
        _ => tz.from_utc_datetime(&NaiveDateTime::MIN),
    }
}

pub fn millis_to_local(millis: i64, tz: &Tz) -> NaiveDateTime {
    millis_to_zoned(millis, tz).naive_local()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// `YYYY-MM-DD HH:MM:SS <weekday>` in the given zone, the anchor the
/// language model resolves relative dates against.
pub fn format_prompt_time(millis: i64, tz: &Tz) -> String {
    let now = millis_to_zoned(millis, tz);
    format!(
        "{} {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        weekday_name(now.weekday())
    )
}
