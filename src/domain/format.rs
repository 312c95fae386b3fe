//! Display formatting for timestamps and titles.

use chrono::{DateTime, Datelike, Local};

use super::timestamp::Timestamp;

pub const INVALID_DATE: &str = "Invalid date";

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const TITLE_WORDS: usize = 4;
const TITLE_MAX_CHARS: usize = 30;

/// Formats the time of day as `hh:mm AM`, in local time.
pub fn format_time(timestamp: Timestamp) -> String {
    match timestamp.as_datetime() {
        Some(value) => value.with_timezone(&Local).format("%I:%M %p").to_string(),
        None => INVALID_DATE.to_owned(),
    }
}

/// Formats a day relative to now: `Today`, `Yesterday`, `3 days ago`, `Mar 4`.
pub fn format_date(timestamp: Timestamp) -> String {
    format_date_at(timestamp, Local::now())
}

fn format_date_at(timestamp: Timestamp, now: DateTime<Local>) -> String {
    let Some(value) = timestamp.as_datetime() else {
        return INVALID_DATE.to_owned();
    };
    let value = value.with_timezone(&Local);

    let elapsed_days = (now - value).num_milliseconds().div_euclid(MS_PER_DAY);

    match elapsed_days {
        days if days <= 0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        days @ 2..=6 => format!("{days} days ago"),
        _ if value.year() == now.year() => value.format("%b %-d").to_string(),
        _ => value.format("%b %-d, %Y").to_string(),
    }
}

/// Builds a chatroom title from the first words of a message.
pub fn chatroom_title_from(message: &str) -> String {
    let title = message
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("noon should be unambiguous")
    }

    fn ago(now: DateTime<Local>, duration: Duration) -> Timestamp {
        Timestamp::from_datetime((now - duration).with_timezone(&Utc))
    }

    #[test]
    fn invalid_timestamps_render_as_invalid_date() {
        assert_eq!(format_time(Timestamp::invalid()), INVALID_DATE);
        assert_eq!(format_date(Timestamp::invalid()), INVALID_DATE);
    }

    #[test]
    fn format_time_uses_twelve_hour_clock() {
        let rendered = format_time(Timestamp::now());

        assert!(rendered.ends_with("AM") || rendered.ends_with("PM"));
        assert_eq!(rendered.len(), "03:04 PM".len());
    }

    #[test]
    fn format_date_uses_relative_labels_for_the_last_week() {
        let now = local_noon(2026, 3, 20);

        assert_eq!(format_date_at(ago(now, Duration::hours(2)), now), "Today");
        assert_eq!(format_date_at(ago(now, Duration::hours(30)), now), "Yesterday");
        assert_eq!(format_date_at(ago(now, Duration::days(4)), now), "4 days ago");
    }

    #[test]
    fn format_date_falls_back_to_calendar_dates() {
        let now = local_noon(2026, 3, 20);

        assert_eq!(format_date_at(ago(now, Duration::days(16)), now), "Mar 4");
        assert_eq!(
            format_date_at(ago(now, Duration::days(365)), now),
            "Mar 20, 2025"
        );
    }

    #[test]
    fn future_timestamps_count_as_today() {
        let now = local_noon(2026, 3, 20);

        assert_eq!(format_date_at(ago(now, Duration::hours(-5)), now), "Today");
    }

    #[test]
    fn chatroom_title_keeps_first_four_words() {
        assert_eq!(
            chatroom_title_from("  plan the   spring trip to Lisbon "),
            "plan the spring trip"
        );
    }

    #[test]
    fn chatroom_title_truncates_long_words() {
        let title = chatroom_title_from("supercalifragilisticexpialidocious words follow here");

        assert_eq!(title, "supercalifragilisticexpialidoc...");
    }
}
