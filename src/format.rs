//! Human-readable rendering of webhook events.
//!
//! Timestamps are always shown in UTC, whatever the viewer's local zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::domain::{EventAction, WebhookEvent};

pub const INVALID_DATE: &str = "Invalid Date";

pub const NO_EVENTS_PLACEHOLDER: &str = "No events yet. Waiting for GitHub webhooks...";

pub const BACKEND_UNREACHABLE: &str =
    "Failed to connect to backend. Please ensure the server is running.";

/// `2021-04-01T21:30:00Z` -> `1st April 2021 - 9:30 PM UTC`.
///
/// Unparseable input yields [`INVALID_DATE`].
pub fn format_timestamp(iso: &str) -> String {
    match parse_utc(iso) {
        Some(dt) => {
            let (hour, meridiem) = twelve_hour(dt.hour());
            format!(
                "{}{} {} {} - {}:{:02} {} UTC",
                dt.day(),
                day_suffix(dt.day()),
                dt.format("%B"),
                dt.year(),
                hour,
                dt.minute(),
                meridiem
            )
        }
        None => INVALID_DATE.to_string(),
    }
}

pub fn day_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Maps a 0-23 hour to 12-hour form; 0 becomes 12 AM.
pub fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    match hour % 12 {
        0 => (12, meridiem),
        h => (h, meridiem),
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts ISO 8601 date-times with a `Z` or numeric offset (with or without
/// seconds or a colon in the offset). Values without any zone are taken as UTC.
fn parse_utc(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(zulu) = input.strip_suffix(['Z', 'z']) {
        return parse_naive(zulu);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    parse_naive(input)
}

fn parse_naive(input: &str) -> Option<DateTime<Utc>> {
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One display sentence per event. Never fails; absent fields render empty.
pub fn format_event_message(event: &WebhookEvent) -> String {
    let ts = format_timestamp(&event.timestamp);
    match &event.action {
        EventAction::Push => format!("{} pushed to {} on {}", event.author, event.to_branch, ts),
        EventAction::PullRequest => format!(
            "{} submitted a pull request from {} to {} on {}",
            event.author, event.from_branch, event.to_branch, ts
        ),
        EventAction::Merge => format!(
            "{} merged branch {} to {} on {}",
            event.author, event.from_branch, event.to_branch, ts
        ),
        EventAction::Other(action) => format!("{} performed {} on {}", event.author, action, ts),
    }
}

pub fn failure_message(cause: &str) -> String {
    format!("{}\n\nError: {}", BACKEND_UNREACHABLE, cause)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: &str, ts: &str) -> WebhookEvent {
        WebhookEvent {
            action: EventAction::from_tag(action),
            author: "alice".to_string(),
            to_branch: "main".to_string(),
            from_branch: "dev".to_string(),
            timestamp: ts.to_string(),
            request_id: "r1".to_string(),
        }
    }

    #[test]
    fn teens_always_take_th() {
        for day in 11..=13 {
            assert_eq!(day_suffix(day), "th", "day {}", day);
        }
    }

    #[test]
    fn suffix_follows_last_digit_outside_teens() {
        for day in 1..=31u32 {
            if (11..=13).contains(&day) {
                continue;
            }
            let expected = match day % 10 {
                1 => "st",
                2 => "nd",
                3 => "rd",
                _ => "th",
            };
            assert_eq!(day_suffix(day), expected, "day {}", day);
        }
        assert_eq!(day_suffix(21), "st");
        assert_eq!(day_suffix(22), "nd");
        assert_eq!(day_suffix(23), "rd");
        assert_eq!(day_suffix(31), "st");
    }

    #[test]
    fn midnight_and_noon_render_as_twelve() {
        assert_eq!(twelve_hour(0), (12, "AM"));
        assert_eq!(twelve_hour(12), (12, "PM"));
        assert_eq!(twelve_hour(13), (1, "PM"));
        assert_eq!(twelve_hour(23), (11, "PM"));
    }

    #[test]
    fn formats_reference_timestamp() {
        assert_eq!(
            format_timestamp("2021-04-01T21:30:00Z"),
            "1st April 2021 - 9:30 PM UTC"
        );
    }

    #[test]
    fn formats_in_utc_regardless_of_offset() {
        assert_eq!(
            format_timestamp("2021-04-02T02:30:00+05:00"),
            "1st April 2021 - 9:30 PM UTC"
        );
    }

    #[test]
    fn accepts_short_and_colonless_iso_forms() {
        for input in [
            "2021-04-01T21:30Z",
            "2021-04-01T23:30:00+0200",
            "2021-04-01T23:30+0200",
            "2021-04-01T23:30:00.000+0200",
            "2021-04-01T16:30:00-05:00",
        ] {
            assert_eq!(
                format_timestamp(input),
                "1st April 2021 - 9:30 PM UTC",
                "input {}",
                input
            );
        }
    }

    #[test]
    fn naive_timestamps_are_taken_as_utc() {
        assert_eq!(
            format_timestamp("2023-12-12T00:05:09.123456"),
            "12th December 2023 - 12:05 AM UTC"
        );
    }

    #[test]
    fn unparseable_timestamp_is_invalid_date() {
        assert_eq!(format_timestamp("not a date"), INVALID_DATE);
        assert_eq!(format_timestamp(""), INVALID_DATE);
    }

    #[test]
    fn merge_message() {
        assert_eq!(
            format_event_message(&event("MERGE", "2021-04-01T21:30:00Z")),
            "alice merged branch dev to main on 1st April 2021 - 9:30 PM UTC"
        );
    }

    #[test]
    fn push_message_has_no_pull_request_phrasing() {
        let msg = format_event_message(&event("PUSH", "2021-04-01T21:30:00Z"));
        assert_eq!(msg, "alice pushed to main on 1st April 2021 - 9:30 PM UTC");
        assert!(!msg.contains("pull request"));
        assert!(!msg.contains("dev"));
    }

    #[test]
    fn pull_request_message() {
        assert_eq!(
            format_event_message(&event("PULL_REQUEST", "2021-04-13T12:00:00Z")),
            "alice submitted a pull request from dev to main on 13th April 2021 - 12:00 PM UTC"
        );
    }

    #[test]
    fn unknown_action_uses_fallback_arm() {
        assert_eq!(
            format_event_message(&event("RELEASE", "2021-04-01T21:30:00Z")),
            "alice performed RELEASE on 1st April 2021 - 9:30 PM UTC"
        );
    }

    #[test]
    fn empty_event_still_formats() {
        let msg = format_event_message(&WebhookEvent::default());
        assert_eq!(msg, " performed  on Invalid Date");
    }
}
