//! Wall-clock text for the dashboard.

use chrono::{DateTime, FixedOffset, Utc};

/// e.g. `Monday, 19 October 2026 03:45 PM`
const DISPLAY_FORMAT: &str = "%A, %d %B %Y %I:%M %p";

/// Format `now` in the display timezone.
pub fn format_time(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

pub fn current_time(offset: FixedOffset) -> String {
    format_time(Utc::now(), offset)
}
