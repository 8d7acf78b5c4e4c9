/*
[INPUT]:  A scheduled task
[OUTPUT]: Google Calendar "add event" URL
[POS]:    Consumer - external calendar hand-off
[UPDATE]: When the calendar template parameters change
*/

use chrono::{DateTime, Duration, Utc};
use devflow_adapter::Task;
use url::Url;

const TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render";

/// Event URL for a task with a start or end time; `None` when unscheduled.
///
/// A missing side is filled in one hour from the other.
pub fn calendar_link(task: &Task) -> Option<Url> {
    let (start, end) = match (task.start_date, task.end_date) {
        (None, None) => return None,
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, start + Duration::hours(1)),
        (None, Some(end)) => (end - Duration::hours(1), end),
    };

    let dates = format!("{}/{}", compact(start), compact(end));
    Url::parse_with_params(
        TEMPLATE_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", task.title.as_str()),
            ("details", task.description.as_str()),
            ("dates", dates.as_str()),
        ],
    )
    .ok()
}

fn compact(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}
