use time::{Date, OffsetDateTime};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::commands::{error::CommandError, interpreter::contains_any};
use crate::store::Store;

const TASK_QUERY_KEYWORDS: &[&str] = &["my tasks", "tasks", "show tasks"];
const ATTENDANCE_QUERY_KEYWORDS: &[&str] = &["attendance", "checked in"];
const RECENT_TASK_LIMIT: i64 = 5;

/// `HH:MM`, 24-hour clock.
pub(crate) fn clock_time(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

/// Answers read-only questions about the caller's tasks or today's attendance.
#[instrument(skip(store, command_text))]
pub async fn handle_query(
    store: &dyn Store,
    command_text: &str,
    user_id: Uuid,
    today: Date,
) -> Result<String, CommandError> {
    if contains_any(command_text, TASK_QUERY_KEYWORDS) {
        let tasks = store.list_tasks(user_id, RECENT_TASK_LIMIT, 0).await?;
        debug!(count = tasks.len(), "recent tasks loaded");
        if tasks.is_empty() {
            return Ok("You have no tasks yet".into());
        }
        let summary = tasks
            .iter()
            .map(|t| format!("{} ({})", t.title, t.status))
            .collect::<Vec<_>>()
            .join(", ");
        return Ok(format!("Your recent tasks: {}", summary));
    }

    if contains_any(command_text, ATTENDANCE_QUERY_KEYWORDS) {
        let record = store.find_attendance_for_user_on_date(user_id, today).await?;
        let message = match record {
            None => "You have not checked in today".to_string(),
            Some(a) => match a.check_out_time {
                Some(out) => format!(
                    "You checked in at {} and checked out at {}",
                    clock_time(a.check_in_time),
                    clock_time(out)
                ),
                None => format!("You checked in at {} today", clock_time(a.check_in_time)),
            },
        };
        return Ok(message);
    }

    Err(CommandError::UnrecognizedQuery)
}
