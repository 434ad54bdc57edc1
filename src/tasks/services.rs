use axum::http::StatusCode;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::commands::error::CommandError;
use crate::store::Store;
use crate::tasks::repo_types::{NewTask, Task};

/// Checked in this order; the first one present decides where the title starts.
const TRIGGER_PHRASES: &[&str] = &["add task", "create task"];

pub const MAX_TITLE_LEN: usize = 200;

/// Text after the first trigger phrase, trimmed. `None` if no trigger is present.
pub(crate) fn title_after_trigger(command_text: &str) -> Option<&str> {
    TRIGGER_PHRASES
        .iter()
        .find_map(|p| command_text.split_once(p))
        .map(|(_, rest)| rest.trim())
}

#[instrument(skip(store, command_text))]
pub async fn handle_task(
    store: &dyn Store,
    command_text: &str,
    user_id: Uuid,
) -> Result<String, CommandError> {
    let title = title_after_trigger(command_text).ok_or(CommandError::UnrecognizedTask)?;
    if title.is_empty() {
        return Err(CommandError::EmptyTaskTitle);
    }
    if !fits_title_column(title) {
        return Err(CommandError::TaskTitleTooLong { max: MAX_TITLE_LEN });
    }

    let task = store.create_task(NewTask::titled(user_id, title)).await?;
    info!(task_id = %task.id, "task created from command");
    Ok(format!("Task \"{}\" added successfully", task.title))
}

pub(crate) fn fits_title_column(title: &str) -> bool {
    title.chars().count() <= MAX_TITLE_LEN
}

/// Trimmed, non-empty title that fits the column.
pub fn validate_title(raw: &str) -> Result<String, (StatusCode, String)> {
    let title = raw.trim();
    if title.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title is required".into()));
    }
    if !fits_title_column(title) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(title.to_string())
}

/// Tasks are only visible to and mutable by their owner.
pub fn ensure_owner(task: &Task, user_id: Uuid) -> Result<(), (StatusCode, String)> {
    if task.user_id != user_id {
        warn!(task_id = %task.id, %user_id, "task access denied");
        return Err((StatusCode::FORBIDDEN, "Access denied".into()));
    }
    Ok(())
}
