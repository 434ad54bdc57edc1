use anyhow::Context;
use time::OffsetDateTime;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::attendance::services::handle_attendance;
use crate::commands::{
    dto::CommandResponse,
    error::CommandError,
    query::handle_query,
    repo_types::{Intent, NewCommandLog},
};
use crate::geocoder::Geocoder;
use crate::store::Store;
use crate::tasks::services::handle_task;

const ATTENDANCE_KEYWORDS: &[&str] = &[
    "check in",
    "check out",
    "checkout",
    "mark attendance",
    "attendance",
];
const TASK_KEYWORDS: &[&str] = &["task", "add task", "create task"];
const QUERY_KEYWORDS: &[&str] = &["show", "list", "display", "what are"];

/// Evaluated top to bottom, first match wins.
const INTENT_RULES: &[(Intent, &[&str])] = &[
    (Intent::Attendance, ATTENDANCE_KEYWORDS),
    (Intent::Task, TASK_KEYWORDS),
    (Intent::Query, QUERY_KEYWORDS),
];

/// Who is asking, from where, and when.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub user_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub now: OffsetDateTime,
}

impl CommandContext {
    pub fn new(user_id: Uuid, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            user_id,
            latitude,
            longitude,
            now: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub intent: Intent,
    pub response: CommandResponse,
}

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn normalize(command_text: &str) -> String {
    command_text.trim().to_lowercase()
}

/// Expects text already passed through [`normalize`].
pub fn classify(normalized: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|(_, keywords)| contains_any(normalized, keywords))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Unknown)
}

/// Classifies `command_text`, runs the matching handler and appends the
/// outcome to the command log.
///
/// Handler failures become `success = false` responses. Only a failure to
/// write the log entry is returned as `Err`; by then any handler writes have
/// already been committed.
#[instrument(skip(store, geocoder, command_text, ctx), fields(user_id = %ctx.user_id))]
pub async fn interpret(
    store: &dyn Store,
    geocoder: &dyn Geocoder,
    command_text: &str,
    ctx: &CommandContext,
) -> anyhow::Result<CommandOutcome> {
    let normalized = normalize(command_text);
    let intent = classify(&normalized);

    let result = match intent {
        Intent::Attendance => handle_attendance(store, geocoder, &normalized, ctx).await,
        Intent::Task => handle_task(store, &normalized, ctx.user_id).await,
        Intent::Query => handle_query(store, &normalized, ctx.user_id, ctx.now.date()).await,
        Intent::Unknown => Err(CommandError::UnrecognizedIntent),
    };

    let response = match result {
        Ok(message) => CommandResponse::ok(message),
        Err(e) => {
            if let CommandError::Handler(inner) = &e {
                error!(error = %format!("{inner:#}"), %intent, "command handler failed");
            }
            CommandResponse::failed(e.to_string())
        }
    };

    store
        .append_command_log(NewCommandLog {
            user_id: ctx.user_id,
            command_text: command_text.trim().to_string(),
            intent,
            response: response.message.clone(),
            success: response.success,
        })
        .await
        .context("append command log")?;

    Ok(CommandOutcome { intent, response })
}
