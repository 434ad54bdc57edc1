use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classified purpose of a free-text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "command_intent", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Attendance,
    Task,
    Query,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Attendance => "attendance",
            Intent::Task => "task",
            Intent::Query => "query",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit entry written once per processed command.
#[derive(Debug, Clone)]
pub struct NewCommandLog {
    pub user_id: Uuid,
    pub command_text: String,
    pub intent: Intent,
    pub response: String,
    pub success: bool,
}
