use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::attendance::repo_types::AttendanceStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: String, // YYYY-MM-DD
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl TaskStats {
    pub fn total(&self) -> i64 {
        self.pending + self.in_progress + self.completed
    }
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub attendance_stats: Vec<DailyCount>,
    pub task_stats: TaskStats,
}

/// Attendance row joined with its owner's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentAttendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub check_out_time: Option<OffsetDateTime>,
    pub location_name: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub total_users: i64,
    pub today_attendance: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub recent_attendance: Vec<RecentAttendance>,
}
