use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::attendance::repo_types::{Attendance, NewAttendance};
use crate::commands::repo_types::NewCommandLog;
use crate::tasks::repo_types::{NewTask, Task, TaskChanges};

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::{run_migrations, PgStore};

/// Persistence behind the command interpreter and the REST handlers.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_attendance_for_user_on_date(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<Attendance>>;

    /// `None` when the user already has a record for that calendar day.
    async fn create_attendance(&self, new: NewAttendance) -> anyhow::Result<Option<Attendance>>;

    /// `false` when the record is missing or already checked out.
    async fn update_attendance_checkout(
        &self,
        attendance_id: Uuid,
        at: OffsetDateTime,
    ) -> anyhow::Result<bool>;

    /// Newest check-in first.
    async fn list_attendance(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Attendance>>;

    async fn find_task(&self, task_id: Uuid) -> anyhow::Result<Option<Task>>;

    /// Newest first.
    async fn list_tasks(&self, user_id: Uuid, limit: i64, offset: i64)
        -> anyhow::Result<Vec<Task>>;

    async fn create_task(&self, new: NewTask) -> anyhow::Result<Task>;

    /// Applies the present fields and stamps `updated_at`. `None` if the task is gone.
    async fn update_task(&self, task_id: Uuid, changes: TaskChanges)
        -> anyhow::Result<Option<Task>>;

    async fn delete_task(&self, task_id: Uuid) -> anyhow::Result<bool>;

    async fn append_command_log(&self, entry: NewCommandLog) -> anyhow::Result<()>;
}
