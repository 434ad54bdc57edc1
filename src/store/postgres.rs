use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::Store;
use crate::attendance::repo_types::{Attendance, NewAttendance};
use crate::commands::{repo as command_repo, repo_types::NewCommandLog};
use crate::tasks::repo_types::{NewTask, Task, TaskChanges};

/// Applies `migrations/`; the server must not start on a failure here.
pub async fn run_migrations(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run database migrations")
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_attendance_for_user_on_date(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<Attendance>> {
        Attendance::find_for_user_on_date(&self.db, user_id, date).await
    }

    async fn create_attendance(&self, new: NewAttendance) -> anyhow::Result<Option<Attendance>> {
        Attendance::create(&self.db, &new).await
    }

    async fn update_attendance_checkout(
        &self,
        attendance_id: Uuid,
        at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        Attendance::close(&self.db, attendance_id, at).await
    }

    async fn list_attendance(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Attendance>> {
        Attendance::list_by_user(&self.db, user_id, limit, offset).await
    }

    async fn find_task(&self, task_id: Uuid) -> anyhow::Result<Option<Task>> {
        Task::find_by_id(&self.db, task_id).await
    }

    async fn list_tasks(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Task>> {
        Task::list_by_user(&self.db, user_id, limit, offset).await
    }

    async fn create_task(&self, new: NewTask) -> anyhow::Result<Task> {
        Task::create(&self.db, &new).await
    }

    async fn update_task(
        &self,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        Task::update(&self.db, task_id, &changes).await
    }

    async fn delete_task(&self, task_id: Uuid) -> anyhow::Result<bool> {
        Task::delete(&self.db, task_id).await
    }

    async fn append_command_log(&self, entry: NewCommandLog) -> anyhow::Result<()> {
        command_repo::append_log(&self.db, &entry).await
    }
}
